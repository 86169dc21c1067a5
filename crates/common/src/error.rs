/// Study Companion error types
#[derive(Debug, thiserror::Error)]
pub enum StudyCompanionError {
    /// LLM provider related error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Provider rejected the API key
    #[error("{0}")]
    Authentication(String),

    /// Provider rate limit hit
    #[error("{0}")]
    RateLimit(String),

    /// Summarization pipeline failure
    #[error("{0}")]
    Summarization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid input
    #[error("{0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StudyCompanionError {
    /// Create LLM error
    pub fn llm<S: Into<String>>(msg: S) -> Self {
        Self::Llm(msg.into())
    }

    /// Create authentication error
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create rate limit error
    pub fn rate_limit<S: Into<String>>(msg: S) -> Self {
        Self::RateLimit(msg.into())
    }

    /// Create summarization error
    pub fn summarization<S: Into<String>>(msg: S) -> Self {
        Self::Summarization(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether a retry could succeed (transport failures and provider 5xx)
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

// HTTP response conversion
impl StudyCompanionError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            // Provider key and quota problems are reported as client errors
            Self::Authentication(_) => 400,
            Self::RateLimit(_) => 400,
            Self::Config(_) => 500,
            Self::Llm(_) => 500,
            Self::Summarization(_) => 500,
            Self::Network(_) => 503,
            Self::Io(_) => 500,
            Self::Json(_) => 400,
            Self::Other(_) => 500,
        }
    }
}
