use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use study_companion_common::{logger, AppConfig};
use study_companion_llm::{SummaryType, TextSummarizer, DEFAULT_MAX_LENGTH};

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
            return;
        }
    }
    dotenv::dotenv().ok();
}

#[derive(Parser)]
#[command(name = "study-companion")]
#[command(about = "Smart Study Companion - AI-powered study helper API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Summarize a text file and print the result as JSON
    Summarize {
        /// File to summarize ("-" reads stdin)
        file: PathBuf,

        /// Target summary length in words
        #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
        max_length: u32,

        /// concise, detailed or bullet_points
        #[arg(long, default_value = "concise")]
        summary_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port }) => serve(host, port).await,
        Some(Commands::Summarize {
            file,
            max_length,
            summary_type,
        }) => summarize_file(file, max_length, &summary_type).await,
        None => serve(None, None).await,
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = AppConfig::from_env()?;

    // CLI arguments override the environment
    if let Some(host) = host {
        config.server_host = host;
    }
    if let Some(port) = port {
        config.server_port = port;
    }
    config.validate()?;

    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Smart Study Companion starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Model: {}", config.openai_model);
    tracing::info!("  API base: {}", config.openai_base_url);

    println!("Server listening on http://{}", config.server_bind_address());

    study_companion_server::start_server(config).await?;
    Ok(())
}

async fn summarize_file(file: PathBuf, max_length: u32, summary_type: &str) -> Result<()> {
    let config = AppConfig::from_env()?;
    logger::setup_console_logging(&config.log_level)?;

    let text = if file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        tokio::fs::read_to_string(&file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    let summarizer = TextSummarizer::from_config(&config)?;
    let result = summarizer
        .summarize(&text, max_length, &SummaryType::from(summary_type))
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
