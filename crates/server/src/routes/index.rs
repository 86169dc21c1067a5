use actix_files::NamedFile;
use actix_web::{get, web};

use crate::state::AppState;

/// Landing page
#[get("/")]
pub async fn index(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(state.config.index_path()).await?)
}
