mod admin;
mod cli;
mod draft;
mod infra;

use admission_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
