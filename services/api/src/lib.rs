mod check;
mod cli;
mod infra;
mod routes;
mod server;

use backoffice_guard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
