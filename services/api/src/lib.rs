mod cli;
mod infra;
mod routes;
mod server;

use property_search::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
