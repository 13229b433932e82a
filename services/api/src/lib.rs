mod cli;
mod infra;
mod recommend;
mod routes;
mod server;

use kcet_guide::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
