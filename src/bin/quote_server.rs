use anyhow::Result;
use mini_services::{
    config::Config,
    quotes::{routes::{create_router, QuoteState}, QuoteBook},
    server, telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    telemetry::init(&config.log_level)?;

    let book = QuoteBook::builtin();
    info!(quotes = book.len(), "Quote book loaded");

    let app = create_router(QuoteState::new(book));
    server::serve("quote-server", app, config.server_addr).await?;
    Ok(())
}
