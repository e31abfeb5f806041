use anyhow::Result;
use mini_services::{
    config::Config,
    sentiment::{
        routes::{create_router, SentimentState},
        KeywordModel, Lexicon, SentimentModel,
    },
    server, telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    telemetry::init(&config.log_level)?;

    let model = KeywordModel::new(Lexicon::english());
    let info = model.info();
    info!(
        positive_words = info.positive_words,
        negative_words = info.negative_words,
        "Sentiment lexicon loaded"
    );

    let app = create_router(SentimentState::new(model));
    server::serve("sentiment-service", app, config.server_addr).await?;
    Ok(())
}
