use anyhow::Result;
use mini_services::{
    config::Config,
    diagnostics::{self, DiagnosticsState},
    ocr::TesseractEngine,
    server, telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    telemetry::init(&config.log_level)?;

    let state = DiagnosticsState::new(TesseractEngine::from_config(&config.ocr));
    let app = diagnostics::create_router(state);

    server::serve("health-app", app, config.server_addr).await?;
    Ok(())
}
