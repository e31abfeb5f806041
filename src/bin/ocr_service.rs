use std::sync::Arc;

use anyhow::{Context, Result};
use mini_services::{
    config::Config,
    ocr::{routes::{create_router, OcrState}, OcrEngine, OcrService, TesseractEngine},
    server, telemetry,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    telemetry::init(&config.log_level)?;

    tokio::fs::create_dir_all(&config.ocr.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload dir {:?}", config.ocr.upload_dir))?;

    let engine = Arc::new(TesseractEngine::from_config(&config.ocr));
    match engine.version().await {
        Ok(version) => info!(%version, "Tesseract available"),
        Err(e) => warn!("Tesseract not reachable at startup: {}", e),
    }

    let service = OcrService::new(engine, config.ocr.upload_dir.clone());
    let app = create_router(OcrState::new(service, config.ocr.max_upload_bytes));

    server::serve("ocr-service", app, config.server_addr).await?;
    Ok(())
}
