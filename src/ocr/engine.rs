use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::OcrConfig;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    #[error("OCR engine failed: {0}")]
    Failed(String),

    #[error("OCR timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("cannot identify image file: {0}")]
    InvalidImage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text recognition backend.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, image: &Path) -> Result<String, OcrError>;

    async fn version(&self) -> Result<String, OcrError>;
}

/// Drives the external `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
    language: String,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>, language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
            timeout,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.tesseract_cmd, &config.language, config.timeout)
    }

    async fn run(&self, command: &mut Command) -> Result<std::process::Output, OcrError> {
        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| OcrError::Timeout(self.timeout))?;

        output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OcrError::Unavailable(format!(
                    "'{}' is not installed or not in PATH",
                    self.command
                ))
            } else {
                OcrError::Io(e)
            }
        })
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        debug!(image = %image.display(), lang = %self.language, "Running tesseract");

        let mut command = Command::new(&self.command);
        command
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = self.run(&mut command).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = ?output.status.code(), "tesseract exited with failure");
            return Err(OcrError::Failed(stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn version(&self) -> Result<String, OcrError> {
        let mut command = Command::new(&self.command);
        command.arg("--version").stdin(Stdio::null()).kill_on_drop(true);

        let output = self.run(&mut command).await?;
        // Older releases print the banner on stderr.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        parse_version(&stdout)
            .or_else(|| parse_version(&stderr))
            .ok_or_else(|| OcrError::Failed(format!("unexpected version output: {}", stderr.trim())))
    }
}

/// Extracts `5.3.0` from a banner whose first line reads `tesseract 5.3.0`.
pub fn parse_version(banner: &str) -> Option<String> {
    let first = banner.lines().next()?.trim();
    let version = first.strip_prefix("tesseract")?.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}
