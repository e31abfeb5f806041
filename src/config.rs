use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub log_level: String,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub tesseract_cmd: String,
    pub language: String,
    pub timeout: Duration,
    pub max_upload_bytes: usize,
    pub upload_dir: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout: Duration::from_secs(60),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_dir: env::temp_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup; `load` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "5000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| AppError::config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::config(format!("Invalid host address: {}", e)))?;

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let defaults = OcrConfig::default();
        let timeout = match lookup("OCR_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_positive(&raw, "OCR_TIMEOUT_SECS")? as u64),
            None => defaults.timeout,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => parse_positive(&raw, "MAX_UPLOAD_BYTES")?,
            None => defaults.max_upload_bytes,
        };

        let ocr = OcrConfig {
            tesseract_cmd: lookup("TESSERACT_CMD").unwrap_or(defaults.tesseract_cmd),
            language: lookup("OCR_LANG").unwrap_or(defaults.language),
            timeout,
            max_upload_bytes,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            log_level,
            ocr,
        })
    }
}

fn parse_positive(raw: &str, key: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(AppError::config(format!("{} must be greater than zero", key))),
        Ok(value) => Ok(value),
        Err(e) => Err(AppError::config(format!("Invalid {}: {}", key, e))),
    }
}
