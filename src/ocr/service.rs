use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Bytes;
use image::ImageFormat;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use crate::error::{AppError, Result};
use crate::ocr::engine::{OcrEngine, OcrError};
use crate::ocr::upload::{allowed_file, extension, secure_filename, TempUpload, ALLOWED_EXTENSIONS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub text: String,
    pub message: String,
}

impl ExtractionResult {
    pub fn recognized(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let message = if text.is_empty() {
            "No text detected in the image".to_string()
        } else {
            "Text extracted successfully".to_string()
        };
        Self {
            success: true,
            text,
            message,
        }
    }

    pub fn failed(err: &OcrError) -> Self {
        Self {
            success: false,
            text: String::new(),
            message: format!("Error processing image: {}", err),
        }
    }
}

/// A checked upload: sanitized name plus the extension used for the temp file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub filename: String,
    pub extension: String,
}

/// Rejects unusable uploads before anything touches the filesystem.
pub fn validate_upload(filename: &str, size: usize) -> Result<ValidatedUpload> {
    if filename.trim().is_empty() {
        return Err(AppError::bad_request("No file selected"));
    }

    let filename = secure_filename(filename);
    let extension = match extension(&filename) {
        Some(ext) if allowed_file(&filename) => ext,
        _ => {
            return Err(AppError::bad_request(format!(
                "Invalid file type. Allowed types: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
    };

    if size == 0 {
        return Err(AppError::bad_request("Uploaded file is empty"));
    }

    Ok(ValidatedUpload {
        filename,
        extension,
    })
}

const SNIFF_LEN: u64 = 32;

/// Identifies the image container from its leading bytes. Pixel data is left
/// to the engine, which reads formats (bilevel fax TIFF among them) that the
/// `image` decoders do not.
async fn sniff_format(path: &Path) -> std::result::Result<ImageFormat, OcrError> {
    let file = tokio::fs::File::open(path).await?;
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut header).await?;
    image::guess_format(&header).map_err(|e| OcrError::InvalidImage(e.to_string()))
}

pub struct OcrService {
    engine: Arc<dyn OcrEngine>,
    upload_dir: PathBuf,
}

impl OcrService {
    pub fn new(engine: Arc<dyn OcrEngine>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            upload_dir: upload_dir.into(),
        }
    }

    pub fn engine(&self) -> &Arc<dyn OcrEngine> {
        &self.engine
    }

    /// Runs OCR on an upload. Decode and engine failures come back as an
    /// unsuccessful [`ExtractionResult`]; only validation and filesystem faults
    /// are errors. The temp file is gone by the time this returns.
    pub async fn extract(&self, upload: &ValidatedUpload, bytes: Bytes) -> Result<ExtractionResult> {
        let dir = self.upload_dir.clone();
        let ext = upload.extension.clone();
        let temp = tokio::task::spawn_blocking(move || TempUpload::create(&dir, &ext, &bytes)).await??;

        let outcome = self.recognize(temp.path()).await;

        let temp_path = temp.path().to_path_buf();
        if let Err(e) = temp.close() {
            error!(path = %temp_path.display(), "Failed to remove temp upload: {}", e);
            return Err(AppError::Io(e));
        }

        Ok(match outcome {
            Ok(text) => {
                info!(filename = %upload.filename, chars = text.trim().len(), "OCR completed");
                ExtractionResult::recognized(&text)
            }
            Err(e) => {
                warn!(filename = %upload.filename, "OCR failed: {}", e);
                ExtractionResult::failed(&e)
            }
        })
    }

    async fn recognize(&self, path: &Path) -> std::result::Result<String, OcrError> {
        let format = sniff_format(path).await?;
        tracing::debug!(?format, "Image format identified");
        self.engine.recognize(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_extension_is_rejected() {
        let err = validate_upload("malware.exe", 10).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(err.to_string().contains("png, jpg, jpeg, gif, bmp, tiff"));
    }

    #[test]
    fn empty_name_and_empty_payload_are_rejected() {
        assert_eq!(validate_upload("", 10).unwrap_err().to_string(), "No file selected");
        assert_eq!(
            validate_upload("scan.png", 0).unwrap_err().to_string(),
            "Uploaded file is empty"
        );
    }

    #[test]
    fn valid_upload_is_sanitized() {
        let upload = validate_upload("../../tmp/My Scan.PNG", 42).unwrap();
        assert_eq!(upload.filename, "My_Scan.PNG");
        assert_eq!(upload.extension, "png");
    }

    #[test]
    fn recognized_text_is_trimmed() {
        let result = ExtractionResult::recognized("\n  Hello world \n\n");
        assert!(result.success);
        assert_eq!(result.text, "Hello world");

        let empty = ExtractionResult::recognized("  \n");
        assert!(empty.success);
        assert_eq!(empty.message, "No text detected in the image");
    }

    #[test]
    fn failures_carry_the_engine_message() {
        let result = ExtractionResult::failed(&OcrError::Failed("boom".into()));
        assert!(!result.success);
        assert!(result.text.is_empty());
        assert!(result.message.contains("boom"));
    }
}
