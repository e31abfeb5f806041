//! Image upload → text extraction.
//!
//! Two surfaces share one [`OcrService`]: the HTML form (`/`, `/extract`) and
//! the JSON API (`/api/extract`).

pub mod engine;
pub mod routes;
pub mod service;
pub mod upload;

pub use engine::{OcrEngine, OcrError, TesseractEngine};
pub use service::{validate_upload, ExtractionResult, OcrService, ValidatedUpload};
pub use upload::{allowed_file, secure_filename, TempUpload, ALLOWED_EXTENSIONS};
