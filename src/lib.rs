pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ocr;
pub mod quotes;
pub mod sentiment;
pub mod server;
pub mod telemetry;

pub use error::{AppError, Result};
