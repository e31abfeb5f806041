#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
};
use mini_services::ocr::{OcrEngine, OcrError};
use serde_json::Value;

pub const BOUNDARY: &str = "----mini-services-test-boundary";

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Single-file multipart form upload.
pub fn multipart_upload(uri: &str, field: &str, filename: &str, content: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

/// Small white PNG that decodes cleanly.
pub fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
        .unwrap();
    buf
}

/// 8x8 all-white 1-bit TIFF, the layout fax and document scanners emit.
pub fn bilevel_tiff_bytes() -> Vec<u8> {
    const DATA_OFFSET: u32 = 8 + 2 + 8 * 12 + 4;
    // (tag, field type, value); type 3 = SHORT, 4 = LONG
    let entries: [(u16, u16, u32); 8] = [
        (256, 3, 8),           // ImageWidth
        (257, 3, 8),           // ImageLength
        (258, 3, 1),           // BitsPerSample
        (259, 3, 1),           // Compression: none
        (262, 3, 0),           // PhotometricInterpretation: WhiteIsZero
        (273, 4, DATA_OFFSET), // StripOffsets
        (278, 3, 8),           // RowsPerStrip
        (279, 4, 8),           // StripByteCounts
    ];

    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());
    buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for (tag, kind, value) in entries {
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&kind.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        if kind == 3 {
            buf.extend_from_slice(&(value as u16).to_le_bytes());
            buf.extend_from_slice(&[0, 0]);
        } else {
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.extend_from_slice(&[0u8; 8]);
    buf
}

pub fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

/// Scripted engine that records how it was called.
pub struct MockEngine {
    text: Result<String, String>,
    version: Result<String, String>,
    pub calls: AtomicUsize,
    pub saw_file: AtomicBool,
}

impl MockEngine {
    pub fn recognizing(text: &str) -> Self {
        Self {
            text: Ok(text.to_string()),
            version: Ok("5.3.0".to_string()),
            calls: AtomicUsize::new(0),
            saw_file: AtomicBool::new(false),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            text: Err(message.to_string()),
            ..Self::recognizing("")
        }
    }

    pub fn unavailable() -> Self {
        Self {
            version: Err("tesseract is not installed or not in PATH".to_string()),
            ..Self::recognizing("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for MockEngine {
    async fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.saw_file.store(image.exists(), Ordering::SeqCst);
        self.text.clone().map_err(OcrError::Failed)
    }

    async fn version(&self) -> Result<String, OcrError> {
        self.version.clone().map_err(OcrError::Unavailable)
    }
}
