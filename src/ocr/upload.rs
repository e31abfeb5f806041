use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// Lowercased extension of `filename`, if it has one.
pub fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduces a client supplied name to a safe single path component.
pub fn secure_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            _ => None,
        })
        .collect();

    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Uploaded bytes parked in a uniquely named temp file. The file is removed by
/// [`TempUpload::close`] or, failing that, on drop.
#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    pub fn create(dir: &Path, ext: &str, bytes: &[u8]) -> std::io::Result<Self> {
        let suffix = format!(".{}", ext);
        let mut file = tempfile::Builder::new()
            .prefix("ocr-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn close(self) -> std::io::Result<()> {
        self.file.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("scan.png", true)]
    #[case("photo.JPG", true)]
    #[case("photo.jpeg", true)]
    #[case("anim.gif", true)]
    #[case("bitmap.bmp", true)]
    #[case("fax.TIFF", true)]
    #[case("malware.exe", false)]
    #[case("archive.png.zip", false)]
    #[case("noextension", false)]
    #[case("trailingdot.", false)]
    fn extension_allow_list(#[case] name: &str, #[case] allowed: bool) {
        assert_eq!(allowed_file(name), allowed);
    }

    #[rstest]
    #[case("../../etc/passwd.png", "passwd.png")]
    #[case("C:\\Users\\me\\scan.png", "scan.png")]
    #[case("my scan (1).png", "my_scan_1.png")]
    #[case(".hidden.png", "hidden.png")]
    #[case("..", "upload")]
    #[case("", "upload")]
    #[case("résumé.jpg", "rsum.jpg")]
    fn secure_filename_cases(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(secure_filename(raw), expected);
    }

    #[test]
    fn temp_upload_is_removed_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let upload = TempUpload::create(dir.path(), "png", b"bytes").unwrap();
        let path = upload.path().to_path_buf();

        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("ocr-"));
        assert_eq!(std::fs::read(&path).unwrap(), b"bytes");

        upload.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn temp_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let upload = TempUpload::create(dir.path(), "jpg", b"x").unwrap();
            upload.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn concurrent_uploads_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempUpload::create(dir.path(), "png", b"a").unwrap();
        let b = TempUpload::create(dir.path(), "png", b"b").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
