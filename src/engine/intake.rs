//! Local file intake: metadata, MIME detection and the base64 read.

use crate::error::WorkflowError;
use crate::model::SelectedFile;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use std::path::Path;
use tokio::io::AsyncReadExt;

const PDF_MAGIC: &[u8] = b"%PDF-";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type from the file header, falling back to the extension.
pub fn detect_mime(name: &str, head: &[u8]) -> &'static str {
    if head.starts_with(PDF_MAGIC) {
        return "application/pdf";
    }
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => OCTET_STREAM,
    }
}

/// Build a [`SelectedFile`] from a path without reading the whole file.
pub async fn describe(path: &Path) -> Result<SelectedFile, WorkflowError> {
    let read_err = |e: std::io::Error| WorkflowError::ReadFailed(format!("{}: {e}", path.display()));

    let meta = tokio::fs::metadata(path).await.map_err(read_err)?;
    if !meta.is_file() {
        return Err(WorkflowError::ReadFailed(format!(
            "{}: not a regular file",
            path.display()
        )));
    }

    let mut head = [0u8; 8];
    let mut f = tokio::fs::File::open(path).await.map_err(read_err)?;
    let n = f.read(&mut head).await.map_err(read_err)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = detect_mime(&name, &head[..n]).to_string();

    Ok(SelectedFile {
        path: path.to_path_buf(),
        name,
        size: meta.len(),
        mime,
    })
}

/// Read the selected file to completion and encode it for transport.
///
/// The size limit is checked again on the bytes actually read, since the file
/// may have changed after it was selected.
pub async fn read_base64(file: &SelectedFile, max_size: u64) -> Result<String, WorkflowError> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|e| WorkflowError::ReadFailed(format!("{}: {e}", file.path.display())))?;
    let size = bytes.len() as u64;
    if size > max_size {
        return Err(WorkflowError::TooLarge {
            size,
            max: max_size,
        });
    }
    Ok(B64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_wins_over_extension() {
        assert_eq!(detect_mime("resume.bin", b"%PDF-1.7\n"), "application/pdf");
        assert_eq!(detect_mime("resume.PDF", b""), "application/pdf");
        assert_eq!(detect_mime("photo.png", b"\x89PNG"), "image/png");
        assert_eq!(detect_mime("noext", b"hello"), OCTET_STREAM);
    }

    #[tokio::test]
    async fn describe_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        std::fs::write(&path, b"%PDF-1.4 body").unwrap();

        let file = describe(&path).await.unwrap();
        assert_eq!(file.name, "cv.pdf");
        assert_eq!(file.size, 13);
        assert_eq!(file.mime, "application/pdf");

        let encoded = read_base64(&file, 1024).await.unwrap();
        assert_eq!(B64.decode(encoded).unwrap(), b"%PDF-1.4 body");
    }

    #[tokio::test]
    async fn file_grown_after_selection_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let file = describe(&path).await.unwrap();
        assert_eq!(file.size, 8);

        std::fs::write(&path, b"%PDF-1.4 and much more").unwrap();
        let err = read_base64(&file, 16).await.unwrap_err();
        assert_eq!(err, WorkflowError::TooLarge { size: 22, max: 16 });
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = describe(&dir.path().join("nope.pdf")).await.unwrap_err();
        assert_eq!(err.kind(), "read_failed");

        let err = describe(dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), "read_failed");
    }
}
