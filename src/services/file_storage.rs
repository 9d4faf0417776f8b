//! Document store
//! 
//! Every upload is checked in a fixed order before anything touches the
//! disk: size ceiling, declared MIME type, extension, then the magic bytes
//! of the content. Accepted files get a random name under the policy's
//! subdirectory of the upload root.

use axum::body::Bytes;
use chrono::Utc;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::utils::codes::stored_file_name;
use crate::utils::errors::AppError;

const MB: usize = 1024 * 1024;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

lazy_static! {
    /// Accepted MIME types and the extensions each may carry.
    static ref ALLOWED_TYPES: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert(MIME_PDF, &["pdf"]);
        m.insert(MIME_JPEG, &["jpg", "jpeg"]);
        m.insert(MIME_PNG, &["png"]);
        m.insert(MIME_DOC, &["doc"]);
        m.insert(MIME_DOCX, &["docx"]);
        m
    };
}

#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub subdir: &'static str,
}

impl UploadPolicy {
    pub const DOCUMENT: UploadPolicy = UploadPolicy {
        max_bytes: 10 * MB,
        subdir: "documents",
    };

    pub const DRIVER_ATTACHMENT: UploadPolicy = UploadPolicy {
        max_bytes: 5 * MB,
        subdir: "driver_documents",
    };

    pub fn max_megabytes(&self) -> usize {
        self.max_bytes / MB
    }
}

/// A file part read from a multipart body, not yet validated.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub original_name: String,
    /// Path relative to the upload root, with forward slashes.
    pub file_path: String,
    pub absolute_path: PathBuf,
    pub mime_type: String,
    pub size: i64,
}

/// Check an upload against `policy`. Returns the normalized MIME type and
/// the lowercase extension to store it under.
pub fn validate_upload(
    file: &UploadedFile,
    policy: &UploadPolicy,
) -> Result<(&'static str, String), AppError> {
    if file.bytes.len() > policy.max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "File '{}' exceeds the maximum size of {} MB",
            file.file_name,
            policy.max_megabytes()
        )));
    }
    if file.bytes.is_empty() {
        return Err(AppError::BadRequest(format!("File '{}' is empty", file.file_name)));
    }

    let declared = file
        .content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let Some((&mime, extensions)) = ALLOWED_TYPES.get_key_value(declared.as_str()) else {
        return Err(AppError::UnsupportedMediaType(format!(
            "File type '{}' is not allowed. Allowed types: PDF, JPEG, PNG, DOC, DOCX",
            if declared.is_empty() { "unknown" } else { declared.as_str() }
        )));
    };

    let extension = Path::new(&file.file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if !extensions.contains(&extension.as_str()) {
        return Err(AppError::UnsupportedMediaType(format!(
            "File extension '.{}' does not match type '{}'",
            extension, mime
        )));
    }

    if sniff_mime(&file.bytes) != Some(mime) {
        return Err(AppError::UnsupportedMediaType(format!(
            "Content of '{}' does not match type '{}'",
            file.file_name, mime
        )));
    }

    Ok((mime, extension))
}

/// Identify an allowed type from its leading bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [b'%', b'P', b'D', b'F', ..] => Some(MIME_PDF),
        [0xFF, 0xD8, 0xFF, ..] => Some(MIME_JPEG),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(MIME_PNG),
        // OLE2 compound file (legacy Word)
        [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, ..] => Some(MIME_DOC),
        // ZIP container (OOXML)
        [b'P', b'K', 0x03, 0x04, ..] => Some(MIME_DOCX),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and write one file.
    pub async fn store(&self, file: &UploadedFile, policy: &UploadPolicy) -> Result<StoredFile, AppError> {
        let (mime, extension) = validate_upload(file, policy)?;

        let dir = self.root.join(policy.subdir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Storage(format!("Cannot create {}: {}", dir.display(), e)))?;

        let name = stored_file_name(Utc::now(), &extension);
        let absolute_path = dir.join(&name);
        tokio::fs::write(&absolute_path, &file.bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Cannot write {}: {}", absolute_path.display(), e)))?;

        info!("📄 Stored '{}' as {}/{}", file.file_name, policy.subdir, name);

        Ok(StoredFile {
            original_name: file.file_name.clone(),
            file_path: format!("{}/{}", policy.subdir, name),
            absolute_path,
            mime_type: mime.to_string(),
            size: file.bytes.len() as i64,
        })
    }

    /// Validate every file first, then write them all. Nothing is written
    /// unless all files pass; a failed write removes the ones already stored.
    pub async fn store_all(
        &self,
        files: &[UploadedFile],
        policy: &UploadPolicy,
    ) -> Result<Vec<StoredFile>, AppError> {
        for file in files {
            validate_upload(file, policy)?;
        }

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            match self.store(file, policy).await {
                Ok(s) => stored.push(s),
                Err(e) => {
                    self.remove_all(&stored).await;
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    pub async fn remove(&self, file: &StoredFile) {
        if let Err(e) = tokio::fs::remove_file(&file.absolute_path).await {
            warn!("⚠️ Could not remove {}: {}", file.absolute_path.display(), e);
        }
    }

    pub async fn remove_all(&self, files: &[StoredFile]) {
        for file in files {
            self.remove(file).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF: &[u8] = b"%PDF-1.4\n%test document\n";
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    fn upload(name: &str, content_type: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            field_name: "file".to_string(),
            file_name: name.to_string(),
            content_type: Some(content_type.to_string()),
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    #[test]
    fn test_accepts_matching_pdf() {
        let (mime, ext) = validate_upload(&upload("permit.PDF", "application/pdf", PDF), &UploadPolicy::DOCUMENT).unwrap();
        assert_eq!(mime, MIME_PDF);
        assert_eq!(ext, "pdf");
    }

    #[test]
    fn test_size_is_checked_before_type() {
        let big = vec![0u8; UploadPolicy::DRIVER_ATTACHMENT.max_bytes + 1];
        let err = validate_upload(&upload("notes.txt", "text/plain", &big), &UploadPolicy::DRIVER_ATTACHMENT)
            .unwrap_err();
        match err {
            AppError::PayloadTooLarge(msg) => assert!(msg.contains("5 MB"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_rejects_disallowed_type() {
        let err = validate_upload(&upload("run.exe", "application/x-msdownload", b"MZ\x90\x00"), &UploadPolicy::DOCUMENT)
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_rejects_extension_mismatch() {
        let err = validate_upload(&upload("scan.png", "application/pdf", PDF), &UploadPolicy::DOCUMENT).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_rejects_spoofed_content() {
        let err = validate_upload(&upload("scan.png", "image/png", PDF), &UploadPolicy::DOCUMENT).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
        assert!(validate_upload(&upload("scan.png", "image/png; charset=binary", PNG), &UploadPolicy::DOCUMENT).is_ok());
    }

    #[test]
    fn test_sniff() {
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(MIME_JPEG));
        assert_eq!(sniff_mime(b"PK\x03\x04rest"), Some(MIME_DOCX));
        assert_eq!(sniff_mime(b"hello"), None);
    }

    #[tokio::test]
    async fn test_store_all_writes_nothing_when_one_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let files = vec![
            upload("a.pdf", "application/pdf", PDF),
            upload("b.gif", "image/gif", b"GIF89a"),
        ];

        assert!(storage.store_all(&files, &UploadPolicy::DRIVER_ATTACHMENT).await.is_err());
        assert!(!dir.path().join("driver_documents").exists());
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let stored = storage
            .store(&upload("permit.pdf", "application/pdf", PDF), &UploadPolicy::DOCUMENT)
            .await
            .unwrap();
        assert!(stored.file_path.starts_with("documents/"));
        assert!(stored.file_path.ends_with(".pdf"));
        assert_eq!(std::fs::read(&stored.absolute_path).unwrap(), PDF);

        storage.remove(&stored).await;
        assert!(!stored.absolute_path.exists());
    }
}
