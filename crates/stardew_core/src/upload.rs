//! Validation and scoped staging of uploaded save documents.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};

use crate::core_api::{CoreError, CoreErrorCode};

/// Saves usually have no extension; exported copies are `.xml` or `.txt`.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["xml", "txt", ""];
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const FALLBACK_FILENAME: &str = "save_file";
/// Staged names must fit the 255-byte file name limit with tempfile's suffix.
const STAGED_PREFIX_MAX_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub allowed_extensions: Vec<String>,
    pub max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn validate<'a>(
        &self,
        upload: Option<&'a UploadedFile>,
    ) -> Result<&'a UploadedFile, CoreError> {
        let Some(upload) = upload else {
            return Err(CoreError::new(CoreErrorCode::InvalidUpload, "No file provided"));
        };
        if upload.filename.is_empty() {
            return Err(CoreError::new(CoreErrorCode::InvalidUpload, "No file selected"));
        }
        if !self.is_allowed_filename(&upload.filename) {
            return Err(CoreError::new(
                CoreErrorCode::InvalidUpload,
                "Invalid file type. Please upload a Stardew Valley save file.",
            ));
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(CoreError::new(
                CoreErrorCode::InvalidUpload,
                format!(
                    "File too large: {} bytes exceeds the {} byte limit",
                    upload.bytes.len(),
                    self.max_bytes
                ),
            ));
        }
        Ok(upload)
    }

    pub fn is_allowed_filename(&self, filename: &str) -> bool {
        let Some((_, extension)) = filename.rsplit_once('.') else {
            return true;
        };
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

/// Reduces a client-supplied filename to `[A-Za-z0-9_.-]`, with no path
/// components or leading/trailing dots and underscores.
pub fn sanitize_filename(filename: &str) -> String {
    let flattened = filename.replace(['/', '\\'], " ");
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitised filename truncated for use as a temp-file prefix.
fn staged_prefix(filename: &str) -> String {
    sanitize_filename(filename)
        .chars()
        .take(STAGED_PREFIX_MAX_CHARS)
        .collect()
}

/// An upload written to a private temporary file. The file is removed when
/// this value is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Error messages name neither the upload directory nor the staged
    /// path; those are logged instead.
    pub fn stage(dir: &Path, upload: &UploadedFile) -> Result<Self, CoreError> {
        let prefix = format!("{}-", staged_prefix(&upload.filename));
        let mut file = Builder::new()
            .prefix(&prefix)
            .tempfile_in(dir)
            .map_err(|e| {
                warn!(dir = %dir.display(), error = %e, "failed to create staged upload");
                CoreError::new(
                    CoreErrorCode::Io,
                    format!("failed to stage upload: {}", e.kind()),
                )
            })?;
        file.write_all(&upload.bytes)
            .and_then(|()| file.flush())
            .map_err(|e| {
                warn!(path = %file.path().display(), error = %e, "failed to write staged upload");
                CoreError::new(
                    CoreErrorCode::Io,
                    format!("failed to write upload: {}", e.kind()),
                )
            })?;
        debug!(path = %file.path().display(), bytes = upload.bytes.len(), "staged upload");
        Ok(Self { file })
    }

    pub fn read(&self) -> Result<Vec<u8>, CoreError> {
        fs::read(self.file.path()).map_err(|e| {
            warn!(path = %self.file.path().display(), error = %e, "failed to read staged upload");
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read staged upload: {}", e.kind()),
            )
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
