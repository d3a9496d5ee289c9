use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorCode {
    Io,
    CatalogLoad,
    SaveParse,
    Analysis,
    InvalidUpload,
    Persistence,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn persistence(context: &str, err: rusqlite::Error) -> Self {
        Self::new(CoreErrorCode::Persistence, format!("{context}: {err}"))
    }
}
