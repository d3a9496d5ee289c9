use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::save;

use super::analyzer::analyze;
use super::catalog::Catalog;
use super::error::{CoreError, CoreErrorCode};
use super::types::{ProgressReport, RawProgress};

#[derive(Debug, Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
}

/// A parsed save together with its analysis against the catalog.
#[derive(Debug, Clone)]
pub struct Session {
    progress: RawProgress,
    report: ProgressReport,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let progress = save::extract_progress_bytes(bytes.as_ref())?;
        self.open_progress(progress)
    }

    pub fn open_path(&self, path: &Path) -> Result<Session, CoreError> {
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        self.open_bytes(bytes).map_err(|e| {
            CoreError::new(e.code, format!("{}: {}", path.display(), e.message))
        })
    }

    pub fn open_progress(&self, progress: RawProgress) -> Result<Session, CoreError> {
        let report = analyze(&self.catalog, &progress)?;
        Ok(Session { progress, report })
    }
}

impl Session {
    pub fn progress(&self) -> &RawProgress {
        &self.progress
    }

    pub fn report(&self) -> &ProgressReport {
        &self.report
    }

    pub fn into_report(self) -> ProgressReport {
        self.report
    }
}
