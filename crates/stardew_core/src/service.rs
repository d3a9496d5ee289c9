//! Request-level facade: one call per uploaded save, from validation through
//! persistence and diffing. Transport layers map `CoreError` codes onto their
//! own status codes.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::core_api::{AnalysisResponse, Catalog, CoreError, Engine, HealthStatus, Session};
use crate::store::SnapshotStore;
use crate::upload::{StagedUpload, UploadPolicy, UploadedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub upload_dir: PathBuf,
    pub upload_policy: UploadPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            upload_dir: env::temp_dir(),
            upload_policy: UploadPolicy::default(),
        }
    }
}

pub struct TrackerService {
    engine: Engine,
    store: SnapshotStore,
    config: ServiceConfig,
}

impl TrackerService {
    pub fn new(catalog: Arc<Catalog>, store: SnapshotStore, config: ServiceConfig) -> Self {
        Self {
            engine: Engine::new(catalog),
            store,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.engine.catalog()
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus { status: "ok" }
    }

    /// Validates and stages the upload, then analyzes, records and diffs it.
    /// The staged copy is removed before this returns, whatever the outcome.
    pub fn analyze_upload(
        &self,
        upload: Option<&UploadedFile>,
    ) -> Result<AnalysisResponse, CoreError> {
        let upload = self.config.upload_policy.validate(upload)?;
        info!(filename = %upload.filename, bytes = upload.bytes.len(), "analyzing upload");

        let session = {
            let staged = StagedUpload::stage(&self.config.upload_dir, upload)?;
            self.engine.open_bytes(staged.read()?)?
        };
        self.record_session(session)
    }

    pub fn analyze_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<AnalysisResponse, CoreError> {
        let session = self.engine.open_bytes(bytes)?;
        self.record_session(session)
    }

    fn record_session(&self, session: Session) -> Result<AnalysisResponse, CoreError> {
        let report = session.into_report();
        let snapshot = self.store.record(self.engine.catalog(), &report)?;
        let progress_since = self.store.progress_since(&snapshot)?;
        Ok(AnalysisResponse {
            snapshot_id: snapshot.id,
            report,
            progress_since,
        })
    }
}
