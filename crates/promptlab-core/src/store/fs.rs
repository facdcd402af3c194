//! Filesystem-backed experiment store.
//!
//! Layout under the data root:
//!
//! ```text
//! <root>/<experiment_id>/experiment.json
//! <root>/<experiment_id>/responses/<response_id>.json
//! <root>/<experiment_id>/responses/<response_id>.digest
//! ```
//!
//! Every response artifact is written together with the SHA-256 digest of
//! its JSON bytes; reads verify the digest and fail with
//! `StoreError::DigestMismatch` on corruption.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{ExperimentRecord, ExperimentSummary, NewResponse, ResponseRecord};

use super::{
    sort_responses, ContentDigest, ExperimentPage, ExperimentStore, ResponseSort, SortOrder,
    StoreError, StoreResult,
};

const EXPERIMENT_FILE: &str = "experiment.json";
const RESPONSES_DIR: &str = "responses";

/// Experiment store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FsExperimentStore {
    root: PathBuf,
}

impl FsExperimentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn experiment_dir(&self, id: Uuid) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn load_experiment(&self, id: Uuid) -> StoreResult<ExperimentRecord> {
        let path = self.experiment_dir(id).join(EXPERIMENT_FILE);
        if !path.exists() {
            return Err(StoreError::ExperimentNotFound { id });
        }
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_experiment(&self, record: &ExperimentRecord) -> StoreResult<()> {
        let dir = self.experiment_dir(record.id);
        std::fs::create_dir_all(&dir)?;
        let json = serde_json::to_vec_pretty(record)?;
        std::fs::write(dir.join(EXPERIMENT_FILE), json)?;
        Ok(())
    }

    fn read_response(&self, path: &Path) -> StoreResult<ResponseRecord> {
        let json = std::fs::read(path)?;
        let digest_path = path.with_extension("digest");
        let recorded = std::fs::read_to_string(digest_path)?;
        let actual = ContentDigest::from_bytes(&json);
        if recorded.trim() != actual.as_str() {
            return Err(StoreError::DigestMismatch {
                expected: recorded.trim().to_string(),
                actual: actual.as_str().to_string(),
            });
        }
        Ok(serde_json::from_slice(&json)?)
    }

    fn response_count(&self, id: Uuid) -> usize {
        let dir = self.experiment_dir(id).join(RESPONSES_DIR);
        match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().map_or(false, |ext| ext == "json"))
                .count(),
            Err(_) => 0,
        }
    }
}

#[async_trait]
impl ExperimentStore for FsExperimentStore {
    async fn create_experiment(&self, prompt: &str) -> StoreResult<ExperimentRecord> {
        let record = ExperimentRecord::new(prompt);
        self.write_experiment(&record)?;
        Ok(record)
    }

    async fn get_experiment(&self, id: Uuid) -> StoreResult<ExperimentRecord> {
        self.load_experiment(id)
    }

    async fn list_experiments(&self, limit: usize, offset: usize) -> StoreResult<ExperimentPage> {
        let mut summaries = Vec::new();

        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            // A store that has never been written to is an empty listing.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ExperimentPage {
                    experiments: Vec::new(),
                    total: 0,
                })
            }
            Err(err) => return Err(err.into()),
        };

        for entry in entries {
            let entry = entry?;
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| Uuid::parse_str(name).ok())
            else {
                continue;
            };
            let record = self.load_experiment(id)?;
            summaries.push(ExperimentSummary {
                id: record.id,
                prompt: record.prompt,
                response_count: self.response_count(id),
                created_at: record.created_at,
                updated_at: record.updated_at,
            });
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let total = summaries.len();
        let experiments = summaries.into_iter().skip(offset).take(limit).collect();

        Ok(ExperimentPage { experiments, total })
    }

    async fn append_response(
        &self,
        experiment_id: Uuid,
        response: NewResponse,
    ) -> StoreResult<ResponseRecord> {
        let mut experiment = self.load_experiment(experiment_id)?;

        let record = ResponseRecord::from_new(response);
        let dir = self.experiment_dir(experiment_id).join(RESPONSES_DIR);
        std::fs::create_dir_all(&dir)?;

        let json = serde_json::to_vec_pretty(&record)?;
        let digest = ContentDigest::from_bytes(&json);
        let path = dir.join(format!("{}.json", record.id));
        std::fs::write(&path, &json)?;
        std::fs::write(path.with_extension("digest"), digest.as_str().as_bytes())?;

        experiment.updated_at = Utc::now();
        self.write_experiment(&experiment)?;

        Ok(record)
    }

    async fn list_responses(
        &self,
        experiment_id: Uuid,
        sort: ResponseSort,
        order: SortOrder,
    ) -> StoreResult<Vec<ResponseRecord>> {
        // Existence check first so an empty experiment is distinguishable
        // from a missing one.
        self.load_experiment(experiment_id)?;

        let dir = self.experiment_dir(experiment_id).join(RESPONSES_DIR);
        let mut responses = Vec::new();

        if dir.exists() {
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                let path = entry.path();
                if path.extension().map_or(false, |ext| ext == "json") {
                    responses.push(self.read_response(&path)?);
                }
            }
        }

        sort_responses(&mut responses, sort, order);
        Ok(responses)
    }
}
