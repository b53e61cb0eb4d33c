use std::sync::{Arc, PoisonError, RwLock};

use socialdash_parser::SourceId;

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::ingestion::{run_pipeline, IngestionReport};
use crate::merge::CanonicalDataset;

/// Shares the current dataset with readers. A refresh builds a new dataset
/// and swaps it in whole; readers keep whatever snapshot they already hold.
#[derive(Debug, Default)]
pub struct DatasetHandle {
    current: RwLock<Arc<CanonicalDataset>>,
}

impl DatasetHandle {
    pub fn new(dataset: CanonicalDataset) -> Self {
        Self {
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    pub fn snapshot(&self) -> Arc<CanonicalDataset> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Installs `dataset` and returns the one it replaced.
    pub fn replace(&self, dataset: CanonicalDataset) -> Arc<CanonicalDataset> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(dataset))
    }

    /// Re-runs ingestion and swaps the result in.
    pub fn refresh(&self, config: &DashboardConfig, extra: &[SourceId]) -> Result<IngestionReport> {
        let output = run_pipeline(config, extra)?;
        self.replace(output.dataset);
        Ok(output.report)
    }
}
