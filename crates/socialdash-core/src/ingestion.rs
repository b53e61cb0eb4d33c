use std::collections::HashSet;

use serde::Serialize;
use socialdash_parser::{discover_sources, read_source, Platform, ReadOptions, SourceId, SourceOutcome};
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::merge::{merge, CanonicalDataset, NormalizedSource};
use crate::normalize::NormalizeStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded,
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub platform: Platform,
    pub status: SourceStatus,
    pub rows: usize,
    pub content_hash: Option<String>,
    pub message: Option<String>,
    pub stats: Option<NormalizeStats>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestionReport {
    pub sources: Vec<SourceReport>,
}

impl IngestionReport {
    pub fn loaded_count(&self) -> usize {
        self.count(SourceStatus::Loaded)
    }

    pub fn unavailable_count(&self) -> usize {
        self.count(SourceStatus::Unavailable)
    }

    pub fn total_rows(&self) -> usize {
        self.sources.iter().map(|report| report.rows).sum()
    }

    fn count(&self, status: SourceStatus) -> usize {
        self.sources
            .iter()
            .filter(|report| report.status == status)
            .count()
    }
}

#[derive(Debug)]
pub struct IngestionOutput {
    pub dataset: CanonicalDataset,
    pub report: IngestionReport,
}

/// Source order: configured paths, configured urls, discovered files, then
/// `extra`. Repeated sources keep their first position.
pub fn resolve_sources(config: &DashboardConfig, extra: &[SourceId]) -> Vec<SourceId> {
    let mut candidates: Vec<SourceId> = Vec::new();

    candidates.extend(
        config
            .sources
            .paths
            .iter()
            .map(|path| SourceId::Path(config.resolve_path(path))),
    );
    candidates.extend(config.sources.urls.iter().map(|url| SourceId::parse(url)));

    if let Some(dir) = &config.sources.discover_dir {
        let root = config.resolve_path(dir);
        match discover_sources(&root, &config.sources.discover_pattern) {
            Ok(found) => {
                info!(root = %root.display(), count = found.len(), "discovered sources");
                candidates.extend(found);
            }
            Err(err) => warn!("{err}"),
        }
    }

    candidates.extend(extra.iter().cloned());

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|source| seen.insert(dedup_key(source)))
        .collect()
}

/// Local paths compare by their canonical form so the same file reached
/// through different spellings is read once. Paths that cannot be
/// canonicalized (e.g. missing files) compare as written.
fn dedup_key(source: &SourceId) -> String {
    match source {
        SourceId::Path(path) => std::fs::canonicalize(path)
            .unwrap_or_else(|_| path.clone())
            .display()
            .to_string(),
        SourceId::Url(url) => url.clone(),
    }
}

/// Reads, normalizes and merges `sources` in order. Unavailable sources are
/// reported and contribute no rows; this never fails.
pub fn ingest_sources(sources: &[SourceId], options: &ReadOptions) -> IngestionOutput {
    let mut normalized = Vec::with_capacity(sources.len());
    let mut reports = Vec::with_capacity(sources.len());

    for source in sources {
        let platform = Platform::from_source(&source.to_string());
        match read_source(source, options) {
            SourceOutcome::Loaded {
                table,
                content_hash,
            } => {
                let (normalized_source, stats) = NormalizedSource::from_table(source.clone(), &table);
                info!(
                    source = %source,
                    platform = %platform,
                    rows = normalized_source.records.len(),
                    "normalized source"
                );
                reports.push(SourceReport {
                    source: source.to_string(),
                    platform,
                    status: SourceStatus::Loaded,
                    rows: normalized_source.records.len(),
                    content_hash: Some(content_hash),
                    message: None,
                    stats: Some(stats),
                });
                normalized.push(normalized_source);
            }
            SourceOutcome::Unavailable { reason, .. } => {
                warn!(source = %source, "source unavailable: {reason}");
                reports.push(SourceReport {
                    source: source.to_string(),
                    platform,
                    status: SourceStatus::Unavailable,
                    rows: 0,
                    content_hash: None,
                    message: Some(reason),
                    stats: None,
                });
            }
        }
    }

    let dataset = merge(normalized);
    info!(
        sources = sources.len(),
        rows = dataset.len(),
        "merged canonical dataset"
    );

    IngestionOutput {
        dataset,
        report: IngestionReport { sources: reports },
    }
}

/// Resolves sources from `config` (plus `extra`) and runs the whole pipeline.
pub fn run_pipeline(config: &DashboardConfig, extra: &[SourceId]) -> Result<IngestionOutput> {
    let options = config.read_options()?;
    let sources = resolve_sources(config, extra);
    if sources.is_empty() {
        warn!("no sources configured");
    }
    Ok(ingest_sources(&sources, &options))
}
