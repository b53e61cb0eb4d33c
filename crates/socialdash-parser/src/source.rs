use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use glob::MatchOptions;

use crate::errors::SourceError;
use crate::model::RawTable;
use crate::table::decode_table;

pub const DEFAULT_DISCOVERY_PATTERN: &str = "**/*.csv";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where one tabular source lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    Path(PathBuf),
    Url(String),
}

impl SourceId {
    /// `http://` and `https://` identifiers are remote; everything else is a path.
    pub fn parse(identifier: &str) -> SourceId {
        let trimmed = identifier.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceId::Url(trimmed.to_string())
        } else {
            SourceId::Path(PathBuf::from(trimmed))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceId::Url(_))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceId::Path(path) => write!(f, "{}", path.display()),
            SourceId::Url(url) => f.write_str(url),
        }
    }
}

impl From<&str> for SourceId {
    fn from(value: &str) -> Self {
        SourceId::parse(value)
    }
}

impl From<PathBuf> for SourceId {
    fn from(value: PathBuf) -> Self {
        SourceId::Path(value)
    }
}

#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub timeout: Duration,
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            delimiter: b',',
        }
    }
}

#[derive(Debug, Clone)]
pub enum SourceOutcome {
    Loaded { table: RawTable, content_hash: String },
    Unavailable { source: SourceId, reason: String },
}

impl SourceOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, SourceOutcome::Loaded { .. })
    }
}

/// Reads one source. Every failure becomes `Unavailable` with its diagnostic.
pub fn read_source(source: &SourceId, options: &ReadOptions) -> SourceOutcome {
    match try_read_source(source, options) {
        Ok(outcome) => outcome,
        Err(err) => SourceOutcome::Unavailable {
            source: source.clone(),
            reason: err.to_string(),
        },
    }
}

fn try_read_source(source: &SourceId, options: &ReadOptions) -> Result<SourceOutcome, SourceError> {
    let source_id = source.to_string();
    let bytes = match source {
        SourceId::Path(path) => read_local(&source_id, path)?,
        SourceId::Url(url) => fetch_remote(&source_id, url, options.timeout)?,
    };
    let content_hash = blake3_hex(&bytes);
    let content = String::from_utf8(bytes).map_err(|_| SourceError::Utf8 {
        source_id: source_id.clone(),
    })?;
    let table = decode_table(&source_id, &content, options.delimiter)?;
    Ok(SourceOutcome::Loaded {
        table,
        content_hash,
    })
}

fn read_local(source_id: &str, path: &Path) -> Result<Vec<u8>, SourceError> {
    if !path.is_file() {
        return Err(SourceError::NotFound {
            source_id: source_id.to_string(),
        });
    }
    std::fs::read(path).map_err(|source| SourceError::Io {
        source_id: source_id.to_string(),
        source,
    })
}

fn fetch_remote(source_id: &str, url: &str, timeout: Duration) -> Result<Vec<u8>, SourceError> {
    let http_error = |message: String| SourceError::Http {
        source_id: source_id.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| http_error(err.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|err| http_error(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(http_error(format!("unexpected status {status}")));
    }

    response
        .bytes()
        .map(|body| body.to_vec())
        .map_err(|err| http_error(err.to_string()))
}

fn blake3_hex(contents: &[u8]) -> String {
    blake3::hash(contents).to_hex().to_string()
}

/// Recursively lists files under `root` matching `pattern`, sorted by path.
pub fn discover_sources(root: &Path, pattern: &str) -> Result<Vec<SourceId>, SourceError> {
    let discovery_error = |message: String| SourceError::Discovery {
        root: root.display().to_string(),
        message,
    };

    if !root.is_dir() {
        return Err(discovery_error("not a directory".to_string()));
    }

    let full_pattern = root.join(pattern);
    let full_pattern = full_pattern
        .to_str()
        .ok_or_else(|| discovery_error("path is not valid UTF-8".to_string()))?;

    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let mut paths = Vec::new();
    for entry in glob::glob_with(full_pattern, options).map_err(|err| discovery_error(err.to_string()))? {
        // Unreadable entries are skipped.
        let Ok(path) = entry else {
            continue;
        };
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths.into_iter().map(SourceId::Path).collect())
}
