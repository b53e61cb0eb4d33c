use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use socialdash_parser::source::{DEFAULT_DISCOVERY_PATTERN, DEFAULT_TIMEOUT};
use socialdash_parser::ReadOptions;

use crate::aggregates::DEFAULT_TOP_N;
use crate::error::{PipelineError, Result};

pub const CONFIG_ENV_VAR: &str = "SOCIALDASH_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub sources: SourcesConfig,
    pub reader: ReaderConfig,
    pub dashboard: DisplayConfig,
    /// Directory of the file this was loaded from; relative paths resolve
    /// against it.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    pub paths: Vec<PathBuf>,
    pub urls: Vec<String>,
    pub discover_dir: Option<PathBuf>,
    pub discover_pattern: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            urls: Vec::new(),
            discover_dir: None,
            discover_pattern: DEFAULT_DISCOVERY_PATTERN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    pub timeout_secs: u64,
    pub delimiter: char,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub top_n: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.reader.delimiter.is_ascii() {
            return Err(PipelineError::Config(format!(
                "reader.delimiter must be a single ASCII character, got '{}'",
                self.reader.delimiter
            )));
        }
        if self.reader.timeout_secs == 0 {
            return Err(PipelineError::Config(
                "reader.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn read_options(&self) -> Result<ReadOptions> {
        self.validate()?;
        Ok(ReadOptions {
            timeout: Duration::from_secs(self.reader.timeout_secs),
            delimiter: self.reader.delimiter as u8,
        })
    }

    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
