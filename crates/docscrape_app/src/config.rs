use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use docscrape_engine::{write_atomic, ExportError, TransportSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write config: {0}")]
    Write(#[from] ExportError),
    #[error("{0} already exists (use --force to overwrite)")]
    Exists(PathBuf),
}

/// Operator settings persisted as RON next to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let transport = TransportSettings::default();
        Self {
            backend_url: transport.base_url,
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            request_timeout_secs: transport.request_timeout.as_secs(),
            output_dir: PathBuf::from("output"),
            log_to_file: false,
        }
    }
}

impl AppConfig {
    /// A missing file yields the defaults; an unreadable or invalid one is an
    /// error the caller may downgrade to the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path, overwrite: bool) -> Result<PathBuf, ConfigError> {
        if path.exists() && !overwrite {
            return Err(ConfigError::Exists(path.to_path_buf()));
        }
        let content = self.to_ron()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::cli::DEFAULT_CONFIG_FILE.to_string());
        Ok(write_atomic(dir, &filename, content.as_bytes())?)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new();
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn with_backend_url(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|url| !url.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        self
    }

    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            base_url: self.backend_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ..TransportSettings::default()
        }
    }
}
