use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{AnalyticsError, Result};

/// Folder the datasets are read from when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "./Data/";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Rows sampled per CSV when inferring column types. `None` or `0`
    /// scans every row, so a late `NULL` in a numeric-looking column still
    /// widens it to a string.
    pub infer_schema_length: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            infer_schema_length: None,
        }
    }
}

impl Config {
    /// Read a YAML config file. Keys left out keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| AnalyticsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text).map_err(|reason| AnalyticsError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn from_yaml_str(text: &str) -> std::result::Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    }

    /// Row count handed to the CSV reader; `None` means the whole file.
    pub fn inference_rows(&self) -> Option<usize> {
        self.infer_schema_length.filter(|n| *n > 0)
    }
}
