use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings a [`SpreadsheetClient`](crate::client::SpreadsheetClient) is
/// authorized with. Built explicitly and handed over; there is no global
/// client state.
///
/// Loaded from JSON; missing fields take their defaults:
///
/// ```json
/// { "root": "./sheets", "default_rows": 200, "default_cols": 200, "backup_on_save": false }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Directory holding one `<name>.xlsx` per spreadsheet
    pub root: PathBuf,
    /// Grid size given to newly created worksheets
    pub default_rows: usize,
    pub default_cols: usize,
    /// Copy the previous file to `<name>_<timestamp>.xlsx` before overwriting
    pub backup_on_save: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            default_rows: 200,
            default_cols: 200,
            backup_on_save: false,
        }
    }
}

impl ClientConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file: {}", path.display()))?;

        let config: ClientConfig = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        if config.default_rows == 0 || config.default_cols == 0 {
            anyhow::bail!("default_rows and default_cols must be at least 1");
        }

        Ok(config)
    }
}
