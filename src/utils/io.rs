//! Filesystem helpers for JSON configuration/definition files.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::error::{Error, Result};

/// Read and decode a JSON config/definition file.
///
/// `filename` may be absolute, `~`-prefixed, or relative to `root`.
/// Fails with `config.file_not_found` / `config.invalid_json`.
pub fn read_config_file(root: &Path, filename: &str) -> Result<Value> {
    let expanded = shellexpand::tilde(filename).to_string();
    let candidate = PathBuf::from(&expanded);
    let path = if candidate.is_absolute() {
        candidate
    } else {
        root.join(candidate)
    };

    let raw = std::fs::read_to_string(&path)
        .map_err(|_| Error::config_file_not_found(path.display().to_string()))?;

    serde_json::from_str(&raw).map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}
