//! JSON persistence for detection results.

use std::fs;
use std::path::Path;

use crate::result::ResultSet;

#[derive(thiserror::Error, Debug)]
pub enum ResultSetIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ResultSet {
    /// Load a result set from JSON on disk. Invariants are re-checked.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ResultSetIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this result set to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ResultSetIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
