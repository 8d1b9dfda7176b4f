//! Snapshot persistence.
//!
//! Every batch job writes JSON arrays sorted by (dept, number) and the
//! stores read them back. Layout under the data directory:
//!
//! ```text
//! {root}/
//! ├── config.toml           # Harvester and store configuration
//! ├── outlines.json         # Catalog-wide course outlines
//! ├── instructors.json      # Instructor index
//! └── sections/
//!     ├── 2025-spring.json  # One section snapshot per term
//!     └── 2025-summer.json
//! ```

pub mod local;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::TermKey;

pub use local::LocalStorage;

/// File layout of a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLayout {
    root: PathBuf,
}

impl SnapshotLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn sections_path(&self, term: &TermKey) -> PathBuf {
        self.root.join(Self::sections_key(term))
    }

    pub fn outlines_path(&self) -> PathBuf {
        self.root.join(Self::OUTLINES_KEY)
    }

    pub fn instructors_path(&self) -> PathBuf {
        self.root.join(Self::INSTRUCTORS_KEY)
    }

    pub(crate) const OUTLINES_KEY: &'static str = "outlines.json";
    pub(crate) const INSTRUCTORS_KEY: &'static str = "instructors.json";

    pub(crate) fn sections_key(term: &TermKey) -> String {
        format!("sections/{}.json", term.code())
    }
}

/// Read and decode a snapshot file.
///
/// Blocking; stores call this under their own lock. A missing or malformed
/// file is a [`AppError::Persistence`] naming the path.
pub fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| AppError::persistence(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::persistence(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let layout = SnapshotLayout::new("/data");
        let term: TermKey = "2025-summer".parse().unwrap();
        assert_eq!(
            layout.sections_path(&term),
            PathBuf::from("/data/sections/2025-summer.json")
        );
        assert_eq!(layout.outlines_path(), PathBuf::from("/data/outlines.json"));
        assert_eq!(layout.config_path(), PathBuf::from("/data/config.toml"));
    }

    #[test]
    fn test_read_snapshot_errors_name_the_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.json");
        let err = read_snapshot::<Vec<u8>>(&missing).unwrap_err();
        assert!(matches!(err, AppError::Persistence { .. }));
        assert!(err.to_string().contains("missing.json"));

        let bad = tmp.path().join("bad.json");
        fs::write(&bad, b"{not json").unwrap();
        assert!(matches!(
            read_snapshot::<Vec<u8>>(&bad),
            Err(AppError::Persistence { .. })
        ));
    }
}
