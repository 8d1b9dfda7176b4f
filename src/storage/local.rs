//! Local filesystem snapshot writer.
//!
//! Snapshots are written whole: serialize, write to a sibling `.tmp` file,
//! then rename over the target. A reader never sees a half-written file.

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{CourseOutline, CourseWithSectionDetails, InstructorResponse, TermKey};
use crate::storage::SnapshotLayout;

/// Async reader/writer for the snapshot files of one data directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    layout: SnapshotLayout,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout: SnapshotLayout::new(root_dir),
        }
    }

    pub fn layout(&self) -> &SnapshotLayout {
        &self.layout
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.layout.root().join(key)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::persistence(parent, e))?;
        }

        write_atomic(&path, bytes)
            .await
            .map_err(|e| AppError::persistence(&path, e))
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| AppError::persistence(self.path(key), e))?;
        self.write_bytes(key, &bytes).await
    }

    /// Read JSON data, returning None if the file doesn't exist.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::persistence(&path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| AppError::persistence(&path, e))
    }

    /// Write one term's section snapshot. Callers pass finalized, sorted courses.
    pub async fn write_sections(
        &self,
        term: &TermKey,
        courses: &[CourseWithSectionDetails],
    ) -> Result<()> {
        let key = SnapshotLayout::sections_key(term);
        self.write_json(&key, courses).await?;
        log::info!("{} courses written to {}", courses.len(), key);
        Ok(())
    }

    pub async fn read_sections(
        &self,
        term: &TermKey,
    ) -> Result<Option<Vec<CourseWithSectionDetails>>> {
        self.read_json(&SnapshotLayout::sections_key(term)).await
    }

    pub async fn write_outlines(&self, outlines: &[CourseOutline]) -> Result<()> {
        self.write_json(SnapshotLayout::OUTLINES_KEY, outlines).await?;
        log::info!(
            "{} outlines written to {}",
            outlines.len(),
            SnapshotLayout::OUTLINES_KEY
        );
        Ok(())
    }

    pub async fn read_outlines(&self) -> Result<Option<Vec<CourseOutline>>> {
        self.read_json(SnapshotLayout::OUTLINES_KEY).await
    }

    pub async fn write_instructors(&self, instructors: &[InstructorResponse]) -> Result<()> {
        self.write_json(SnapshotLayout::INSTRUCTORS_KEY, instructors)
            .await?;
        log::info!(
            "{} instructors written to {}",
            instructors.len(),
            SnapshotLayout::INSTRUCTORS_KEY
        );
        Ok(())
    }

    pub async fn read_instructors(&self) -> Result<Option<Vec<InstructorResponse>>> {
        self.read_json(SnapshotLayout::INSTRUCTORS_KEY).await
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);
    tokio::fs::rename(&tmp, path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"hello").await.unwrap();
        assert_eq!(std::fs::read(tmp.path().join("test.txt")).unwrap(), b"hello");
        assert!(!tmp.path().join("test.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.read_outlines().await.unwrap().is_none());
        let term: TermKey = "2025-fall".parse().unwrap();
        assert!(storage.read_sections(&term).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sections_round_trip_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let term: TermKey = "2025-spring".parse().unwrap();

        let courses = vec![CourseWithSectionDetails {
            dept: "CMPT".into(),
            number: "225".into(),
            title: "Data Structures and Programming".into(),
            term: "Spring 2025".into(),
            ..Default::default()
        }];
        storage.write_sections(&term, &courses).await.unwrap();

        assert!(storage.layout().sections_path(&term).exists());
        let loaded = storage.read_sections(&term).await.unwrap().unwrap();
        assert_eq!(loaded, courses);
    }

    #[tokio::test]
    async fn test_malformed_file_is_persistence_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("instructors.json"), b"[{").unwrap();
        let storage = LocalStorage::new(tmp.path());

        let err = storage.read_instructors().await.unwrap_err();
        assert!(matches!(err, AppError::Persistence { .. }));
    }
}
