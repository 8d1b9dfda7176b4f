//! Catalog-wide outline store.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{CourseOutline, sort_by_course};
use crate::storage::{SnapshotLayout, read_snapshot};
use crate::store::{CachedSnapshot, Page, SnapshotLoader, filter_dept, find_exact, normalize_key};

/// Reads `outlines.json` and sorts it by (dept, number).
pub struct OutlineLoader {
    path: PathBuf,
}

impl OutlineLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotLoader for OutlineLoader {
    type Snapshot = Vec<CourseOutline>;

    fn describe(&self) -> String {
        format!("outlines from {}", self.path.display())
    }

    fn load(&self) -> Result<Self::Snapshot> {
        let mut outlines: Vec<CourseOutline> = read_snapshot(&self.path)?;
        sort_by_course(&mut outlines);
        log::debug!("{} outlines read", outlines.len());
        Ok(outlines)
    }
}

pub struct OutlineStore {
    cache: CachedSnapshot<OutlineLoader>,
}

impl OutlineStore {
    pub fn new(loader: OutlineLoader, ttl: Duration) -> Result<Self> {
        Ok(Self {
            cache: CachedSnapshot::new(loader, ttl)?,
        })
    }

    pub fn open(layout: &SnapshotLayout, ttl: Duration) -> Result<Self> {
        Self::new(OutlineLoader::new(layout.outlines_path()), ttl)
    }

    pub fn force_reload(&self) -> Result<()> {
        self.cache.force_reload()
    }

    /// All outlines, or one page of them when either bound is given.
    pub fn get_all(&self, limit: Option<usize>, offset: Option<usize>) -> Page<CourseOutline> {
        Page::slice(&self.cache.snapshot(), limit, offset)
    }

    pub fn get_by_dept(&self, dept: &str) -> Result<Vec<CourseOutline>> {
        let dept = normalize_key(dept);
        let outlines = filter_dept(&self.cache.snapshot(), &dept);
        if outlines.is_empty() {
            return Err(AppError::not_found(format!("outlines for {dept}")));
        }
        Ok(outlines)
    }

    pub fn get_by_dept_and_number(&self, dept: &str, number: &str) -> Result<CourseOutline> {
        let (dept, number) = (normalize_key(dept), normalize_key(number));
        find_exact(&self.cache.snapshot(), &dept, &number)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("outline {dept} {number}")))
    }

    pub fn len(&self) -> usize {
        self.cache.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
