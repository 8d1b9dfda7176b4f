//! Instructor index store.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{InstructorOffering, InstructorResponse, compare_names};
use crate::storage::{SnapshotLayout, read_snapshot};
use crate::store::{CachedSnapshot, SnapshotLoader, normalize_key};

/// Reads `instructors.json` and sorts it by name.
pub struct InstructorLoader {
    path: PathBuf,
}

impl InstructorLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotLoader for InstructorLoader {
    type Snapshot = Vec<InstructorResponse>;

    fn describe(&self) -> String {
        format!("instructors from {}", self.path.display())
    }

    fn load(&self) -> Result<Self::Snapshot> {
        let mut instructors: Vec<InstructorResponse> = read_snapshot(&self.path)?;
        instructors.sort_by(|a, b| compare_names(&a.name, &b.name));
        Ok(instructors)
    }
}

pub struct InstructorStore {
    cache: CachedSnapshot<InstructorLoader>,
}

impl InstructorStore {
    pub fn new(loader: InstructorLoader, ttl: Duration) -> Result<Self> {
        Ok(Self {
            cache: CachedSnapshot::new(loader, ttl)?,
        })
    }

    pub fn open(layout: &SnapshotLayout, ttl: Duration) -> Result<Self> {
        Self::new(InstructorLoader::new(layout.instructors_path()), ttl)
    }

    pub fn force_reload(&self) -> Result<()> {
        self.cache.force_reload()
    }

    pub fn get_all(&self) -> Vec<InstructorResponse> {
        self.cache.snapshot().to_vec()
    }

    /// Exact name match, ignoring case.
    pub fn get_by_name(&self, name: &str) -> Result<InstructorResponse> {
        let name = name.trim();
        let wanted = name.to_lowercase();
        let snapshot = self.cache.snapshot();

        // Names are sorted case-insensitively first, so every case variant
        // of `name` sits in one contiguous run starting here.
        let start = snapshot.partition_point(|i| i.name.to_lowercase() < wanted);
        let found = snapshot[start..]
            .iter()
            .take_while(|i| i.name.to_lowercase() == wanted)
            .min_by(|a, b| exact_first(a, b, name))
            .cloned();
        found.ok_or_else(|| AppError::not_found(format!("instructor {name}")))
    }

    /// Case-insensitive substring match on the name.
    pub fn search_by_name(&self, fragment: &str) -> Vec<InstructorResponse> {
        let fragment = fragment.trim().to_lowercase();
        self.cache
            .snapshot()
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&fragment))
            .cloned()
            .collect()
    }

    /// Instructors with at least one offering in `dept`.
    pub fn get_by_dept(&self, dept: &str) -> Vec<InstructorResponse> {
        let dept = normalize_key(dept);
        self.filter_offerings(|o| o.dept == dept)
    }

    /// Instructors who taught `dept number` at least once.
    pub fn get_by_dept_and_number(&self, dept: &str, number: &str) -> Vec<InstructorResponse> {
        let (dept, number) = (normalize_key(dept), normalize_key(number));
        self.filter_offerings(|o| o.dept == dept && o.number == number)
    }

    fn filter_offerings<F>(&self, matches: F) -> Vec<InstructorResponse>
    where
        F: Fn(&InstructorOffering) -> bool,
    {
        self.cache
            .snapshot()
            .iter()
            .filter(|i| i.offerings.iter().any(&matches))
            .cloned()
            .collect()
    }
}

fn exact_first(a: &InstructorResponse, b: &InstructorResponse, name: &str) -> Ordering {
    (a.name != name).cmp(&(b.name != name))
}
