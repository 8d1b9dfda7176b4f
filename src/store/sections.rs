//! Per-term section store.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{CourseKeyed, CourseWithSectionDetails, TermKey, sort_by_course};
use crate::storage::{SnapshotLayout, read_snapshot};
use crate::store::{
    CachedSnapshot, SnapshotLoader, filter_dept, find_exact, normalize_key, term_code,
};

/// Sorted records per term code (`2025-spring`).
pub type TermSnapshots<T> = HashMap<String, Vec<T>>;

/// Reads `sections/{term}.json` for every configured term.
pub struct SectionLoader {
    layout: SnapshotLayout,
    terms: Vec<TermKey>,
}

impl SectionLoader {
    pub fn new(layout: SnapshotLayout, terms: &[TermKey]) -> Self {
        Self {
            layout,
            terms: terms.to_vec(),
        }
    }
}

impl SnapshotLoader for SectionLoader {
    type Snapshot = TermSnapshots<CourseWithSectionDetails>;

    fn describe(&self) -> String {
        format!("sections for {} terms", self.terms.len())
    }

    fn load(&self) -> Result<Self::Snapshot> {
        let mut snapshots = HashMap::with_capacity(self.terms.len());
        for term in &self.terms {
            let mut courses: Vec<CourseWithSectionDetails> =
                read_snapshot(&self.layout.sections_path(term))?;
            sort_by_course(&mut courses);
            log::debug!("{} courses read for {}", courses.len(), term);
            snapshots.insert(term.code(), courses);
        }
        Ok(snapshots)
    }
}

pub struct SectionStore {
    cache: CachedSnapshot<SectionLoader>,
}

impl SectionStore {
    pub fn new(loader: SectionLoader, ttl: Duration) -> Result<Self> {
        Ok(Self {
            cache: CachedSnapshot::new(loader, ttl)?,
        })
    }

    pub fn open(layout: &SnapshotLayout, terms: &[TermKey], ttl: Duration) -> Result<Self> {
        Self::new(SectionLoader::new(layout.clone(), terms), ttl)
    }

    pub fn force_reload(&self) -> Result<()> {
        self.cache.force_reload()
    }

    pub fn get_by_term(&self, year: &str, season: &str) -> Result<Vec<CourseWithSectionDetails>> {
        by_term(&self.cache.snapshot(), year, season)
    }

    pub fn get_by_term_and_dept(
        &self,
        year: &str,
        season: &str,
        dept: &str,
    ) -> Result<Vec<CourseWithSectionDetails>> {
        by_term_and_dept(&self.cache.snapshot(), year, season, dept)
    }

    pub fn get_by_term_and_dept_and_number(
        &self,
        year: &str,
        season: &str,
        dept: &str,
        number: &str,
    ) -> Result<CourseWithSectionDetails> {
        by_term_and_course(&self.cache.snapshot(), year, season, dept, number)
    }
}

pub(crate) fn by_term<T: Clone>(
    snapshots: &TermSnapshots<T>,
    year: &str,
    season: &str,
) -> Result<Vec<T>> {
    let code = term_code(year, season);
    snapshots
        .get(&code)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("term {code}")))
}

pub(crate) fn by_term_and_dept<T: CourseKeyed + Clone>(
    snapshots: &TermSnapshots<T>,
    year: &str,
    season: &str,
    dept: &str,
) -> Result<Vec<T>> {
    let code = term_code(year, season);
    let courses = snapshots
        .get(&code)
        .ok_or_else(|| AppError::not_found(format!("term {code}")))?;
    let dept = normalize_key(dept);
    let matched = filter_dept(courses, &dept);
    if matched.is_empty() {
        return Err(AppError::not_found(format!("{dept} in {code}")));
    }
    Ok(matched)
}

pub(crate) fn by_term_and_course<T: CourseKeyed + Clone>(
    snapshots: &TermSnapshots<T>,
    year: &str,
    season: &str,
    dept: &str,
    number: &str,
) -> Result<T> {
    let code = term_code(year, season);
    let courses = snapshots
        .get(&code)
        .ok_or_else(|| AppError::not_found(format!("term {code}")))?;
    let (dept, number) = (normalize_key(dept), normalize_key(number));
    find_exact(courses, &dept, &number)
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("{dept} {number} in {code}")))
}
