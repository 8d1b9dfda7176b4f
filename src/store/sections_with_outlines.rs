//! Per-term section aggregates joined with their outlines.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;
use crate::models::{
    CourseKey, CourseKeyed, CourseOutline, CourseOutlineWithSectionDetails,
    CourseWithSectionDetails, TermKey, sort_by_course,
};
use crate::storage::{SnapshotLayout, read_snapshot};
use crate::store::sections::{TermSnapshots, by_term, by_term_and_course, by_term_and_dept};
use crate::store::{CachedSnapshot, SnapshotLoader};

/// Join one term's courses with outlines on (dept, number).
///
/// Courses without an outline are left out.
pub fn join_with_outlines(
    outlines: &HashMap<CourseKey, CourseOutline>,
    courses: Vec<CourseWithSectionDetails>,
) -> Vec<CourseOutlineWithSectionDetails> {
    let mut joined: Vec<CourseOutlineWithSectionDetails> = courses
        .into_iter()
        .filter_map(|course| {
            outlines
                .get(&course.course_key())
                .map(|outline| CourseOutlineWithSectionDetails::join(outline, course))
        })
        .collect();
    sort_by_course(&mut joined);
    joined
}

/// Reads `outlines.json` and every term's sections, then joins them.
pub struct SectionsWithOutlinesLoader {
    layout: SnapshotLayout,
    terms: Vec<TermKey>,
}

impl SectionsWithOutlinesLoader {
    pub fn new(layout: SnapshotLayout, terms: &[TermKey]) -> Self {
        Self {
            layout,
            terms: terms.to_vec(),
        }
    }
}

impl SnapshotLoader for SectionsWithOutlinesLoader {
    type Snapshot = TermSnapshots<CourseOutlineWithSectionDetails>;

    fn describe(&self) -> String {
        format!("sections with outlines for {} terms", self.terms.len())
    }

    fn load(&self) -> Result<Self::Snapshot> {
        let outlines: Vec<CourseOutline> = read_snapshot(&self.layout.outlines_path())?;
        let outlines: HashMap<CourseKey, CourseOutline> = outlines
            .into_iter()
            .map(|outline| (outline.course_key(), outline))
            .collect();

        let mut snapshots = HashMap::with_capacity(self.terms.len());
        for term in &self.terms {
            let courses: Vec<CourseWithSectionDetails> =
                read_snapshot(&self.layout.sections_path(term))?;
            snapshots.insert(term.code(), join_with_outlines(&outlines, courses));
        }
        Ok(snapshots)
    }
}

pub struct SectionsWithOutlinesStore {
    cache: CachedSnapshot<SectionsWithOutlinesLoader>,
}

impl SectionsWithOutlinesStore {
    pub fn new(loader: SectionsWithOutlinesLoader, ttl: Duration) -> Result<Self> {
        Ok(Self {
            cache: CachedSnapshot::new(loader, ttl)?,
        })
    }

    pub fn open(layout: &SnapshotLayout, terms: &[TermKey], ttl: Duration) -> Result<Self> {
        Self::new(SectionsWithOutlinesLoader::new(layout.clone(), terms), ttl)
    }

    pub fn force_reload(&self) -> Result<()> {
        self.cache.force_reload()
    }

    pub fn get_by_term(
        &self,
        year: &str,
        season: &str,
    ) -> Result<Vec<CourseOutlineWithSectionDetails>> {
        by_term(&self.cache.snapshot(), year, season)
    }

    pub fn get_by_term_and_dept(
        &self,
        year: &str,
        season: &str,
        dept: &str,
    ) -> Result<Vec<CourseOutlineWithSectionDetails>> {
        by_term_and_dept(&self.cache.snapshot(), year, season, dept)
    }

    pub fn get_by_term_and_dept_and_number(
        &self,
        year: &str,
        season: &str,
        dept: &str,
        number: &str,
    ) -> Result<CourseOutlineWithSectionDetails> {
        by_term_and_course(&self.cache.snapshot(), year, season, dept, number)
    }
}
