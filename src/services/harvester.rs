// src/services/harvester.rs

//! Hierarchical catalog harvester.
//!
//! One term is traversed department → course → section → detail. Each level
//! runs in its own [`BoundedPool`] and each scope carries its own deadline,
//! so a failure or an expired deadline costs only the subtree it covers.
//! What happens at a course is decided by a [`CourseVisitor`]: section
//! details for the per-term snapshot, or outlines for the catalog-wide one.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{
    CourseKey, CourseOutline, CourseRef, CourseWithSectionDetails, DepartmentRef, HarvesterConfig,
    SectionDetailRaw, SectionRef, TermKey,
};
use crate::services::catalog::{CatalogSource, RemoteCatalogClient};
use crate::services::pool::BoundedPool;

/// Course-keyed results shared by every worker of a traversal.
///
/// The lock is held only for a single insert or lookup, never across a fetch.
#[derive(Debug)]
pub struct AggregationMap<V> {
    inner: Mutex<HashMap<CourseKey, V>>,
}

impl<V> Default for AggregationMap<V> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> AggregationMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`.
    pub fn insert(&self, key: CourseKey, value: V) {
        self.lock().insert(key, value);
    }

    pub fn contains(&self, key: &CourseKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_inner(self) -> HashMap<CourseKey, V> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CourseKey, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Concurrency limits and deadlines for one traversal.
#[derive(Debug, Clone, Copy)]
pub struct HarvestLimits {
    pub departments: usize,
    pub courses: usize,
    pub sections: usize,
    pub request: Duration,
    pub course: Duration,
    pub department: Duration,
    pub term: Duration,
}

impl From<&HarvesterConfig> for HarvestLimits {
    fn from(config: &HarvesterConfig) -> Self {
        Self {
            departments: config.max_concurrent_departments,
            courses: config.max_concurrent_courses,
            sections: config.max_concurrent_sections,
            request: config.request_timeout(),
            course: Duration::from_secs(config.course_timeout_secs),
            department: Duration::from_secs(config.department_timeout_secs),
            term: Duration::from_secs(config.term_timeout_secs),
        }
    }
}

impl Default for HarvestLimits {
    fn default() -> Self {
        Self::from(&HarvesterConfig::default())
    }
}

/// Summary of one term's traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub term: String,
    pub departments_listed: usize,
    /// Listed with an empty value and never visited
    pub departments_skipped: usize,
    pub departments_failed: usize,
    pub courses_collected: usize,
    pub term_deadline_expired: bool,
}

/// The course a visitor is asked to handle.
#[derive(Debug, Clone, Copy)]
pub struct CourseScope<'a> {
    pub term: &'a TermKey,
    pub dept: &'a str,
    pub number: &'a str,
}

impl CourseScope<'_> {
    pub fn key(&self) -> CourseKey {
        CourseKey::new(self.dept, self.number)
    }
}

/// Per-course step of a traversal.
#[async_trait]
pub trait CourseVisitor: Send + Sync {
    type Output: Send;

    /// Fetch whatever this traversal needs for one course and record it.
    ///
    /// An `Err` skips the course; it never stops the traversal.
    async fn visit_course(
        &self,
        source: &dyn CatalogSource,
        course: CourseScope<'_>,
        map: &AggregationMap<Self::Output>,
    ) -> Result<()>;
}

/// Collects every section detail of a course into a [`CourseWithSectionDetails`].
#[derive(Debug, Clone)]
pub struct SectionDetailsVisitor {
    pool: BoundedPool,
    request_timeout: Duration,
}

impl SectionDetailsVisitor {
    pub fn new(limits: &HarvestLimits) -> Self {
        Self {
            pool: BoundedPool::new(limits.sections),
            request_timeout: limits.request,
        }
    }
}

#[async_trait]
impl CourseVisitor for SectionDetailsVisitor {
    type Output = CourseWithSectionDetails;

    async fn visit_course(
        &self,
        source: &dyn CatalogSource,
        course: CourseScope<'_>,
        map: &AggregationMap<Self::Output>,
    ) -> Result<()> {
        let CourseScope { term, dept, number } = course;
        let sections = list_sections(source, course, self.request_timeout).await?;

        let fetched = self
            .pool
            .run(sections, |section| async move {
                let code = section.value.trim().to_string();
                let scope = format!("section {dept} {number} {code} ({term})");
                match within(
                    self.request_timeout,
                    scope,
                    source.section_detail(term, dept, number, &code),
                )
                .await
                {
                    Ok(raw) => Some(raw),
                    Err(e) => {
                        log::warn!("Skipping section {dept} {number} {code} ({term}): {e}");
                        None
                    }
                }
            })
            .await;

        let details: Vec<SectionDetailRaw> = fetched.into_iter().flatten().collect();
        match CourseWithSectionDetails::from_raw(details) {
            Some(aggregate) => map.insert(course.key(), aggregate),
            None => log::debug!("No section details for {dept} {number} ({term}), dropping"),
        }
        Ok(())
    }
}

/// Fetches one outline per course from its first titled section.
#[derive(Debug, Clone)]
pub struct OutlineVisitor {
    request_timeout: Duration,
}

impl OutlineVisitor {
    pub fn new(limits: &HarvestLimits) -> Self {
        Self {
            request_timeout: limits.request,
        }
    }
}

#[async_trait]
impl CourseVisitor for OutlineVisitor {
    type Output = CourseOutline;

    async fn visit_course(
        &self,
        source: &dyn CatalogSource,
        course: CourseScope<'_>,
        map: &AggregationMap<Self::Output>,
    ) -> Result<()> {
        let key = course.key();
        if map.contains(&key) {
            return Ok(());
        }

        let CourseScope { term, dept, number } = course;
        let sections = list_sections(source, course, self.request_timeout).await?;
        let Some(first) = sections.first() else {
            log::debug!("No sections for {dept} {number} ({term}), no outline");
            return Ok(());
        };

        let code = first.value.trim();
        let res = within(
            self.request_timeout,
            format!("outline {dept} {number} {code} ({term})"),
            source.outline(term, dept, number, code),
        )
        .await?;
        map.insert(key, res.info);
        Ok(())
    }
}

/// Sections of a course that carry a title and a value.
async fn list_sections(
    source: &dyn CatalogSource,
    course: CourseScope<'_>,
    limit: Duration,
) -> Result<Vec<SectionRef>> {
    let CourseScope { term, dept, number } = course;
    let sections = within(
        limit,
        format!("section listing {dept} {number} ({term})"),
        source.sections(term, dept, number),
    )
    .await?;

    Ok(sections
        .into_iter()
        .filter(|s| !s.title.trim().is_empty() && !s.value.trim().is_empty())
        .collect())
}

/// Run `fut` under a deadline, reporting expiry as [`AppError::Timeout`].
pub async fn within<T, F>(limit: Duration, scope: impl Into<String>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout(scope, limit)),
    }
}

/// Four-level catalog traversal.
pub struct Harvester {
    source: Arc<dyn CatalogSource>,
    limits: HarvestLimits,
}

impl Harvester {
    pub fn new(source: Arc<dyn CatalogSource>, limits: HarvestLimits) -> Self {
        Self { source, limits }
    }

    /// Harvester over the live catalog.
    pub fn remote(config: &HarvesterConfig) -> Result<Self> {
        let client = RemoteCatalogClient::new(config)?;
        Ok(Self::new(Arc::new(client), HarvestLimits::from(config)))
    }

    pub fn limits(&self) -> &HarvestLimits {
        &self.limits
    }

    /// Harvest every course of `term` with its section details.
    ///
    /// Fails only when the department listing itself fails. Any other
    /// failure drops the unit it happened in.
    pub async fn harvest(
        &self,
        term: &TermKey,
    ) -> Result<HashMap<CourseKey, CourseWithSectionDetails>> {
        self.harvest_with_report(term).await.map(|(courses, _)| courses)
    }

    pub async fn harvest_with_report(
        &self,
        term: &TermKey,
    ) -> Result<(HashMap<CourseKey, CourseWithSectionDetails>, HarvestReport)> {
        let visitor = SectionDetailsVisitor::new(&self.limits);
        let map = AggregationMap::new();
        let report = self.traverse(term, &visitor, &map).await?;
        Ok((map.into_inner(), report))
    }

    /// Harvest one outline per course across `terms`.
    ///
    /// A course already collected from an earlier term is not fetched again.
    /// A term whose department listing fails is skipped with a warning.
    pub async fn harvest_outlines(
        &self,
        terms: &[TermKey],
    ) -> (HashMap<CourseKey, CourseOutline>, Vec<HarvestReport>) {
        let visitor = OutlineVisitor::new(&self.limits);
        let map = AggregationMap::new();
        let mut reports = Vec::with_capacity(terms.len());

        for term in terms {
            match self.traverse(term, &visitor, &map).await {
                Ok(report) => reports.push(report),
                Err(e) => log::warn!("Skipping outlines for {term}: {e}"),
            }
        }
        (map.into_inner(), reports)
    }

    async fn traverse<V: CourseVisitor>(
        &self,
        term: &TermKey,
        visitor: &V,
        map: &AggregationMap<V::Output>,
    ) -> Result<HarvestReport> {
        let before = map.len();
        let departments = within(
            self.limits.request,
            format!("department listing ({term})"),
            self.source.departments(term),
        )
        .await?;

        let mut report = HarvestReport {
            term: term.code(),
            departments_listed: departments.len(),
            ..HarvestReport::default()
        };

        let departments: Vec<DepartmentRef> = departments
            .into_iter()
            .filter(|d| !d.value.trim().is_empty())
            .collect();
        report.departments_skipped = report.departments_listed - departments.len();

        let pool = BoundedPool::new(self.limits.departments);
        let work = pool.run(departments, |department| async move {
            let dept = department.value.trim().to_string();
            let outcome = within(
                self.limits.department,
                format!("department {dept} ({term})"),
                self.visit_department(term, &dept, visitor, map),
            )
            .await;
            if let Err(e) = &outcome {
                log::warn!("Skipping department {dept} ({term}): {e}");
            }
            outcome.is_err()
        });

        match tokio::time::timeout(self.limits.term, work).await {
            Ok(failed) => report.departments_failed = failed.into_iter().filter(|f| *f).count(),
            Err(_) => {
                report.term_deadline_expired = true;
                log::warn!(
                    "Term {term} timed out after {:?}, keeping partial results",
                    self.limits.term
                );
            }
        }

        report.courses_collected = map.len() - before;
        Ok(report)
    }

    async fn visit_department<V: CourseVisitor>(
        &self,
        term: &TermKey,
        dept: &str,
        visitor: &V,
        map: &AggregationMap<V::Output>,
    ) -> Result<()> {
        let courses = within(
            self.limits.request,
            format!("course listing {dept} ({term})"),
            self.source.courses(term, dept),
        )
        .await?;

        let courses: Vec<CourseRef> = courses
            .into_iter()
            .filter(|c| !c.title.trim().is_empty() && !c.value.trim().is_empty())
            .collect();

        let source = self.source.as_ref();
        BoundedPool::new(self.limits.courses)
            .run(courses, |course| async move {
                let number = course.value.trim().to_string();
                let scope = CourseScope {
                    term,
                    dept,
                    number: &number,
                };
                let outcome = within(
                    self.limits.course,
                    format!("course {dept} {number} ({term})"),
                    visitor.visit_course(source, scope, map),
                )
                .await;
                if let Err(e) = outcome {
                    log::warn!("Skipping course {dept} {number} ({term}): {e}");
                }
            })
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_map_insert_is_idempotent_per_key() {
        let map = AggregationMap::new();
        map.insert(CourseKey::new("cmpt", "225"), 1);
        map.insert(CourseKey::new("CMPT", "225"), 2);
        assert_eq!(map.len(), 1);
        assert!(map.contains(&CourseKey::new("CMPT", "225")));
        assert_eq!(map.into_inner()[&CourseKey::new("CMPT", "225")], 2);
    }

    #[tokio::test]
    async fn test_within_reports_scope_on_expiry() {
        let result: Result<()> = within(Duration::from_millis(5), "course CMPT 225", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Timeout { .. }));
        assert!(err.to_string().contains("course CMPT 225"));
    }

    #[tokio::test]
    async fn test_within_passes_inner_error_through() {
        let result: Result<()> = within(Duration::from_secs(1), "x", async {
            Err(AppError::not_found("nothing"))
        })
        .await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_limits_follow_config() {
        let limits = HarvestLimits::default();
        assert_eq!(limits.departments, 10);
        assert_eq!(limits.courses, 5);
        assert_eq!(limits.sections, 20);
        assert_eq!(limits.request, Duration::from_secs(10));
        assert_eq!(limits.term, Duration::from_secs(30 * 60));
    }
}
