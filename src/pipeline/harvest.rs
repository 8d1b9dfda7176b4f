// src/pipeline/harvest.rs

//! Per-term section harvest.

use crate::error::Result;
use crate::models::{TermKey, finalize_courses};
use crate::services::{HarvestReport, Harvester};
use crate::storage::LocalStorage;
use crate::utils::report;

/// Harvest each term and write `sections/{term}.json`.
///
/// A term whose department listing fails aborts the job; everything below
/// that only shrinks the snapshot.
pub async fn run_harvest(
    harvester: &Harvester,
    storage: &LocalStorage,
    terms: &[TermKey],
) -> Result<Vec<HarvestReport>> {
    let mut reports = Vec::with_capacity(terms.len());

    for term in terms {
        report::header(&format!("Harvesting {}", term.label()));
        let (courses, harvest) = harvester.harvest_with_report(term).await?;
        let courses = finalize_courses(courses);
        storage.write_sections(term, &courses).await?;

        report::summary(
            &term.code(),
            &[
                ("departments listed", harvest.departments_listed.to_string()),
                ("departments skipped", harvest.departments_skipped.to_string()),
                ("departments failed", harvest.departments_failed.to_string()),
                ("courses written", courses.len().to_string()),
                ("term deadline expired", harvest.term_deadline_expired.to_string()),
            ],
        );
        reports.push(harvest);
    }

    report::success(&format!("Harvested {} terms", reports.len()));
    Ok(reports)
}
