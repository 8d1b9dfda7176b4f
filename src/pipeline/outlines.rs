// src/pipeline/outlines.rs

//! Catalog-wide outline harvest.

use crate::error::{AppError, Result};
use crate::models::{CourseKeyed, CourseOutline, TermKey, sort_by_course};
use crate::services::Harvester;
use crate::storage::LocalStorage;
use crate::utils::report;

/// Harvest one outline per course across `terms` and write `outlines.json`.
///
/// Offerings are left empty; `run_sync_offerings` fills them. An empty
/// harvest leaves the existing file alone and fails the job.
pub async fn run_fetch_outlines(
    harvester: &Harvester,
    storage: &LocalStorage,
    terms: &[TermKey],
) -> Result<usize> {
    report::header("Fetching course outlines");

    let (outlines, reports) = harvester.harvest_outlines(terms).await;
    for harvest in &reports {
        report::sub_item(&format!(
            "{}: {} new outlines, {} departments failed",
            harvest.term, harvest.courses_collected, harvest.departments_failed
        ));
    }

    // The record's own dept/number is what gets served, not the listing key.
    let mut outlines: Vec<CourseOutline> = outlines
        .into_values()
        .filter(|outline| outline.course_key().is_complete())
        .collect();
    if outlines.is_empty() {
        return Err(AppError::validation(
            "No outlines harvested, keeping the existing snapshot",
        ));
    }
    sort_by_course(&mut outlines);

    storage.write_outlines(&outlines).await?;
    report::success(&format!("{} outlines written", outlines.len()));
    Ok(outlines.len())
}
