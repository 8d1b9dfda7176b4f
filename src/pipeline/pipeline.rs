// src/pipeline/pipeline.rs

use crate::error::Result;
use crate::models::TermKey;
use crate::services::Harvester;
use crate::storage::LocalStorage;
use crate::utils::report;

use super::harvest::run_harvest;
use super::instructors::run_build_instructors;
use super::outlines::run_fetch_outlines;
use super::sync::run_sync_offerings;

/// Run the full pipeline.
pub async fn run_pipeline(
    harvester: &Harvester,
    storage: &LocalStorage,
    terms: &[TermKey],
    skip_outlines: bool,
) -> Result<()> {
    report::header("Starting full pipeline");

    let total_steps = if skip_outlines { 3 } else { 4 };
    let mut current_step = 1;

    report::step(current_step, total_steps, "Harvest - Fetching section details");
    run_harvest(harvester, storage, terms).await?;
    current_step += 1;

    if !skip_outlines {
        report::step(current_step, total_steps, "Outlines - Fetching course outlines");
        run_fetch_outlines(harvester, storage, terms).await?;
        current_step += 1;
    }

    report::step(current_step, total_steps, "Sync - Folding offerings into outlines");
    run_sync_offerings(storage, terms).await?;
    current_step += 1;

    report::step(current_step, total_steps, "Instructors - Building index");
    run_build_instructors(storage).await?;

    report::success("Pipeline complete");

    Ok(())
}
