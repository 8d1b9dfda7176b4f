// src/pipeline/instructors.rs

//! Instructor index job.

use crate::error::{AppError, Result};
use crate::services::build_instructors;
use crate::storage::LocalStorage;
use crate::utils::report;

/// Rebuild `instructors.json` from the synced outlines.
pub async fn run_build_instructors(storage: &LocalStorage) -> Result<usize> {
    report::header("Building instructor index");

    let outlines = storage.read_outlines().await?.ok_or_else(|| {
        AppError::persistence(storage.layout().outlines_path(), "no outline snapshot")
    })?;

    let instructors = build_instructors(&outlines);
    storage.write_instructors(&instructors).await?;

    report::success(&format!("{} instructors indexed", instructors.len()));
    Ok(instructors.len())
}
