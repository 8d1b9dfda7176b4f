// src/pipeline/sync.rs

//! Offering synchronization job.

use crate::error::{AppError, Result};
use crate::models::TermKey;
use crate::services::sync_offerings;
use crate::storage::LocalStorage;
use crate::utils::report;

/// Rebuild outline offerings from every term snapshot and rewrite `outlines.json`.
///
/// A term without a snapshot contributes nothing and is logged.
pub async fn run_sync_offerings(storage: &LocalStorage, terms: &[TermKey]) -> Result<usize> {
    report::header("Syncing course offerings");

    let outlines = storage.read_outlines().await?.ok_or_else(|| {
        AppError::persistence(storage.layout().outlines_path(), "no outline snapshot")
    })?;

    let mut per_term = Vec::with_capacity(terms.len());
    for term in terms {
        match storage.read_sections(term).await? {
            Some(courses) => {
                report::sub_item(&format!("{}: {} courses", term.code(), courses.len()));
                per_term.push((term.clone(), courses));
            }
            None => log::warn!("No section snapshot for {term}, skipping"),
        }
    }

    let synced = sync_offerings(outlines, &per_term);
    storage.write_outlines(&synced).await?;

    let offerings: usize = synced.iter().map(|o| o.offerings.len()).sum();
    report::success(&format!(
        "{offerings} offerings across {} outlines",
        synced.len()
    ));
    Ok(synced.len())
}
