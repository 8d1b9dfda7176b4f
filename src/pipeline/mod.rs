//! Batch job entry points.
//!
//! - `run_harvest`: Harvest section details for each term
//! - `run_fetch_outlines`: Harvest course outlines across terms
//! - `run_sync_offerings`: Fold term snapshots into outline offerings
//! - `run_build_instructors`: Rebuild the instructor index
//! - `run_pipeline`: All of the above in order
//! - `run_validate`: Check configuration

pub mod harvest;
pub mod instructors;
pub mod outlines;
#[allow(clippy::module_inception)]
pub mod pipeline;
pub mod sync;
pub mod validate;

pub use harvest::run_harvest;
pub use instructors::run_build_instructors;
pub use outlines::run_fetch_outlines;
pub use pipeline::run_pipeline;
pub use sync::run_sync_offerings;
pub use validate::run_validate;
