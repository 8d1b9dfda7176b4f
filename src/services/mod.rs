//! Service layer for the catalog harvester.
//!
//! This module contains the business logic for:
//! - Catalog access (`CatalogSource`, `RemoteCatalogClient`)
//! - Bounded fan-out (`BoundedPool`)
//! - Term traversal (`Harvester`)
//! - Offering synchronization (`sync_offerings`)
//! - The instructor index (`build_instructors`)

mod catalog;
mod harvester;
mod instructors;
mod offerings;
mod pool;

pub use catalog::{CatalogSource, RemoteCatalogClient};
pub use harvester::{
    AggregationMap, CourseScope, CourseVisitor, HarvestLimits, HarvestReport, Harvester,
    OutlineVisitor, SectionDetailsVisitor, within,
};
pub use instructors::build_instructors;
pub use offerings::sync_offerings;
pub use pool::BoundedPool;
