// src/models/mod.rs

//! Domain models for the catalog harvester and stores.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod catalog;
mod config;
mod instructor;
mod outline;
mod section;
mod term;

// Re-export all public types
pub use catalog::{CourseRef, DepartmentRef, OutlineRes, SectionRef};
pub use config::{Config, HarvesterConfig, StoreConfig};
pub use instructor::{InstructorOffering, InstructorResponse, compare_names};
pub use outline::{CourseOffering, CourseOutline, CourseOutlineWithSectionDetails};
pub use section::{
    CourseKey, CourseKeyed, CourseWithSectionDetails, SectionDetail, SectionDetailRaw,
    SectionInfo, SectionInstructor, SectionSchedule, finalize_courses, sort_by_course,
};
pub use term::{Season, TermKey, term_sort_value};
