// src/models/catalog.rs

//! Listing records returned by the remote catalog.
//!
//! These are transient: they only carry the identifier needed to descend one
//! more level and are never persisted on their own.

use serde::Deserialize;

use crate::models::CourseOutline;

/// One department in a term listing (`{"text": "CMPT", "value": "cmpt"}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepartmentRef {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub name: String,
    /// Path segment used to list the department's courses
    #[serde(default)]
    pub value: String,
}

/// One course in a department listing (`{"text": "225", "value": "225", "title": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseRef {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub title: String,
    /// Course number, used as the next path segment
    #[serde(default)]
    pub value: String,
}

/// One section in a course listing (`{"text": "D100", "value": "d100", "title": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionRef {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub title: String,
    /// Section code, used as the leaf path segment
    #[serde(default)]
    pub value: String,
}

/// Outline payload of a section detail page; only `info` is of interest.
#[derive(Debug, Clone, Deserialize)]
pub struct OutlineRes {
    pub info: CourseOutline,
}
