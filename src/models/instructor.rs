// src/models/instructor.rs

//! Instructor index records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A course an instructor taught in one term.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstructorOffering {
    pub dept: String,
    pub number: String,
    pub term: String,
    pub title: String,
}

/// One distinct instructor and everything they taught.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstructorResponse {
    pub name: String,
    #[serde(default)]
    pub offerings: Vec<InstructorOffering>,
}

/// Case-insensitive name order, ties broken by exact name.
///
/// Instructor snapshots are kept in this order so name lookups can bisect.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_names_ignores_case_first() {
        assert_eq!(compare_names("alice", "Bob"), Ordering::Less);
        assert_eq!(compare_names("Alice", "alice"), Ordering::Less);
        assert_eq!(compare_names("Zed", "zed"), Ordering::Less);
    }
}
