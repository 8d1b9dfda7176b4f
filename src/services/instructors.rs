// src/services/instructors.rs

//! Instructor index built from synced outlines.

use std::collections::{HashMap, HashSet};

use crate::models::{
    CourseOutline, InstructorOffering, InstructorResponse, compare_names, term_sort_value,
};

/// Invert outline offerings into one record per instructor name.
pub fn build_instructors(outlines: &[CourseOutline]) -> Vec<InstructorResponse> {
    let mut by_name: HashMap<String, Vec<InstructorOffering>> = HashMap::new();

    for outline in outlines {
        for offering in &outline.offerings {
            for name in &offering.instructors {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                by_name
                    .entry(name.to_string())
                    .or_default()
                    .push(InstructorOffering {
                        dept: outline.dept.clone(),
                        number: outline.number.clone(),
                        term: offering.term.clone(),
                        title: outline.title.clone(),
                    });
            }
        }
    }

    let mut instructors: Vec<InstructorResponse> = by_name
        .into_iter()
        .map(|(name, mut offerings)| {
            let mut seen = HashSet::new();
            offerings.retain(|o| seen.insert((o.dept.clone(), o.number.clone(), o.term.clone())));
            offerings.sort_by(|a, b| {
                term_sort_value(&b.term)
                    .cmp(&term_sort_value(&a.term))
                    .then_with(|| a.dept.cmp(&b.dept))
                    .then_with(|| a.number.cmp(&b.number))
            });
            InstructorResponse { name, offerings }
        })
        .collect();

    instructors.sort_by(|a, b| compare_names(&a.name, &b.name));
    instructors
}
