// src/services/offerings.rs

//! Folds per-term section aggregates into outline offerings.

use std::collections::HashMap;

use crate::models::{
    CourseKey, CourseKeyed, CourseOffering, CourseOutline, CourseWithSectionDetails, TermKey,
    sort_by_course,
};

/// Rebuild every outline's offerings from the given terms.
///
/// Existing offerings are cleared first, so running this twice over the same
/// input gives the same result. Courses without a matching outline are
/// skipped. The returned outlines are sorted by (dept, number) and each
/// outline's offerings are newest first.
pub fn sync_offerings(
    outlines: Vec<CourseOutline>,
    terms: &[(TermKey, Vec<CourseWithSectionDetails>)],
) -> Vec<CourseOutline> {
    let mut by_key: HashMap<CourseKey, CourseOutline> = HashMap::with_capacity(outlines.len());
    for mut outline in outlines {
        let key = outline.course_key();
        if !key.is_complete() {
            continue;
        }
        outline.offerings.clear();
        by_key.insert(key, outline);
    }

    let mut unmatched = 0usize;
    for (term, courses) in terms {
        let label = term.label();
        for course in courses {
            match by_key.get_mut(&course.course_key()) {
                Some(outline) => outline.offerings.push(CourseOffering {
                    term: label.clone(),
                    instructors: course.instructor_names(),
                }),
                None => unmatched += 1,
            }
        }
    }
    if unmatched > 0 {
        log::debug!("{unmatched} course offerings had no outline");
    }

    let mut synced: Vec<CourseOutline> = by_key
        .into_values()
        .map(|mut outline| {
            outline.sort_offerings();
            outline
        })
        .collect();
    sort_by_course(&mut synced);
    synced
}
