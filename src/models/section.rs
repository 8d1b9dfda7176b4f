// src/models/section.rs

//! Section detail records and the per-course aggregate built from them.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::date::normalize_date;

/// Composite key of a course: upper-cased department and number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CourseKey {
    pub dept: String,
    pub number: String,
}

impl CourseKey {
    pub fn new(dept: &str, number: &str) -> Self {
        Self {
            dept: dept.trim().to_uppercase(),
            number: number.trim().to_uppercase(),
        }
    }

    /// Both halves must be present for a record to be persisted.
    pub fn is_complete(&self) -> bool {
        !self.dept.is_empty() && !self.number.is_empty()
    }
}

impl fmt::Display for CourseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.dept, self.number)
    }
}

/// Anything addressed by (department, number).
///
/// Snapshots are sorted by this pair with plain string comparison.
pub trait CourseKeyed {
    fn dept(&self) -> &str;
    fn number(&self) -> &str;

    fn course_key(&self) -> CourseKey {
        CourseKey::new(self.dept(), self.number())
    }
}

/// Null in catalog JSON means "none"; treat it as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifying block of a section detail page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionInfo {
    pub dept: String,
    pub number: String,
    pub section: String,
    pub title: String,
    pub units: String,
    /// Term label, e.g. `Fall 2024`
    pub term: String,
    pub delivery_method: String,
    pub class_number: String,
    pub outline_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionInstructor {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionSchedule {
    pub start_date: String,
    pub end_date: String,
    pub campus: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub section_code: String,
}

/// One section's full record as returned by the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionDetailRaw {
    #[serde(default)]
    pub info: SectionInfo,
    #[serde(default, rename = "instructor", deserialize_with = "null_as_empty")]
    pub instructors: Vec<SectionInstructor>,
    #[serde(default, rename = "courseSchedule", deserialize_with = "null_as_empty")]
    pub schedules: Vec<SectionSchedule>,
}

/// Normalized section as stored inside a [`CourseWithSectionDetails`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetail {
    pub section: String,
    #[serde(default)]
    pub delivery_method: String,
    #[serde(default)]
    pub class_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub instructors: Vec<SectionInstructor>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub schedules: Vec<SectionSchedule>,
}

impl From<SectionDetailRaw> for SectionDetail {
    fn from(raw: SectionDetailRaw) -> Self {
        let schedules = raw
            .schedules
            .into_iter()
            .map(|schedule| SectionSchedule {
                start_date: normalize_date(&schedule.start_date),
                end_date: normalize_date(&schedule.end_date),
                ..schedule
            })
            .collect();

        Self {
            section: raw.info.section,
            delivery_method: raw.info.delivery_method,
            class_number: raw.info.class_number,
            instructors: raw.instructors,
            schedules,
        }
    }
}

/// One course in one term with all of its sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithSectionDetails {
    pub dept: String,
    pub number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub term: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub section_details: Vec<SectionDetail>,
}

impl CourseWithSectionDetails {
    /// Fold a course's section pages into one aggregate.
    ///
    /// Course-level fields come from the first record; every record of one
    /// course carries the same values. Returns `None` for an empty input.
    pub fn from_raw(raws: Vec<SectionDetailRaw>) -> Option<Self> {
        let first = raws.first()?.info.clone();
        let mut section_details: Vec<SectionDetail> =
            raws.into_iter().map(SectionDetail::from).collect();
        section_details.sort_by(|a, b| a.section.cmp(&b.section));

        Some(Self {
            dept: first.dept,
            number: first.number,
            title: first.title,
            units: first.units,
            term: first.term,
            section_details,
        })
    }

    /// Distinct non-empty instructor names, in order of first appearance.
    pub fn instructor_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for instructor in self.section_details.iter().flat_map(|s| &s.instructors) {
            let name = instructor.name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

impl CourseKeyed for CourseWithSectionDetails {
    fn dept(&self) -> &str {
        &self.dept
    }

    fn number(&self) -> &str {
        &self.number
    }
}

/// Sort ascending by (dept, number) with plain string comparison.
pub fn sort_by_course<T: CourseKeyed>(items: &mut [T]) {
    items.sort_by(|a, b| (a.dept(), a.number()).cmp(&(b.dept(), b.number())));
}

/// Turn a harvested map into the persisted form: complete keys only,
/// sections ordered by code, courses ordered by (dept, number).
pub fn finalize_courses(
    courses: HashMap<CourseKey, CourseWithSectionDetails>,
) -> Vec<CourseWithSectionDetails> {
    let mut courses: Vec<CourseWithSectionDetails> = courses
        .into_values()
        .filter(|c| !c.dept.is_empty() && !c.number.is_empty())
        .map(|mut c| {
            c.section_details.sort_by(|a, b| a.section.cmp(&b.section));
            c
        })
        .collect();
    sort_by_course(&mut courses);
    courses
}
