// src/models/outline.rs

//! Catalog-wide course outlines.

use serde::{Deserialize, Serialize};

use crate::models::section::{CourseKeyed, CourseWithSectionDetails, SectionDetail};
use crate::models::term_sort_value;

/// One term in which a course ran, with who taught it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseOffering {
    /// Term label, e.g. `Spring 2025`
    pub term: String,
    #[serde(default)]
    pub instructors: Vec<String>,
}

/// Term-independent description of a course.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseOutline {
    pub dept: String,
    pub number: String,
    pub title: String,
    pub units: String,
    pub description: String,
    pub notes: String,
    pub designation: String,
    pub delivery_method: String,
    pub prerequisites: String,
    pub corequisites: String,
    pub degree_level: String,
    /// Most recent offering first
    pub offerings: Vec<CourseOffering>,
}

impl CourseOutline {
    /// Order offerings newest first.
    pub fn sort_offerings(&mut self) {
        self.offerings
            .sort_by_key(|o| std::cmp::Reverse(term_sort_value(&o.term)));
    }
}

impl CourseKeyed for CourseOutline {
    fn dept(&self) -> &str {
        &self.dept
    }

    fn number(&self) -> &str {
        &self.number
    }
}

/// A term's section aggregate joined with its outline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourseOutlineWithSectionDetails {
    pub dept: String,
    pub number: String,
    pub title: String,
    pub units: String,
    pub description: String,
    pub designation: String,
    pub delivery_method: String,
    pub prerequisites: String,
    pub corequisites: String,
    pub degree_level: String,
    pub term: String,
    pub section_details: Vec<SectionDetail>,
}

impl CourseOutlineWithSectionDetails {
    pub fn join(outline: &CourseOutline, course: CourseWithSectionDetails) -> Self {
        Self {
            dept: outline.dept.clone(),
            number: outline.number.clone(),
            title: outline.title.clone(),
            units: outline.units.clone(),
            description: outline.description.clone(),
            designation: outline.designation.clone(),
            delivery_method: outline.delivery_method.clone(),
            prerequisites: outline.prerequisites.clone(),
            corequisites: outline.corequisites.clone(),
            degree_level: outline.degree_level.clone(),
            term: course.term,
            section_details: course.section_details,
        }
    }
}

impl CourseKeyed for CourseOutlineWithSectionDetails {
    fn dept(&self) -> &str {
        &self.dept
    }

    fn number(&self) -> &str {
        &self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_offerings_newest_first() {
        let mut outline = CourseOutline {
            offerings: ["Fall 2024", "Spring 2025", "Summer 2024", "bogus"]
                .iter()
                .map(|t| CourseOffering {
                    term: t.to_string(),
                    instructors: Vec::new(),
                })
                .collect(),
            ..Default::default()
        };
        outline.sort_offerings();
        let terms: Vec<_> = outline.offerings.iter().map(|o| o.term.as_str()).collect();
        assert_eq!(terms, ["Spring 2025", "Fall 2024", "Summer 2024", "bogus"]);
    }

    #[test]
    fn test_outline_decodes_catalog_info_ignoring_extras() {
        let json = r#"{"dept": "CMPT", "number": "225", "title": "Data Structures",
                       "deliveryMethod": "In Person", "outlinePath": "2024/fall/cmpt/225/d100"}"#;
        let outline: CourseOutline = serde_json::from_str(json).unwrap();
        assert_eq!(outline.delivery_method, "In Person");
        assert!(outline.offerings.is_empty());
    }
}
