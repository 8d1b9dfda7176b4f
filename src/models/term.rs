// src/models/term.rs

//! Academic term identifiers.
//!
//! A term is addressed three ways across the system:
//! - code `2025-spring` (snapshot file names, config, store partitions)
//! - catalog path `2025/spring` (remote catalog URLs)
//! - label `Spring 2025` (what the catalog writes into records)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// Season of an academic term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }

    /// Capitalized form used in term labels.
    pub fn title(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }

    /// Month the season starts in, used to order terms chronologically.
    pub fn month(&self) -> i32 {
        match self {
            Season::Spring => 1,
            Season::Summer => 5,
            Season::Fall => 9,
        }
    }
}

impl FromStr for Season {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" => Ok(Season::Fall),
            _ => Err(AppError::InvalidTerm(s.to_string())),
        }
    }
}

/// One crawl epoch and one store partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermKey {
    year: String,
    season: Season,
}

impl TermKey {
    pub fn new(year: impl Into<String>, season: Season) -> Result<Self, AppError> {
        let year = year.into();
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::InvalidTerm(format!("{}-{}", year, season.as_str())));
        }
        Ok(Self { year, season })
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn season(&self) -> Season {
        self.season
    }

    /// `2025-spring`
    pub fn code(&self) -> String {
        format!("{}-{}", self.year, self.season.as_str())
    }

    /// `2025/spring`
    pub fn catalog_path(&self) -> String {
        format!("{}/{}", self.year, self.season.as_str())
    }

    /// `Spring 2025`
    pub fn label(&self) -> String {
        format!("{} {}", self.season.title(), self.year)
    }

    /// Chronological ordering value: `year * 100 + month`.
    pub fn sort_value(&self) -> i32 {
        self.year.parse::<i32>().unwrap_or(0) * 100 + self.season.month()
    }
}

impl FromStr for TermKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, season) = s
            .trim()
            .split_once(['-', '/'])
            .ok_or_else(|| AppError::InvalidTerm(s.to_string()))?;
        let season = season
            .parse()
            .map_err(|_| AppError::InvalidTerm(s.to_string()))?;
        Self::new(year, season).map_err(|_| AppError::InvalidTerm(s.to_string()))
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for TermKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for TermKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordering value for a term label such as `Fall 2024`.
///
/// Unknown seasons contribute month 0 and malformed labels yield 0, so they
/// sort after every real term in descending order.
pub fn term_sort_value(label: &str) -> i32 {
    let mut parts = label.split_whitespace();
    let (Some(season), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
        return 0;
    };
    let Ok(year) = year.parse::<i32>() else {
        return 0;
    };
    let month = season.parse::<Season>().map(|s| s.month()).unwrap_or(0);
    year * 100 + month
}
