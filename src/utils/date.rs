// src/utils/date.rs

//! Catalog date normalization.
//!
//! The catalog writes schedule dates like `Tue Sep 03 00:00:00 PDT 2024`.
//! Snapshots store them as `2024-09-03`.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{AppError, Result};

const CANONICAL: &str = "%Y-%m-%d";

/// Reformat a verbose catalog timestamp as `YYYY-MM-DD`.
///
/// The zone abbreviation is ignored; only the calendar date is kept.
pub fn transform_date(input: &str) -> Result<String> {
    let input = input.trim();
    if NaiveDate::parse_from_str(input, CANONICAL).is_ok() {
        return Ok(input.to_string());
    }

    let parts: Vec<&str> = input.split_whitespace().collect();
    let [_weekday, month, day, time, _zone, year] = parts.as_slice() else {
        return Err(AppError::validation(format!("unrecognized date '{input}'")));
    };
    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .map_err(|e| AppError::validation(format!("unrecognized time in '{input}': {e}")))?;
    let date = NaiveDate::parse_from_str(&format!("{month} {day} {year}"), "%b %d %Y")
        .map_err(|e| AppError::validation(format!("unrecognized date '{input}': {e}")))?;

    Ok(date.format(CANONICAL).to_string())
}

/// Best-effort variant used while merging sections.
///
/// Empty input stays empty. Unparsable input is logged and kept verbatim so
/// the surrounding section is still persisted.
pub fn normalize_date(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    match transform_date(input) {
        Ok(date) => date,
        Err(e) => {
            log::warn!("Keeping raw schedule date: {e}");
            input.to_string()
        }
    }
}
