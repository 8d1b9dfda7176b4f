//! Utility functions and helpers.

pub mod date;
pub mod http;
pub mod report;
