// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::HarvesterConfig;

/// Create a configured asynchronous HTTP client.
///
/// The client-level timeout equals the per-request deadline so a hung
/// connection never outlives its leaf scope.
pub fn create_async_client(config: &HarvesterConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    Ok(client)
}
