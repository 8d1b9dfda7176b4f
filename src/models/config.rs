//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TermKey;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote catalog and traversal settings
    #[serde(default)]
    pub harvester: HarvesterConfig,

    /// Snapshot cache settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Term codes that are harvested and served (e.g. `2025-spring`)
    #[serde(default = "defaults::terms")]
    pub terms: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Parsed term keys in configured order.
    pub fn term_keys(&self) -> Result<Vec<TermKey>> {
        self.terms.iter().map(|t| t.parse()).collect()
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let h = &self.harvester;
        if h.user_agent.trim().is_empty() {
            return Err(AppError::validation("harvester.user_agent is empty"));
        }
        url::Url::parse(&h.base_url)
            .map_err(|e| AppError::validation(format!("harvester.base_url: {e}")))?;

        let timeouts = [
            ("request_timeout_secs", h.request_timeout_secs),
            ("course_timeout_secs", h.course_timeout_secs),
            ("department_timeout_secs", h.department_timeout_secs),
            ("term_timeout_secs", h.term_timeout_secs),
        ];
        for (name, value) in timeouts {
            if value == 0 {
                return Err(AppError::validation(format!("harvester.{name} must be > 0")));
            }
        }
        if timeouts.windows(2).any(|w| w[0].1 > w[1].1) {
            return Err(AppError::validation(
                "harvester timeouts must nest: request <= course <= department <= term",
            ));
        }

        for (name, value) in [
            ("max_concurrent_departments", h.max_concurrent_departments),
            ("max_concurrent_courses", h.max_concurrent_courses),
            ("max_concurrent_sections", h.max_concurrent_sections),
        ] {
            if value == 0 {
                return Err(AppError::validation(format!("harvester.{name} must be > 0")));
            }
        }

        if self.store.sections_ttl_secs == 0 || self.store.outlines_ttl_secs == 0 {
            return Err(AppError::validation("store TTLs must be > 0"));
        }

        if self.terms.is_empty() {
            return Err(AppError::validation("No terms defined"));
        }
        let mut seen = HashSet::new();
        for term in self.term_keys()? {
            if !seen.insert(term.code()) {
                return Err(AppError::validation(format!("Duplicate term {term}")));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            harvester: HarvesterConfig::default(),
            store: StoreConfig::default(),
            terms: defaults::terms(),
        }
    }
}

/// Remote catalog client and traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvesterConfig {
    /// Catalog endpoint; node paths are appended as `?{year}/{season}/...`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Deadline for a single catalog request
    #[serde(default = "defaults::request_timeout")]
    pub request_timeout_secs: u64,

    /// Deadline for one course's subtree
    #[serde(default = "defaults::course_timeout")]
    pub course_timeout_secs: u64,

    /// Deadline for one department's subtree
    #[serde(default = "defaults::department_timeout")]
    pub department_timeout_secs: u64,

    /// Deadline for a whole term
    #[serde(default = "defaults::term_timeout")]
    pub term_timeout_secs: u64,

    #[serde(default = "defaults::max_concurrent_departments")]
    pub max_concurrent_departments: usize,

    #[serde(default = "defaults::max_concurrent_courses")]
    pub max_concurrent_courses: usize,

    #[serde(default = "defaults::max_concurrent_sections")]
    pub max_concurrent_sections: usize,
}

impl HarvesterConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            request_timeout_secs: defaults::request_timeout(),
            course_timeout_secs: defaults::course_timeout(),
            department_timeout_secs: defaults::department_timeout(),
            term_timeout_secs: defaults::term_timeout(),
            max_concurrent_departments: defaults::max_concurrent_departments(),
            max_concurrent_courses: defaults::max_concurrent_courses(),
            max_concurrent_sections: defaults::max_concurrent_sections(),
        }
    }
}

/// Snapshot cache time-to-live settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// TTL for the per-term section stores
    #[serde(default = "defaults::sections_ttl")]
    pub sections_ttl_secs: u64,

    /// TTL for the outline and instructor stores
    #[serde(default = "defaults::outlines_ttl")]
    pub outlines_ttl_secs: u64,
}

impl StoreConfig {
    pub fn sections_ttl(&self) -> Duration {
        Duration::from_secs(self.sections_ttl_secs)
    }

    pub fn outlines_ttl(&self) -> Duration {
        Duration::from_secs(self.outlines_ttl_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sections_ttl_secs: defaults::sections_ttl(),
            outlines_ttl_secs: defaults::outlines_ttl(),
        }
    }
}

mod defaults {
    // Harvester defaults
    pub fn base_url() -> String {
        "http://www.sfu.ca/bin/wcm/course-outlines".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; course-catalog/0.1)".into()
    }
    pub fn request_timeout() -> u64 {
        10
    }
    pub fn course_timeout() -> u64 {
        2 * 60
    }
    pub fn department_timeout() -> u64 {
        5 * 60
    }
    pub fn term_timeout() -> u64 {
        30 * 60
    }
    pub fn max_concurrent_departments() -> usize {
        10
    }
    pub fn max_concurrent_courses() -> usize {
        5
    }
    pub fn max_concurrent_sections() -> usize {
        20
    }

    // Store defaults
    pub fn sections_ttl() -> u64 {
        5 * 60
    }
    pub fn outlines_ttl() -> u64 {
        60 * 60
    }

    pub fn terms() -> Vec<String> {
        [
            "2024-spring",
            "2024-summer",
            "2024-fall",
            "2025-spring",
            "2025-summer",
            "2025-fall",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.harvester.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.harvester.max_concurrent_sections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_nesting_timeouts() {
        let mut config = Config::default();
        config.harvester.course_timeout_secs = 600;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_and_duplicate_terms() {
        let mut config = Config::default();
        config.terms = vec!["2025-winter".into()];
        assert!(config.validate().is_err());

        config.terms = vec!["2025-fall".into(), "2025-FALL".into()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            terms = ["2025-spring"]

            [harvester]
            max_concurrent_sections = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.harvester.max_concurrent_sections, 4);
        assert_eq!(config.harvester.max_concurrent_departments, 10);
        assert_eq!(config.store.sections_ttl_secs, 300);
        assert_eq!(config.term_keys().unwrap()[0].label(), "Spring 2025");
    }
}
