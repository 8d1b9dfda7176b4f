// src/pipeline/validate.rs

use std::path::Path;

use crate::error::Result;
use crate::models::Config;
use crate::utils::report;

/// Load and validate the configuration file.
pub fn run_validate(config_path: &Path) -> Result<Config> {
    report::header("Validating configuration");

    let loaded = Config::load(config_path).and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    match loaded {
        Ok(config) => {
            report::success(&format!("Configuration OK: {}", config_path.display()));
            let h = &config.harvester;
            report::sub_item(&format!("Base URL: {}", h.base_url));
            report::sub_item(&format!("User agent: {}", h.user_agent));
            report::sub_item(&format!(
                "Concurrency: {} departments / {} courses / {} sections",
                h.max_concurrent_departments, h.max_concurrent_courses, h.max_concurrent_sections
            ));
            report::sub_item(&format!(
                "Timeouts: request {}s / course {}s / department {}s / term {}s",
                h.request_timeout_secs,
                h.course_timeout_secs,
                h.department_timeout_secs,
                h.term_timeout_secs
            ));
            report::sub_item(&format!("Terms: {}", config.terms.join(", ")));
            Ok(config)
        }
        Err(e) => {
            log::error!("Validation failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_accepts_partial_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "terms = [\"2025-spring\", \"2025-summer\"]\n").unwrap();

        let config = run_validate(&path).unwrap();
        assert_eq!(config.terms.len(), 2);
    }

    #[test]
    fn test_validate_rejects_missing_and_invalid() {
        let tmp = TempDir::new().unwrap();
        assert!(run_validate(&tmp.path().join("absent.toml")).is_err());

        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[store]\nsections_ttl_secs = 0\n").unwrap();
        assert!(run_validate(&path).is_err());
    }
}
