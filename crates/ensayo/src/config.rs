//! Run configuration assembled once at startup.
//!
//! Values come from the process environment (presence-checked only) and
//! are snapshotted into explicit config structs that get injected into the
//! components that need them. Nothing reads ambient process state after
//! startup.

use crate::result::{EnsayoError, EnsayoResult};
use crate::tracker::{Credentials, TrackerConfig};
use std::path::PathBuf;

/// Default location of the execution log attached to failure reports.
pub const DEFAULT_LOG_PATH: &str = "test_run_logs/test_run.log";

/// Default output directory for per-test report entries.
pub const DEFAULT_REPORT_DIR: &str = "report-results";

/// Configuration for one suite run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Environment label this run targets (e.g. "test", "staging").
    pub environment: String,
    /// Base URL of the application under test.
    pub base_url: String,
    /// Whether failing tests file defect tickets.
    pub file_tickets: bool,
    /// Tracker settings; present when `file_tickets` is true.
    pub tracker: Option<TrackerConfig>,
    /// Execution log attached to failure reports when present.
    pub log_path: PathBuf,
    /// Output directory for report entries.
    pub report_dir: PathBuf,
}

impl SuiteConfig {
    /// Snapshot configuration from the process environment.
    ///
    /// `BASE_URL` must be set, and when `CREATE_JIRA_ON_FAILURE` is
    /// `"true"` the tracker variables (`JIRA_URL`, `JIRA_PROJECT`,
    /// `JIRA_EMAIL`, `JIRA_API_TOKEN`) must be set as well; a missing
    /// value aborts the run before any scenario executes.
    pub fn from_env(environment: impl Into<String>) -> EnsayoResult<Self> {
        Self::from_lookup(environment, |name| std::env::var(name).ok())
    }

    /// Snapshot configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(environment: impl Into<String>, lookup: F) -> EnsayoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| EnsayoError::MissingConfig {
                    name: name.to_string(),
                })
        };

        let base_url = require("BASE_URL")?;
        let file_tickets =
            lookup("CREATE_JIRA_ON_FAILURE").as_deref() == Some("true");

        let tracker = if file_tickets {
            Some(TrackerConfig::new(
                require("JIRA_URL")?,
                require("JIRA_PROJECT")?,
                Credentials::new(require("JIRA_EMAIL")?, require("JIRA_API_TOKEN")?),
            ))
        } else {
            None
        };

        Ok(Self {
            environment: environment.into(),
            base_url,
            file_tickets,
            tracker,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        })
    }

    /// Override the execution log location.
    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Override the report output directory.
    #[must_use]
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn lookup(map: &HashMap<String, String>) -> impl Fn(&str) -> Option<String> + '_ {
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_minimal_config_without_ticket_filing() {
        let vars = env(&[("BASE_URL", "https://app.example.com")]);
        let config = SuiteConfig::from_lookup("test", lookup(&vars)).unwrap();

        assert_eq!(config.base_url, "https://app.example.com");
        assert!(!config.file_tickets);
        assert!(config.tracker.is_none());
        assert_eq!(config.log_path, PathBuf::from(DEFAULT_LOG_PATH));
    }

    #[test]
    fn test_missing_base_url_is_fatal() {
        let vars = env(&[]);
        let err = SuiteConfig::from_lookup("test", lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            EnsayoError::MissingConfig { ref name } if name == "BASE_URL"
        ));
    }

    #[test]
    fn test_empty_base_url_is_fatal() {
        let vars = env(&[("BASE_URL", "")]);
        assert!(SuiteConfig::from_lookup("test", lookup(&vars)).is_err());
    }

    #[test]
    fn test_ticket_filing_requires_tracker_vars() {
        let vars = env(&[
            ("BASE_URL", "https://app.example.com"),
            ("CREATE_JIRA_ON_FAILURE", "true"),
            ("JIRA_URL", "https://tracker.example.com"),
            ("JIRA_PROJECT", "SCRUM"),
            ("JIRA_EMAIL", "qa@example.com"),
        ]);
        // JIRA_API_TOKEN absent
        let err = SuiteConfig::from_lookup("test", lookup(&vars)).unwrap_err();
        assert!(matches!(
            err,
            EnsayoError::MissingConfig { ref name } if name == "JIRA_API_TOKEN"
        ));
    }

    #[test]
    fn test_full_tracker_config() {
        let vars = env(&[
            ("BASE_URL", "https://app.example.com"),
            ("CREATE_JIRA_ON_FAILURE", "true"),
            ("JIRA_URL", "https://tracker.example.com/"),
            ("JIRA_PROJECT", "SCRUM"),
            ("JIRA_EMAIL", "qa@example.com"),
            ("JIRA_API_TOKEN", "token-123"),
        ]);
        let config = SuiteConfig::from_lookup("staging", lookup(&vars)).unwrap();

        assert!(config.file_tickets);
        let tracker = config.tracker.unwrap();
        assert_eq!(tracker.base_url, "https://tracker.example.com");
        assert_eq!(tracker.project_key, "SCRUM");
        assert_eq!(config.environment, "staging");
    }

    #[test]
    fn test_filing_disabled_ignores_tracker_vars() {
        let vars = env(&[
            ("BASE_URL", "https://app.example.com"),
            ("CREATE_JIRA_ON_FAILURE", "false"),
        ]);
        let config = SuiteConfig::from_lookup("test", lookup(&vars)).unwrap();
        assert!(!config.file_tickets);
        assert!(config.tracker.is_none());
    }

    #[test]
    fn test_path_overrides() {
        let vars = env(&[("BASE_URL", "https://app.example.com")]);
        let config = SuiteConfig::from_lookup("test", lookup(&vars))
            .unwrap()
            .with_log_path("logs/run.log")
            .with_report_dir("out/reports");
        assert_eq!(config.log_path, PathBuf::from("logs/run.log"));
        assert_eq!(config.report_dir, PathBuf::from("out/reports"));
    }
}
