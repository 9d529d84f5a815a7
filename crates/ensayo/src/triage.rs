//! Failure triage: the hook that runs once per completed test case.
//!
//! On the fail edge of the call phase it captures a screenshot, files (or
//! dedups) a defect ticket, and attaches the execution log to the test's
//! report entry. Every step is best-effort and isolated: a failing step is
//! logged and recorded in the step's result, and the remaining steps still
//! run. No step touches the test's verdict; all side effects are additive.

use crate::browser::Page;
use crate::outcome::{TestOutcome, TestStatus};
use crate::report::{Attachment, TestReport};
use crate::tracker::{TicketDirectory, TicketKey};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Settings for the triage pipeline
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Whether failing tests file defect tickets
    pub file_tickets: bool,
    /// Execution log attached when present
    pub log_path: PathBuf,
}

impl TriageConfig {
    /// Create a new config
    #[must_use]
    pub fn new(file_tickets: bool, log_path: impl Into<PathBuf>) -> Self {
        Self {
            file_tickets,
            log_path: log_path.into(),
        }
    }
}

/// Outcome of the screenshot step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenshotResult {
    /// Screenshot captured and attached
    Captured,
    /// No live page handle was available
    NoPage,
    /// Capture failed; logged and skipped
    Failed(String),
}

/// Outcome of the ticket-filing step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketResult {
    /// Ticket filed or reused; report annotated
    Filed(TicketKey),
    /// Filing is disabled for this run
    Disabled,
    /// The tracker call failed; logged and skipped
    Failed(String),
}

/// Outcome of the log-attachment step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogAttachResult {
    /// Execution log attached
    Attached,
    /// No log file at the configured path; not an error
    Missing,
    /// Reading the log failed; logged and skipped
    Failed(String),
}

/// Aggregated step results for one triaged failure
#[derive(Debug, Clone)]
pub struct TriageSummary {
    /// Screenshot step result
    pub screenshot: ScreenshotResult,
    /// Ticket step result
    pub ticket: TicketResult,
    /// Log attachment step result
    pub log: LogAttachResult,
}

impl TriageSummary {
    /// Key of the ticket this failure was filed under, if any
    #[must_use]
    pub fn ticket_key(&self) -> Option<&str> {
        match &self.ticket {
            TicketResult::Filed(key) => Some(key),
            _ => None,
        }
    }
}

/// The failure-reporting hook.
///
/// Holds the run settings and an optional ticket directory; fires only for
/// failures produced by the test body itself.
pub struct FailureTriage<'a> {
    config: TriageConfig,
    directory: Option<&'a dyn TicketDirectory>,
}

impl std::fmt::Debug for FailureTriage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureTriage")
            .field("config", &self.config)
            .field("has_directory", &self.directory.is_some())
            .finish()
    }
}

impl<'a> FailureTriage<'a> {
    /// Create the hook
    #[must_use]
    pub fn new(config: TriageConfig, directory: Option<&'a dyn TicketDirectory>) -> Self {
        Self { config, directory }
    }

    /// Run the pipeline for a completed test.
    ///
    /// Returns `None` when the outcome is not a call-phase failure; the
    /// hook does nothing in that case. Otherwise returns the aggregated
    /// step results. This function never returns an error: each step's
    /// failure is captured in its result and logged.
    pub async fn run(
        &self,
        outcome: &TestOutcome,
        page: Option<&Page>,
        report: &mut TestReport,
    ) -> Option<TriageSummary> {
        if !outcome.is_call_failure() {
            return None;
        }

        info!("Test failed: {}", outcome.name);

        let screenshot = self.capture_screenshot(page, report).await;
        let ticket = self.file_ticket(outcome, report).await;
        let log = self.attach_log(report);

        let summary = TriageSummary {
            screenshot,
            ticket,
            log,
        };
        info!(?summary, "failure triage complete");
        Some(summary)
    }

    async fn capture_screenshot(
        &self,
        page: Option<&Page>,
        report: &mut TestReport,
    ) -> ScreenshotResult {
        let Some(page) = page else {
            return ScreenshotResult::NoPage;
        };
        match page.screenshot().await {
            Ok(bytes) => {
                report.attach(Attachment::png("Failure Screenshot", bytes));
                info!("attached failure screenshot");
                ScreenshotResult::Captured
            }
            Err(e) => {
                error!("Screenshot capture failed: {e}");
                ScreenshotResult::Failed(e.to_string())
            }
        }
    }

    async fn file_ticket(&self, outcome: &TestOutcome, report: &mut TestReport) -> TicketResult {
        if !self.config.file_tickets {
            return TicketResult::Disabled;
        }
        let Some(directory) = self.directory else {
            warn!("ticket filing enabled but no tracker configured");
            return TicketResult::Disabled;
        };

        let detail = outcome.detail.as_deref().unwrap_or_default();
        match directory.get_or_create_ticket(&outcome.name, detail).await {
            Ok(key) => {
                report.link(format!("Jira: {key}"), directory.browse_url(&key));
                report.attach(Attachment::text("Jira Issue Key", format!("Jira issue: {key}")));
                info!("Issue key: {key}");
                TicketResult::Filed(key)
            }
            Err(e) => {
                error!("Failed to create Jira issue: {e}");
                TicketResult::Failed(e.to_string())
            }
        }
    }

    fn attach_log(&self, report: &mut TestReport) -> LogAttachResult {
        if !self.config.log_path.exists() {
            return LogAttachResult::Missing;
        }
        match std::fs::read_to_string(&self.config.log_path) {
            Ok(contents) => {
                report.attach(Attachment::text("Execution Log", contents));
                info!("attached execution log");
                LogAttachResult::Attached
            }
            Err(e) => {
                error!("failed to read execution log: {e}");
                LogAttachResult::Failed(e.to_string())
            }
        }
    }
}

/// Lightweight hook logging skip/xfail outcomes.
pub fn log_non_failure(outcome: &TestOutcome) {
    match outcome.status {
        TestStatus::Skipped => {
            let reason = outcome.detail.as_deref().unwrap_or("");
            info!("SKIPPED: {} - {reason}", outcome.name);
        }
        TestStatus::Xfailed => {
            let reason = outcome.detail.as_deref().unwrap_or("");
            info!("XFAIL: {} - {reason}", outcome.name);
        }
        TestStatus::Passed | TestStatus::Failed => {}
    }
}

#[cfg(all(test, not(feature = "browser")))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::tracker::TrackerError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory ticket directory recording every call.
    struct FakeDirectory {
        existing: Option<(String, TicketKey)>,
        next_key: TicketKey,
        fail: bool,
        lookups: AtomicUsize,
        creates: AtomicUsize,
    }

    impl FakeDirectory {
        fn empty(next_key: &str) -> Self {
            Self {
                existing: None,
                next_key: next_key.to_string(),
                fail: false,
                lookups: AtomicUsize::new(0),
                creates: AtomicUsize::new(0),
            }
        }

        fn with_open_ticket(test_name: &str, key: &str) -> Self {
            Self {
                existing: Some((test_name.to_string(), key.to_string())),
                ..Self::empty("UNUSED-1")
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::empty("UNUSED-1")
            }
        }

        fn calls(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        fn create_calls(&self) -> usize {
            self.creates.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TicketDirectory for FakeDirectory {
        async fn get_or_create_ticket(
            &self,
            test_name: &str,
            _error_detail: &str,
        ) -> Result<TicketKey, TrackerError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TrackerError::Api {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            if let Some((name, key)) = &self.existing {
                if name == test_name {
                    return Ok(key.clone());
                }
            }
            self.creates.fetch_add(1, Ordering::SeqCst);
            Ok(self.next_key.clone())
        }

        fn browse_url(&self, key: &str) -> String {
            format!("https://tracker.example.com/browse/{key}")
        }
    }

    fn failed_outcome() -> TestOutcome {
        TestOutcome::failed("login_kwargs", Duration::from_millis(10), "assert False")
    }

    fn report_for(outcome: &TestOutcome) -> TestReport {
        TestReport::for_outcome(outcome)
    }

    fn config(file_tickets: bool) -> TriageConfig {
        // Point at a path that never exists so the log step stays out of
        // the way unless a test opts in.
        TriageConfig::new(file_tickets, "nonexistent/test_run.log")
    }

    #[tokio::test]
    async fn test_non_failures_are_ignored() {
        let directory = FakeDirectory::empty("SCRUM-1");
        let triage = FailureTriage::new(config(true), Some(&directory));

        let passed = TestOutcome::passed("login_args", Duration::from_millis(5));
        let mut report = report_for(&passed);
        assert!(triage.run(&passed, None, &mut report).await.is_none());

        let skipped = TestOutcome::skipped("checkout", "not implemented");
        let mut report = report_for(&skipped);
        assert!(triage.run(&skipped, None, &mut report).await.is_none());

        assert_eq!(directory.calls(), 0);
    }

    #[tokio::test]
    async fn test_setup_phase_failures_are_ignored() {
        let directory = FakeDirectory::empty("SCRUM-1");
        let triage = FailureTriage::new(config(true), Some(&directory));

        let outcome = TestOutcome::failed("login_kwargs", Duration::ZERO, "no browser")
            .with_phase(crate::outcome::TestPhase::Setup);
        let mut report = report_for(&outcome);

        assert!(triage.run(&outcome, None, &mut report).await.is_none());
        assert_eq!(directory.calls(), 0);
        assert!(report.attachments().is_empty());
    }

    #[tokio::test]
    async fn test_new_ticket_filed_with_link_and_key_attachment() {
        let directory = FakeDirectory::empty("SCRUM-101");
        let triage = FailureTriage::new(config(true), Some(&directory));

        let outcome = failed_outcome();
        let page = Page::new();
        let mut report = report_for(&outcome);

        let summary = triage
            .run(&outcome, Some(&page), &mut report)
            .await
            .unwrap();

        assert_eq!(summary.screenshot, ScreenshotResult::Captured);
        assert_eq!(summary.ticket_key(), Some("SCRUM-101"));
        assert_eq!(summary.log, LogAttachResult::Missing);
        assert_eq!(directory.create_calls(), 1);

        assert_eq!(
            report.links()[0],
            crate::report::Link {
                name: "Jira: SCRUM-101".to_string(),
                url: "https://tracker.example.com/browse/SCRUM-101".to_string(),
            }
        );
        let key_attachment = report
            .attachments()
            .iter()
            .find(|a| a.name == "Jira Issue Key")
            .unwrap();
        assert_eq!(key_attachment.body, b"Jira issue: SCRUM-101");
    }

    #[tokio::test]
    async fn test_open_ticket_reused_without_create() {
        let directory = FakeDirectory::with_open_ticket("login_kwargs", "SCRUM-101");
        let triage = FailureTriage::new(config(true), Some(&directory));

        let outcome = failed_outcome();
        let mut report = report_for(&outcome);
        let summary = triage.run(&outcome, None, &mut report).await.unwrap();

        assert_eq!(summary.ticket_key(), Some("SCRUM-101"));
        assert_eq!(directory.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_disabled_filing_makes_no_directory_calls() {
        let directory = FakeDirectory::empty("SCRUM-1");
        let triage = FailureTriage::new(config(false), Some(&directory));

        let outcome = failed_outcome();
        let mut report = report_for(&outcome);
        let summary = triage.run(&outcome, None, &mut report).await.unwrap();

        assert_eq!(summary.ticket, TicketResult::Disabled);
        assert_eq!(directory.calls(), 0);
        assert!(report.links().is_empty());
    }

    #[tokio::test]
    async fn test_screenshot_failure_does_not_abort_pipeline() {
        let directory = FakeDirectory::empty("SCRUM-102");
        let triage = FailureTriage::new(config(true), Some(&directory));

        let outcome = failed_outcome();
        let page = Page::new().with_failing_screenshot();
        let mut report = report_for(&outcome);

        let summary = triage
            .run(&outcome, Some(&page), &mut report)
            .await
            .unwrap();

        assert!(matches!(summary.screenshot, ScreenshotResult::Failed(_)));
        assert_eq!(summary.ticket_key(), Some("SCRUM-102"));
        assert!(report
            .attachments()
            .iter()
            .all(|a| a.name != "Failure Screenshot"));
    }

    #[tokio::test]
    async fn test_tracker_error_does_not_block_log_attachment() {
        let tmp = tempfile::tempdir().unwrap();
        let log_path = tmp.path().join("test_run.log");
        std::fs::write(&log_path, "run log contents").unwrap();

        let directory = FakeDirectory::failing();
        let triage = FailureTriage::new(TriageConfig::new(true, &log_path), Some(&directory));

        let outcome = failed_outcome();
        let mut report = report_for(&outcome);
        let summary = triage.run(&outcome, None, &mut report).await.unwrap();

        assert!(matches!(summary.ticket, TicketResult::Failed(_)));
        assert_eq!(summary.log, LogAttachResult::Attached);

        let log_attachment = report
            .attachments()
            .iter()
            .find(|a| a.name == "Execution Log")
            .unwrap();
        assert_eq!(log_attachment.body, b"run log contents");
        assert!(report.links().is_empty());
    }

    #[tokio::test]
    async fn test_missing_log_file_is_not_an_error() {
        let triage = FailureTriage::new(config(false), None);
        let outcome = failed_outcome();
        let mut report = report_for(&outcome);

        let summary = triage.run(&outcome, None, &mut report).await.unwrap();
        assert_eq!(summary.log, LogAttachResult::Missing);
        assert!(report.attachments().is_empty());
    }

    #[test]
    fn test_non_failure_logging_hook() {
        // Only observable through tracing output; must not panic.
        log_non_failure(&TestOutcome::skipped("checkout", "Feature not implemented yet"));
        log_non_failure(&TestOutcome::xfailed(
            "view_product",
            Duration::ZERO,
            "BUG-123: View Product broken",
        ));
        log_non_failure(&TestOutcome::passed("login_args", Duration::ZERO));
    }
}
