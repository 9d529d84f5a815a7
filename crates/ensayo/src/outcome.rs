//! Per-test outcome records consumed by the failure triage pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Final status of a completed test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test was skipped before running
    Skipped,
    /// Test failed as expected
    Xfailed,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Check if status counts against the suite verdict
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Phase of test execution in which the outcome was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestPhase {
    /// Fixture/browser setup
    Setup,
    /// The test body
    Call,
    /// Fixture/browser teardown
    Teardown,
}

/// One record per test execution, created at completion and consumed
/// immediately by the triage pipeline. Not persisted beyond the report
/// attachment step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test identifier
    pub name: String,
    /// Final status
    pub status: TestStatus,
    /// Phase that produced this outcome
    pub phase: TestPhase,
    /// Failure detail (error chain or skip/xfail reason)
    pub detail: Option<String>,
    /// Test duration
    pub duration: Duration,
}

impl TestOutcome {
    /// Create a passing outcome for the call phase
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            phase: TestPhase::Call,
            detail: None,
            duration,
        }
    }

    /// Create a failing outcome for the call phase
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            phase: TestPhase::Call,
            detail: Some(detail.into()),
            duration,
        }
    }

    /// Create a skipped outcome
    #[must_use]
    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            phase: TestPhase::Setup,
            detail: Some(reason.into()),
            duration: Duration::ZERO,
        }
    }

    /// Create an expected-failure outcome
    #[must_use]
    pub fn xfailed(name: impl Into<String>, duration: Duration, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Xfailed,
            phase: TestPhase::Call,
            detail: Some(reason.into()),
            duration,
        }
    }

    /// Set the phase
    #[must_use]
    pub const fn with_phase(mut self, phase: TestPhase) -> Self {
        self.phase = phase;
        self
    }

    /// True only for the edge the failure triage fires on: a failed
    /// outcome produced by the test body itself.
    #[must_use]
    pub const fn is_call_failure(&self) -> bool {
        matches!(self.phase, TestPhase::Call) && self.status.is_failed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_outcome() {
        let outcome = TestOutcome::passed("login", Duration::from_millis(120));
        assert!(outcome.status.is_passed());
        assert!(!outcome.is_call_failure());
        assert!(outcome.detail.is_none());
    }

    #[test]
    fn test_failed_call_outcome_triggers_triage() {
        let outcome = TestOutcome::failed("login", Duration::from_millis(50), "assert False");
        assert!(outcome.is_call_failure());
        assert_eq!(outcome.detail.as_deref(), Some("assert False"));
    }

    #[test]
    fn test_setup_failure_does_not_trigger_triage() {
        let outcome = TestOutcome::failed("login", Duration::ZERO, "no browser")
            .with_phase(TestPhase::Setup);
        assert!(outcome.status.is_failed());
        assert!(!outcome.is_call_failure());
    }

    #[test]
    fn test_skip_and_xfail_are_not_fatal() {
        let skipped = TestOutcome::skipped("checkout", "not implemented");
        let xfailed = TestOutcome::xfailed("view_product", Duration::ZERO, "BUG-123");
        assert!(!skipped.status.is_fatal());
        assert!(!xfailed.status.is_fatal());
        assert!(!skipped.is_call_failure());
        assert!(!xfailed.is_call_failure());
    }
}
