//! Test harness for running scenario suites.
//!
//! One scenario executes at a time. Each case gets a fresh page navigated
//! to the application base URL (setup phase), runs its body (call phase),
//! and on completion flows through the failure triage and into the report
//! store. A failing case never aborts the suite.

use crate::browser::{Browser, Page};
use crate::outcome::{TestOutcome, TestPhase};
use crate::report::{ReportStore, TestReport};
use crate::result::EnsayoResult;
use crate::triage::{log_non_failure, FailureTriage};
use futures::future::BoxFuture;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// A scenario body: an async function over the per-test page handle.
pub type ScenarioFn = for<'a> fn(&'a mut Page) -> BoxFuture<'a, EnsayoResult<()>>;

/// How a case is expected to complete
#[derive(Debug, Clone)]
pub enum Expectation {
    /// Runs and must pass
    Pass,
    /// Not run at all
    Skip {
        /// Why the case is skipped
        reason: String,
    },
    /// Runs and is expected to fail
    Xfail {
        /// Why failure is expected
        reason: String,
    },
}

/// A single test case
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Test name
    pub name: String,
    /// Completion expectation
    pub expectation: Expectation,
    run: ScenarioFn,
}

impl TestCase {
    /// Create a test case expected to pass
    #[must_use]
    pub fn new(name: impl Into<String>, run: ScenarioFn) -> Self {
        Self {
            name: name.into(),
            expectation: Expectation::Pass,
            run,
        }
    }

    /// Mark the case as skipped
    #[must_use]
    pub fn with_skip(mut self, reason: impl Into<String>) -> Self {
        self.expectation = Expectation::Skip {
            reason: reason.into(),
        };
        self
    }

    /// Mark the case as an expected failure
    #[must_use]
    pub fn with_xfail(mut self, reason: impl Into<String>) -> Self {
        self.expectation = Expectation::Xfail {
            reason: reason.into(),
        };
        self
    }
}

/// A test suite containing multiple cases
#[derive(Debug, Clone, Default)]
pub struct TestSuite {
    /// Suite name
    pub name: String,
    /// Cases in this suite
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: Vec::new(),
        }
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Get the number of cases
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}

/// Results from running a test suite
#[derive(Debug, Clone)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual outcomes
    pub outcomes: Vec<TestOutcome>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if no case failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.outcomes.iter().any(|o| o.status.is_fatal())
    }

    /// Count passed cases
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_passed()).count()
    }

    /// Count failed cases
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_failed()).count()
    }

    /// Get total case count
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Get failing outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&TestOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_failed())
            .collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        let skipped = self
            .outcomes
            .iter()
            .filter(|o| matches!(o.status, crate::outcome::TestStatus::Skipped))
            .count();
        let xfailed = self
            .outcomes
            .iter()
            .filter(|o| matches!(o.status, crate::outcome::TestStatus::Xfailed))
            .count();
        format!(
            "{} passed, {} failed, {skipped} skipped, {xfailed} xfailed in {:.2}s",
            self.passed_count(),
            self.failed_count(),
            self.duration.as_secs_f64()
        )
    }
}

/// Drives a suite against a live browser session.
#[derive(Debug)]
pub struct Harness<'a> {
    browser: &'a Browser,
    base_url: String,
    triage: FailureTriage<'a>,
    store: &'a ReportStore,
}

impl<'a> Harness<'a> {
    /// Create a harness over a running browser
    #[must_use]
    pub fn new(
        browser: &'a Browser,
        base_url: impl Into<String>,
        triage: FailureTriage<'a>,
        store: &'a ReportStore,
    ) -> Self {
        Self {
            browser,
            base_url: base_url.into(),
            triage,
            store,
        }
    }

    /// Run every case in the suite sequentially
    pub async fn run(&self, suite: &TestSuite) -> SuiteResults {
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(suite.tests.len());

        for case in &suite.tests {
            outcomes.push(self.run_case(case).await);
        }

        SuiteResults {
            suite_name: suite.name.clone(),
            outcomes,
            duration: start.elapsed(),
        }
    }

    async fn run_case(&self, case: &TestCase) -> TestOutcome {
        info!("▶ Starting {}", case.name);

        if let Expectation::Skip { reason } = &case.expectation {
            let outcome = TestOutcome::skipped(&case.name, reason.clone());
            log_non_failure(&outcome);
            self.persist(&outcome, None).await;
            return outcome;
        }

        // Setup phase: fresh page navigated to the application.
        let mut page = match self.browser.new_page().await {
            Ok(page) => page,
            Err(e) => {
                let outcome = TestOutcome::failed(&case.name, Duration::ZERO, e.to_string())
                    .with_phase(TestPhase::Setup);
                self.persist(&outcome, None).await;
                return outcome;
            }
        };
        if let Err(e) = page.goto(&self.base_url).await {
            let outcome = TestOutcome::failed(&case.name, Duration::ZERO, e.to_string())
                .with_phase(TestPhase::Setup);
            self.persist(&outcome, Some(&page)).await;
            return outcome;
        }

        // Call phase.
        let start = Instant::now();
        let result = (case.run)(&mut page).await;
        let duration = start.elapsed();

        let outcome = match result {
            Ok(()) => {
                if let Expectation::Xfail { reason } = &case.expectation {
                    warn!("{} passed but was expected to fail: {reason}", case.name);
                }
                TestOutcome::passed(&case.name, duration)
            }
            Err(e) => {
                if let Expectation::Xfail { reason } = &case.expectation {
                    TestOutcome::xfailed(&case.name, duration, reason.clone())
                } else {
                    TestOutcome::failed(&case.name, duration, e.to_string())
                }
            }
        };

        log_non_failure(&outcome);
        self.persist(&outcome, Some(&page)).await;
        outcome
    }

    /// Run triage and write the report entry. Neither step may change the
    /// verdict, so failures here are logged and swallowed.
    async fn persist(&self, outcome: &TestOutcome, page: Option<&Page>) {
        let mut report = TestReport::for_outcome(outcome);
        let _ = self.triage.run(outcome, page, &mut report).await;
        if let Err(e) = self.store.write(&report) {
            error!("failed to write report entry for {}: {e}", outcome.name);
        }
    }
}
