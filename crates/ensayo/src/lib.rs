//! Ensayo: Rust-native end-to-end web test suite with failure triage.
//!
//! Scenarios drive the application under test through page objects over a
//! browser session. When a scenario fails, the triage pipeline captures a
//! screenshot, files (or dedups) a defect ticket in a Jira-style tracker,
//! and attaches the execution log to the test's report entry.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     ENSAYO Architecture                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐     │
//! │   │ Scenarios  │───►│  Harness   │───►│ Headless Browser   │     │
//! │   │ (page      │    │ (outcomes) │    │ (chromium / mock)  │     │
//! │   │  objects)  │    └─────┬──────┘    └────────────────────┘     │
//! │   └────────────┘          │ fail edge                            │
//! │                    ┌──────▼──────┐    ┌────────────────────┐     │
//! │                    │   Failure   │───►│ Tracker + Report   │     │
//! │                    │   Triage    │    │ Store              │     │
//! │                    └─────────────┘    └────────────────────┘     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod browser;
mod config;
mod harness;
mod outcome;
mod report;
mod result;

/// Page objects for the application under test
pub mod page;

/// Jira-style defect tracker client
pub mod tracker;

/// Failure triage pipeline
pub mod triage;

pub use browser::{Browser, BrowserConfig, Page};
pub use config::{SuiteConfig, DEFAULT_LOG_PATH, DEFAULT_REPORT_DIR};
pub use harness::{Expectation, Harness, ScenarioFn, SuiteResults, TestCase, TestSuite};
pub use outcome::{TestOutcome, TestPhase, TestStatus};
pub use report::{Attachment, AttachmentKind, Link, ReportStore, TestReport};
pub use result::{EnsayoError, EnsayoResult};
pub use tracker::{TicketDirectory, TicketKey, TrackerClient, TrackerConfig};
pub use triage::{FailureTriage, TriageConfig, TriageSummary};
