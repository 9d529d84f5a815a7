//! Ensayo CLI: command-line interface for the web test suite
//!
//! ## Usage
//!
//! ```bash
//! ensayo                                # Run the suite against BASE_URL
//! ensayo --browser-name chrome          # Browser selection
//! ensayo --url-start https://app.test   # Override the starting URL
//! ensayo --env staging                  # Environment label for the run
//! ```

#![warn(missing_docs)]

use clap::{Parser, ValueEnum};

mod error;

/// Tracing initialization
pub mod logging;

/// Suite execution
pub mod runner;

/// The login/inventory scenario suite
pub mod scenarios;

pub use error::{CliError, CliResult};

/// Browser the suite runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowserName {
    /// Chromium-based browser driven over CDP
    Chrome,
    /// Firefox (not supported by the CDP driver)
    Firefox,
}

/// Command-line interface for running the ensayo suite
#[derive(Debug, Parser)]
#[command(
    name = "ensayo",
    version,
    about = "End-to-end web test suite with failure triage"
)]
pub struct Cli {
    /// Browser selection
    #[arg(long = "browser-name", value_enum, default_value = "chrome")]
    pub browser_name: BrowserName,

    /// Starting URL (overrides BASE_URL from the environment)
    #[arg(long = "url-start")]
    pub url_start: Option<String>,

    /// Environment to run tests against
    #[arg(long = "env", default_value = "test")]
    pub env: String,
}
