//! Drives one suite run: config assembly, session setup, execution,
//! result rendering, exit status.

use crate::error::{CliError, CliResult};
use crate::scenarios;
use crate::{BrowserName, Cli};
use console::style;
use ensayo::tracker::TicketDirectory;
use ensayo::{
    Browser, BrowserConfig, FailureTriage, Harness, ReportStore, SuiteConfig, SuiteResults,
    TestStatus, TrackerClient, TriageConfig,
};
use tracing::{info, warn};

/// Run the scenario suite per the CLI options.
///
/// Returns `Ok(())` only when no case failed; the failure count is carried
/// in the error so the process exit code reflects the verdict.
pub async fn run(cli: &Cli) -> CliResult<()> {
    let mut config = SuiteConfig::from_env(&cli.env)?;
    if let Some(url) = &cli.url_start {
        config.base_url.clone_from(url);
    }
    info!(
        "BASE_URL is set: {} (environment: {})",
        config.base_url, config.environment
    );

    let browser_config = browser_config_for(cli.browser_name)?;

    let store = ReportStore::new(&config.report_dir);
    store.reset_session_dir().map_err(CliError::from)?;

    let browser = Browser::launch(browser_config).await?;

    let tracker = config.tracker.clone().map(TrackerClient::new);
    let directory = tracker.as_ref().map(|c| c as &dyn TicketDirectory);
    let triage = FailureTriage::new(
        TriageConfig::new(config.file_tickets, config.log_path.clone()),
        directory,
    );

    let harness = Harness::new(&browser, &config.base_url, triage, &store);
    let suite = scenarios::suite();

    info!("Starting test run...");
    let results = harness.run(&suite).await;
    print_results(&results);

    if let Err(e) = browser.close().await {
        warn!("browser close failed: {e}");
    }

    if results.all_passed() {
        Ok(())
    } else {
        Err(CliError::test_execution(format!(
            "{} test(s) failed",
            results.failed_count()
        )))
    }
}

fn browser_config_for(name: BrowserName) -> CliResult<BrowserConfig> {
    match name {
        BrowserName::Chrome => Ok(BrowserConfig::default()),
        BrowserName::Firefox => Err(CliError::config(
            "firefox is not supported by the CDP driver; use --browser-name chrome",
        )),
    }
}

fn print_results(results: &SuiteResults) {
    for outcome in &results.outcomes {
        let tag = match outcome.status {
            TestStatus::Passed => style("PASS ").green(),
            TestStatus::Failed => style("FAIL ").red(),
            TestStatus::Skipped => style("SKIP ").yellow(),
            TestStatus::Xfailed => style("XFAIL").yellow(),
        };
        match (&outcome.status, &outcome.detail) {
            (TestStatus::Failed, Some(detail)) => {
                println!("{tag} {} - {detail}", outcome.name);
            }
            _ => println!("{tag} {}", outcome.name),
        }
    }
    println!("{}", results.summary());
}
