//! HTTP client for a Jira-style defect tracker.
//!
//! Files one ticket per distinct failing test, deduplicating by test-name
//! summary among tickets whose status category is not Done. The dedup
//! lookup and the create are two separate requests: concurrent workers
//! failing the same test inside that window can still double-file.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Tracker-assigned ticket key (e.g. `SCRUM-101`).
pub type TicketKey = String;

/// Errors from the tracker client.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Tracker returned an error status.
    #[error("Tracker API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
}

/// Basic-auth credentials for the tracker REST API.
#[derive(Clone)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// API token paired with the email.
    pub api_token: String,
}

impl Credentials {
    /// Create credentials from an email + API token pair.
    #[must_use]
    pub fn new(email: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_token: api_token.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Explicitly constructed tracker configuration, injected into the client.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Base URL of the tracker (no trailing slash).
    pub base_url: String,
    /// Project the tickets are filed under.
    pub project_key: String,
    /// Basic-auth credentials.
    pub credentials: Credentials,
}

impl TrackerConfig {
    /// Create a new config. The base URL is normalized to have no
    /// trailing slash.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        project_key: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_key: project_key.into(),
            credentials,
        }
    }
}

/// Summary used for both dedup lookup and ticket creation.
#[must_use]
pub fn summary_for(test_name: &str) -> String {
    format!("Test failure: {test_name}")
}

/// JQL matching open tickets whose summary contains the test name.
/// Substring semantics are delegated to the tracker's `~` operator.
fn dedup_jql(project_key: &str, test_name: &str) -> String {
    let escaped = test_name.replace('"', "\\\"");
    format!("project = {project_key} AND summary ~ \"{escaped}\" AND statusCategory != Done")
}

/// Rich-document description embedding the failure detail.
fn description_doc(error_detail: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "doc",
        "version": 1,
        "content": [
            {
                "type": "paragraph",
                "content": [
                    {
                        "type": "text",
                        "text": format!("Filed automatically by the ensayo failure triage. {error_detail}"),
                    }
                ]
            }
        ]
    })
}

#[derive(Debug, Serialize)]
struct SearchRequest {
    jql: String,
    fields: Vec<String>,
    #[serde(rename = "maxResults")]
    max_results: u32,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<SearchIssue>,
}

#[derive(Debug, Deserialize)]
struct SearchIssue {
    #[serde(default)]
    key: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateRequest {
    fields: IssueFields,
}

#[derive(Debug, Serialize)]
struct IssueFields {
    project: ProjectRef,
    summary: String,
    description: serde_json::Value,
    issuetype: IssueTypeRef,
}

#[derive(Debug, Serialize)]
struct ProjectRef {
    key: String,
}

#[derive(Debug, Serialize)]
struct IssueTypeRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: TicketKey,
}

/// Extract the first issue key from a search response.
///
/// A hit without a key field is a data-integrity anomaly on the tracker
/// side; it is warn-logged and treated as "not found".
fn first_issue_key(response: &SearchResponse) -> Option<TicketKey> {
    let issue = response.issues.first()?;
    match issue.key.as_deref() {
        Some(key) if !key.is_empty() => Some(key.to_string()),
        _ => {
            warn!("search hit without a key field, treating as not found");
            None
        }
    }
}

/// Directory of defect tickets keyed by failing-test summary.
///
/// The failure triage consumes the tracker through this seam so tests can
/// substitute an in-memory directory.
#[async_trait::async_trait]
pub trait TicketDirectory: Send + Sync {
    /// Return the open ticket for this test name, creating one if absent.
    async fn get_or_create_ticket(
        &self,
        test_name: &str,
        error_detail: &str,
    ) -> Result<TicketKey, TrackerError>;

    /// Human-facing URL for a ticket key.
    fn browse_url(&self, key: &str) -> String;
}

/// Jira-style tracker REST client.
#[derive(Debug, Clone)]
pub struct TrackerClient {
    config: TrackerConfig,
    client: reqwest::Client,
}

impl TrackerClient {
    /// Create a client with the default HTTP client. No timeout is set
    /// beyond reqwest's own defaults.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with a custom reqwest client (for custom timeouts,
    /// proxies, etc.).
    #[must_use]
    pub fn with_client(config: TrackerConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the configured project key.
    #[must_use]
    pub fn project_key(&self) -> &str {
        &self.config.project_key
    }

    /// Look up an open ticket whose summary contains `test_name`.
    ///
    /// Requests at most one match. Returns `None` on zero results or when
    /// the hit lacks a key field.
    pub async fn find_existing_ticket(
        &self,
        test_name: &str,
    ) -> Result<Option<TicketKey>, TrackerError> {
        let request = SearchRequest {
            jql: dedup_jql(&self.config.project_key, test_name),
            fields: vec!["key".to_string()],
            max_results: 1,
        };

        let url = format!("{}/rest/api/3/search/jql", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.credentials.email,
                Some(&self.config.credentials.api_token),
            )
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TrackerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response: SearchResponse = resp.json().await?;
        debug!(hits = response.issues.len(), "ticket search response");
        Ok(first_issue_key(&response))
    }

    /// Create a new defect ticket for a failing test. Returns the new key.
    pub async fn create_ticket(
        &self,
        test_name: &str,
        error_detail: &str,
    ) -> Result<TicketKey, TrackerError> {
        let request = CreateRequest {
            fields: IssueFields {
                project: ProjectRef {
                    key: self.config.project_key.clone(),
                },
                summary: summary_for(test_name),
                description: description_doc(error_detail),
                issuetype: IssueTypeRef {
                    name: "Bug".to_string(),
                },
            },
        };

        let url = format!("{}/rest/api/3/issue", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.credentials.email,
                Some(&self.config.credentials.api_token),
            )
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TrackerError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedIssue = resp.json().await?;
        info!(key = %created.key, "created defect ticket");
        Ok(created.key)
    }
}

#[async_trait::async_trait]
impl TicketDirectory for TrackerClient {
    async fn get_or_create_ticket(
        &self,
        test_name: &str,
        error_detail: &str,
    ) -> Result<TicketKey, TrackerError> {
        if let Some(existing) = self.find_existing_ticket(test_name).await? {
            info!(key = %existing, "reusing open defect ticket");
            return Ok(existing);
        }
        self.create_ticket(test_name, error_detail).await
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.config.base_url)
    }
}
