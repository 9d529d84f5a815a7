//! Per-test report entries: named, typed attachments plus external links.
//!
//! Attachments are write-once blobs owned by the store. Each completed
//! test yields one JSON entry in the output directory with its blobs
//! written alongside; the directory is reset at session start.

use crate::outcome::{TestOutcome, TestStatus};
use crate::result::EnsayoResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Type of an attachment blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Binary PNG image
    Png,
    /// Plain text
    Text,
}

impl AttachmentKind {
    /// File extension for this kind
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Text => "txt",
        }
    }
}

/// A named, typed blob attached to a test's report entry
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Display name
    pub name: String,
    /// Blob type
    pub kind: AttachmentKind,
    /// Raw content
    pub body: Vec<u8>,
}

impl Attachment {
    /// Create a PNG attachment
    #[must_use]
    pub fn png(name: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind: AttachmentKind::Png,
            body,
        }
    }

    /// Create a plain-text attachment
    #[must_use]
    pub fn text(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttachmentKind::Text,
            body: body.into().into_bytes(),
        }
    }
}

/// A named external link on a test's report entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Display name
    pub name: String,
    /// Target URL
    pub url: String,
}

/// Report entry for one test, accumulated during triage and persisted once
#[derive(Debug)]
pub struct TestReport {
    /// Test identifier
    pub test_name: String,
    /// Final status
    pub status: TestStatus,
    /// Failure detail if any
    pub detail: Option<String>,
    attachments: Vec<Attachment>,
    links: Vec<Link>,
}

impl TestReport {
    /// Create a report entry from a completed outcome
    #[must_use]
    pub fn for_outcome(outcome: &TestOutcome) -> Self {
        Self {
            test_name: outcome.name.clone(),
            status: outcome.status,
            detail: outcome.detail.clone(),
            attachments: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Add an attachment
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Add an external link
    pub fn link(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.links.push(Link {
            name: name.into(),
            url: url.into(),
        });
    }

    /// Attachments accumulated so far
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Links accumulated so far
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

/// Persisted shape of an attachment: metadata plus the blob's file name
#[derive(Debug, Serialize, Deserialize)]
struct AttachmentEntry {
    name: String,
    kind: AttachmentKind,
    file: String,
}

/// Persisted shape of one test's report entry
#[derive(Debug, Serialize, Deserialize)]
struct ReportEntry {
    name: String,
    status: TestStatus,
    detail: Option<String>,
    timestamp: chrono::DateTime<chrono::Utc>,
    attachments: Vec<AttachmentEntry>,
    links: Vec<Link>,
}

/// Filesystem store for report entries
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    /// Create a store rooted at the given directory
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reset the output directory at session start: stale entries from
    /// previous runs are removed.
    pub fn reset_session_dir(&self) -> EnsayoResult<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Persist one test's report entry and its attachment blobs.
    /// Returns the path of the JSON entry.
    pub fn write(&self, report: &TestReport) -> EnsayoResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let stem = sanitize(&report.test_name);
        let mut entries = Vec::with_capacity(report.attachments().len());
        for attachment in report.attachments() {
            let file = format!(
                "{stem}-{}.{}",
                sanitize(&attachment.name),
                attachment.kind.extension()
            );
            fs::write(self.dir.join(&file), &attachment.body)?;
            entries.push(AttachmentEntry {
                name: attachment.name.clone(),
                kind: attachment.kind,
                file,
            });
        }

        let entry = ReportEntry {
            name: report.test_name.clone(),
            status: report.status,
            detail: report.detail.clone(),
            timestamp: chrono::Utc::now(),
            attachments: entries,
            links: report.links().to_vec(),
        };

        let path = self.dir.join(format!("{stem}.json"));
        fs::write(&path, serde_json::to_vec_pretty(&entry)?)?;
        info!(entry = %path.display(), "wrote report entry");
        Ok(path)
    }
}

/// Make a test or attachment name safe as a file stem
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
