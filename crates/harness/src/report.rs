//! Reporting sink: attachments, per-step and per-scenario results
//!
//! Attachments are pure side effects; they never influence pass/fail.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::HarnessResult;

/// Content kind tag for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Json,
    Text,
}

/// A human-readable artifact recorded while executing a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub kind: AttachmentKind,
    pub content: String,
}

impl Attachment {
    pub fn json(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttachmentKind::Json,
            content: content.into(),
        }
    }

    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttachmentKind::Text,
            content: content.into(),
        }
    }
}

/// Result of executing a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub attachments: Vec<Attachment>,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running the whole suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

/// Write suite results as pretty JSON under the output directory
pub fn write_results(output_dir: &Path, results: &SuiteResult) -> HarnessResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("scenario-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}
