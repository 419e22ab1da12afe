use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::Collector;
use crate::ansi;
use crate::error::{Result, StatuslineError};

/// State of the external prompt-quality analysis for this session.
///
/// Each variant carries only the fields that are meaningful in that state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Analysis {
    /// No analysis tool output for us to read.
    NotConfigured,
    /// The tool knows about the session but has not produced a score yet.
    Loading,
    /// A result exists but is too old to show; rendered like `NotConfigured`.
    Stale,
    Ready { score: f64, suggestion: String },
    Failed { message: String },
}

/// One record of the analysis file, keyed by session id.
#[derive(Debug, Deserialize)]
struct AnalysisRecord {
    score: Option<f64>,
    suggestion: Option<String>,
    status: Option<String>,
    error: Option<String>,
    /// Epoch milliseconds.
    timestamp: Option<u64>,
}

pub struct AnalysisCollector {
    path: PathBuf,
    session_id: Option<String>,
    now_ms: u64,
    stale_after: Duration,
    max_len: usize,
}

impl AnalysisCollector {
    pub fn new(
        path: &Path,
        session_id: Option<&str>,
        now_ms: u64,
        stale_after: Duration,
        max_len: usize,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            session_id: session_id.map(str::to_string),
            now_ms,
            stale_after,
            max_len,
        }
    }

    fn classify(&self, record: AnalysisRecord) -> Analysis {
        let fresh = record.timestamp.is_some_and(|ts| {
            u128::from(self.now_ms.saturating_sub(ts)) <= self.stale_after.as_millis()
        });
        if !fresh {
            return Analysis::Stale;
        }

        match record.status.as_deref() {
            Some("pending") | Some("loading") | Some("running") => return Analysis::Loading,
            Some("error") | Some("failed") => {
                return Analysis::Failed {
                    message: record.error.unwrap_or_else(|| "analysis failed".to_string()),
                }
            }
            _ => {}
        }

        match record.score {
            Some(score) => Analysis::Ready {
                score,
                suggestion: ansi::truncate(
                    record.suggestion.as_deref().unwrap_or("").trim(),
                    self.max_len,
                    "...",
                ),
            },
            None => Analysis::Loading,
        }
    }
}

impl Collector for AnalysisCollector {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "analysis"
    }

    fn collect(&self) -> Result<Analysis> {
        let session_id = self
            .session_id
            .as_deref()
            .ok_or_else(|| StatuslineError::NotConfigured("session id".into()))?;
        if !self.path.exists() {
            return Err(StatuslineError::NotConfigured(self.path.display().to_string()));
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let mut records: HashMap<String, AnalysisRecord> = serde_json::from_str(&contents)?;

        Ok(match records.remove(session_id) {
            Some(record) => self.classify(record),
            None => Analysis::Loading,
        })
    }

    fn sentinel(&self) -> Analysis {
        Analysis::NotConfigured
    }
}
