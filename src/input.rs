use std::io::{IsTerminal, Read};

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;

/// Upper bound on the stdin payload; anything longer is cut off.
const MAX_STDIN_BYTES: u64 = 65536;

/// Session metadata piped by the host on each statusline tick.
///
/// All fields are optional, and each one is parsed on its own: a field with
/// an unexpected type is dropped instead of discarding the whole payload.
#[derive(Debug, Deserialize, Default)]
pub struct SessionInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<ModelField>,
    #[serde(default, deserialize_with = "lenient")]
    pub cwd: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub workspace: Option<Workspace>,
    #[serde(default, deserialize_with = "lenient")]
    pub cost: Option<CostInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub cost_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub context_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub context_window: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub git_branch: Option<String>,
}

/// The host sends either a bare model name or an `{id, display_name}` object.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ModelField {
    Name(String),
    Detailed {
        id: Option<String>,
        display_name: Option<String>,
    },
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Workspace {
    pub current_dir: Option<String>,
    pub project_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CostInfo {
    pub total_cost_usd: Option<f64>,
    pub total_duration_ms: Option<u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl SessionInfo {
    /// Parse a raw payload. Empty or malformed input yields the default.
    pub fn from_bytes(buf: &[u8]) -> Self {
        if buf.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        serde_json::from_slice(buf).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "stdin payload is not valid JSON");
            Self::default()
        })
    }

    /// Read the payload from stdin. A terminal on stdin means no host is
    /// piping anything, so nothing is read.
    pub fn from_stdin() -> Self {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Self::default();
        }
        let mut buf = Vec::with_capacity(4096);
        let _ = stdin.lock().take(MAX_STDIN_BYTES).read_to_end(&mut buf);
        Self::from_bytes(&buf)
    }

    pub fn model_name(&self) -> Option<&str> {
        let name = match self.model.as_ref()? {
            ModelField::Name(name) => Some(name.as_str()),
            ModelField::Detailed { id, display_name } => {
                display_name.as_deref().or(id.as_deref())
            }
        };
        name.filter(|name| !name.trim().is_empty())
    }

    pub fn cost_usd(&self) -> Option<f64> {
        self.cost
            .as_ref()
            .and_then(|c| c.total_cost_usd)
            .or(self.cost_usd)
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.cost.as_ref().and_then(|c| c.total_duration_ms)
    }

    pub fn current_dir(&self) -> Option<&str> {
        self.workspace
            .as_ref()
            .and_then(|w| w.current_dir.as_deref())
            .or(self.cwd.as_deref())
    }

    pub fn project_dir(&self) -> Option<&str> {
        self.workspace.as_ref().and_then(|w| w.project_dir.as_deref())
    }
}
