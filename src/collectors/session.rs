use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Collector;
use crate::error::{Result, StatuslineError};

/// Counts of installed extensions, as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionCounts {
    pub skills: u32,
    pub agents: u32,
    pub hooks: u32,
    pub commands: u32,
}

impl ExtensionCounts {
    pub fn total(&self) -> u64 {
        [self.skills, self.agents, self.hooks, self.commands]
            .iter()
            .map(|&n| u64::from(n))
            .sum()
    }
}

/// The session description file written alongside the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFacts {
    pub session_id: Option<String>,
    /// Epoch milliseconds.
    pub started_at: Option<u64>,
    pub integrations: Vec<String>,
    pub extensions: ExtensionCounts,
}

pub struct SessionCollector {
    path: PathBuf,
}

impl SessionCollector {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Collector for SessionCollector {
    type Output = SessionFacts;

    fn name(&self) -> &'static str {
        "session"
    }

    fn collect(&self) -> Result<SessionFacts> {
        if !self.path.exists() {
            return Err(StatuslineError::NotConfigured(self.path.display().to_string()));
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn sentinel(&self) -> SessionFacts {
        SessionFacts::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{TtlCache, TtlTable};
    use crate::collectors::collect;
    use tempfile::TempDir;

    #[test]
    fn test_total_does_not_overflow() {
        let counts = ExtensionCounts {
            skills: u32::MAX,
            agents: u32::MAX,
            hooks: 1,
            commands: 0,
        };
        assert_eq!(counts.total(), 2 * u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_parse_session_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{
                "session_id": "s-1",
                "started_at": 1700000000000,
                "integrations": ["github", "slack"],
                "extensions": {"skills": 4, "agents": 2}
            }"#,
        )
        .unwrap();
        let facts = SessionCollector::new(&path).collect().unwrap();
        assert_eq!(facts.started_at, Some(1_700_000_000_000));
        assert_eq!(facts.integrations.len(), 2);
        assert_eq!(facts.extensions.skills, 4);
        assert_eq!(facts.extensions.hooks, 0);
        assert_eq!(facts.extensions.total(), 6);
    }

    #[test]
    fn test_absent_and_malformed_fall_back() {
        let dir = TempDir::new().unwrap();
        let cache = TtlCache::new(dir.path().join("cache.json"), TtlTable::default());

        let absent = SessionCollector::new(&dir.path().join("missing.json"));
        let result = collect(&absent, &cache);
        assert!(result.is_default());
        assert_eq!(result.value(), &SessionFacts::default());

        let path = dir.path().join("session.json");
        std::fs::write(&path, "{\"started_at\": \"yesterday\"").unwrap();
        let result = collect(&SessionCollector::new(&path), &cache);
        assert!(result.is_default());
        assert_eq!(result.value(), &SessionFacts::default());
    }
}
