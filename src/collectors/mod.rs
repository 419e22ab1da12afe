//! Fact collectors.
//!
//! Each collector produces exactly one fact. Collectors report failures as
//! errors, and [`collect`] turns every error into that collector's sentinel,
//! so nothing past this module ever sees a failure.

pub mod analysis;
pub mod elapsed;
pub mod env;
pub mod git;
pub mod mcp;
pub mod process;
pub mod session;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::Result;
use crate::input::SessionInfo;

pub use analysis::{Analysis, AnalysisCollector};
pub use elapsed::{ElapsedCollector, SessionStart};
pub use env::PythonEnvCollector;
pub use git::{GitCollector, GitStatus};
pub use mcp::{McpCollector, McpServers};
pub use session::{SessionCollector, SessionFacts};

/// Outcome of one collector: the real value, or its sentinel plus the reason.
#[derive(Debug, Clone, PartialEq)]
pub enum Collected<T> {
    Value(T),
    Default { value: T, reason: String },
}

impl<T> Collected<T> {
    pub fn value(&self) -> &T {
        match self {
            Collected::Value(value) | Collected::Default { value, .. } => value,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Collected::Default { .. })
    }
}

/// A source of one fact with a documented fallback.
pub trait Collector {
    type Output: Serialize + DeserializeOwned;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Cache key for facts worth memoizing; `None` reads fresh every time.
    fn cache_key(&self) -> Option<&'static str> {
        None
    }

    fn collect(&self) -> Result<Self::Output>;

    /// Value reported when `collect` fails.
    fn sentinel(&self) -> Self::Output;
}

/// Run a collector, through the cache when it has a key.
pub fn collect<C: Collector>(collector: &C, cache: &TtlCache) -> Collected<C::Output> {
    let result = match collector.cache_key() {
        Some(key) => cache.get_cached(key, || collector.collect()),
        None => collector.collect(),
    };

    match result {
        Ok(value) => Collected::Value(value),
        Err(e) => {
            tracing::debug!(collector = collector.name(), reason = %e, "using sentinel");
            Collected::Default {
                value: collector.sentinel(),
                reason: e.to_string(),
            }
        }
    }
}

/// Every fact the renderer can show.
#[derive(Debug, Clone)]
pub struct Facts {
    pub git: Collected<GitStatus>,
    pub mcp: Collected<McpServers>,
    pub session: Collected<SessionFacts>,
    pub elapsed: Collected<String>,
    pub analysis: Collected<Analysis>,
    pub python_env: Collected<String>,
}

/// Gather all facts. Collectors are independent, so order does not matter
/// except that the elapsed time may use the session file's start time.
pub fn gather(config: &Config, cache: &TtlCache, input: &SessionInfo, now_ms: u64) -> Facts {
    let mut git = collect(
        &GitCollector::new(&config.project_dir, config.git_timeout),
        cache,
    );
    if git.is_default() {
        if let Some(branch) = input.git_branch.as_deref().filter(|b| !b.is_empty()) {
            git = Collected::Value(GitStatus {
                branch: branch.to_string(),
                dirty: false,
            });
        }
    }

    let mcp = collect(&McpCollector::new(&config.mcp_file), cache);
    let session = collect(&SessionCollector::new(&config.session_file), cache);

    let start = match (input.duration_ms(), session.value().started_at) {
        (Some(ms), _) => SessionStart::Duration { ms },
        (None, Some(started_ms)) => SessionStart::StartedAt { started_ms, now_ms },
        (None, None) => SessionStart::Unknown,
    };
    let elapsed = collect(&ElapsedCollector::new(start), cache);

    let session_id = input
        .session_id
        .as_deref()
        .or(session.value().session_id.as_deref());
    let analysis = collect(
        &AnalysisCollector::new(
            &config.analysis_file,
            session_id,
            now_ms,
            config.analysis_stale_after,
            config.analysis_max_len,
        ),
        cache,
    );

    let python_env = collect(
        &PythonEnvCollector::new(config.virtual_env.as_deref()),
        cache,
    );

    Facts {
        git,
        mcp,
        session,
        elapsed,
        analysis,
        python_env,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, StatuslineConfig};
    use crate::error::StatuslineError;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct Counting<'a> {
        calls: &'a Cell<u32>,
        fail: bool,
    }

    impl Collector for Counting<'_> {
        type Output = u32;

        fn name(&self) -> &'static str {
            "counting"
        }

        fn cache_key(&self) -> Option<&'static str> {
            Some("counting")
        }

        fn collect(&self) -> Result<u32> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(StatuslineError::NotConfigured("counting".into()))
            } else {
                Ok(self.calls.get())
            }
        }

        fn sentinel(&self) -> u32 {
            0
        }
    }

    fn config_for(dir: &TempDir) -> Config {
        let env = Environment {
            project_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        Config::resolve(StatuslineConfig::default(), &env, &SessionInfo::default())
    }

    #[test]
    fn test_cached_collector_runs_once() {
        let dir = TempDir::new().unwrap();
        let cache = TtlCache::new(dir.path().join("c.json"), Default::default());
        let calls = Cell::new(0);
        let collector = Counting {
            calls: &calls,
            fail: false,
        };
        assert_eq!(collect(&collector, &cache), Collected::Value(1));
        assert_eq!(collect(&collector, &cache), Collected::Value(1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failure_maps_to_sentinel_with_reason() {
        let dir = TempDir::new().unwrap();
        let cache = TtlCache::new(dir.path().join("c.json"), Default::default());
        let calls = Cell::new(0);
        let collector = Counting {
            calls: &calls,
            fail: true,
        };
        match collect(&collector, &cache) {
            Collected::Default { value, reason } => {
                assert_eq!(value, 0);
                assert!(reason.contains("not configured"));
            }
            other => panic!("expected Default, got {:?}", other),
        }
    }

    #[test]
    fn test_gather_with_nothing_configured() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let cache = TtlCache::new(config.cache_file.clone(), config.ttl.clone());
        let facts = gather(&config, &cache, &SessionInfo::default(), 1_700_000_000_000);

        assert_eq!(facts.git.value(), &GitStatus::unknown());
        assert!(facts.mcp.is_default());
        assert!(facts.session.is_default());
        assert_eq!(facts.elapsed.value(), "0m");
        assert_eq!(facts.analysis.value(), &Analysis::NotConfigured);
        assert_eq!(facts.python_env.value(), "none");
    }

    #[test]
    fn test_gather_uses_payload_branch_when_git_fails() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let cache = TtlCache::new(config.cache_file.clone(), config.ttl.clone());
        let input = SessionInfo::from_bytes(br#"{"git_branch": "feature/x"}"#);
        let facts = gather(&config, &cache, &input, 0);
        assert_eq!(
            facts.git,
            Collected::Value(GitStatus {
                branch: "feature/x".into(),
                dirty: false
            })
        );
    }

    #[test]
    fn test_gather_elapsed_prefers_host_duration() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        std::fs::create_dir_all(config.session_file.parent().unwrap()).unwrap();
        std::fs::write(&config.session_file, r#"{"started_at": 0}"#).unwrap();
        let cache = TtlCache::new(config.cache_file.clone(), config.ttl.clone());

        let facts = gather(&config, &cache, &SessionInfo::default(), 45 * 60_000);
        assert_eq!(facts.elapsed.value(), "45m");

        let input = SessionInfo::from_bytes(br#"{"cost": {"total_duration_ms": 7200000}}"#);
        let facts = gather(&config, &cache, &input, 45 * 60_000);
        assert_eq!(facts.elapsed.value(), "2h0m");
    }
}
