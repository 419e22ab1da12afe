use std::collections::HashMap;
use std::time::Duration;

/// Cache key for the git branch/dirty fact.
pub const GIT_STATUS: &str = "git-status";

/// Cache key for the MCP server list read from `.mcp.json`.
pub const MCP_SERVERS: &str = "mcp-servers";

/// TTL used for keys with no explicit entry.
pub const DEFAULT_TTL: Duration = Duration::from_millis(5_000);

/// Static per-key time-to-live table.
#[derive(Debug, Clone)]
pub struct TtlTable {
    default: Duration,
    per_key: HashMap<String, Duration>,
}

impl Default for TtlTable {
    fn default() -> Self {
        let per_key = HashMap::from([
            (GIT_STATUS.to_string(), Duration::from_millis(5_000)),
            (MCP_SERVERS.to_string(), Duration::from_millis(30_000)),
        ]);
        Self {
            default: DEFAULT_TTL,
            per_key,
        }
    }
}

impl TtlTable {
    /// Replace the TTL used for unmapped keys.
    pub fn with_default(mut self, default: Duration) -> Self {
        self.default = default;
        self
    }

    /// Add or replace the TTL of a single key.
    pub fn with_key(mut self, key: impl Into<String>, ttl: Duration) -> Self {
        self.per_key.insert(key.into(), ttl);
        self
    }

    pub fn ttl_for(&self, key: &str) -> Duration {
        self.per_key.get(key).copied().unwrap_or(self.default)
    }
}
