use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

/// User-configurable statusline settings, read from TOML.
/// A missing file is not an error -- every field is optional.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct StatuslineConfig {
    /// JSON cache file. Relative paths resolve against the project directory.
    pub cache_file: Option<PathBuf>,

    /// Session description written by the host (start time, integrations).
    pub session_file: Option<PathBuf>,

    /// Output of the external prompt-quality analysis tool.
    pub analysis_file: Option<PathBuf>,

    /// MCP server declarations.
    pub mcp_file: Option<PathBuf>,

    /// Per-command timeout for git queries.
    pub git_timeout_ms: Option<u64>,

    /// Analysis results older than this are hidden.
    pub analysis_stale_secs: Option<u64>,

    /// Maximum visible length of the analysis suggestion.
    pub analysis_max_len: Option<usize>,

    /// TTL for cache keys without an entry in `ttl`.
    pub default_ttl_ms: Option<u64>,

    /// Per-key TTL overrides in milliseconds, e.g. `git-status = 2000`.
    pub ttl: HashMap<String, u64>,
}
