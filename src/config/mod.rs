pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use schema::StatuslineConfig;

use crate::cache::TtlTable;
use crate::input::SessionInfo;

/// Default per-command timeout for git queries.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_millis(300);

/// Analysis results older than this are treated as absent.
pub const DEFAULT_ANALYSIS_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Default maximum visible length of the analysis suggestion.
pub const DEFAULT_ANALYSIS_MAX_LEN: usize = 40;

/// Every environment variable the statusline consults, read once at startup.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    pub home_dir: Option<PathBuf>,
    pub current_dir: Option<PathBuf>,
    /// `CLAUDE_PROJECT_DIR`
    pub project_dir: Option<PathBuf>,
    /// `VIRTUAL_ENV`
    pub virtual_env: Option<String>,
    /// `STATUSLINE_WIDTH`
    pub width: Option<u16>,
    /// `COLUMNS`
    pub columns: Option<u16>,
    /// `STATUSLINE_CONFIG`
    pub config_file: Option<PathBuf>,
    /// `STATUSLINE_LOG`
    pub log_filter: Option<String>,
    /// `NO_COLOR` set to anything
    pub no_color: bool,
}

impl Environment {
    pub fn capture() -> Self {
        Self {
            home_dir: dirs::home_dir(),
            current_dir: std::env::current_dir().ok(),
            project_dir: non_empty_var("CLAUDE_PROJECT_DIR").map(PathBuf::from),
            virtual_env: non_empty_var("VIRTUAL_ENV"),
            width: non_empty_var("STATUSLINE_WIDTH").and_then(|w| parse_width(&w)),
            columns: non_empty_var("COLUMNS").and_then(|w| parse_width(&w)),
            config_file: non_empty_var("STATUSLINE_CONFIG").map(PathBuf::from),
            log_filter: non_empty_var("STATUSLINE_LOG"),
            no_color: std::env::var_os("NO_COLOR").is_some(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_width(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|w| *w > 0)
}

/// Resolved configuration, passed explicitly to every collector.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub home_dir: Option<PathBuf>,
    pub cache_file: PathBuf,
    pub session_file: PathBuf,
    pub analysis_file: PathBuf,
    pub mcp_file: PathBuf,
    pub ttl: TtlTable,
    pub git_timeout: Duration,
    pub analysis_stale_after: Duration,
    pub analysis_max_len: usize,
    pub virtual_env: Option<String>,
}

impl Config {
    /// Combine the config file, the captured environment and the host payload.
    pub fn resolve(file: StatuslineConfig, env: &Environment, session: &SessionInfo) -> Self {
        let project_dir = env
            .project_dir
            .clone()
            .or_else(|| session.project_dir().map(PathBuf::from))
            .or_else(|| session.current_dir().map(PathBuf::from))
            .or_else(|| env.current_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let claude_dir = project_dir.join(".claude");
        let locate = |configured: Option<PathBuf>, default: PathBuf| match configured {
            Some(path) if path.is_relative() => project_dir.join(path),
            Some(path) => path,
            None => default,
        };

        let cache_file = locate(file.cache_file, claude_dir.join("statusline-cache.json"));
        let session_file = locate(
            file.session_file,
            claude_dir.join("statusline").join("session.json"),
        );
        let analysis_file = locate(file.analysis_file, claude_dir.join("prompt-analysis.json"));
        let mcp_file = locate(file.mcp_file, project_dir.join(".mcp.json"));

        let mut ttl = TtlTable::default();
        if let Some(ms) = file.default_ttl_ms {
            ttl = ttl.with_default(Duration::from_millis(ms));
        }
        for (key, ms) in file.ttl {
            ttl = ttl.with_key(key, Duration::from_millis(ms));
        }

        Self {
            home_dir: env.home_dir.clone(),
            cache_file,
            session_file,
            analysis_file,
            mcp_file,
            ttl,
            git_timeout: file
                .git_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_GIT_TIMEOUT),
            analysis_stale_after: file
                .analysis_stale_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_ANALYSIS_STALE_AFTER),
            analysis_max_len: file.analysis_max_len.unwrap_or(DEFAULT_ANALYSIS_MAX_LEN),
            virtual_env: env.virtual_env.clone(),
            project_dir,
        }
    }
}

/// Where the TOML config is looked up: explicit path, `STATUSLINE_CONFIG`,
/// then `~/.config/statusline/config.toml` (platform-appropriate).
pub fn config_path(explicit: Option<&Path>, env: &Environment) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env.config_file.clone())
        .or_else(|| dirs::config_dir().map(|d| d.join("statusline").join("config.toml")))
}

/// Load the TOML config. Missing file yields defaults silently; an unreadable
/// or malformed file yields defaults with a warning in the log.
pub fn load_file(path: Option<&Path>) -> StatuslineConfig {
    let Some(path) = path else {
        return StatuslineConfig::default();
    };
    if !path.exists() {
        return StatuslineConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "invalid statusline config; using defaults");
            StatuslineConfig::default()
        }),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable statusline config; using defaults");
            StatuslineConfig::default()
        }
    }
}
