use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::process::output_with_timeout;
use super::Collector;
use crate::cache::ttl::GIT_STATUS;
use crate::error::{Result, StatuslineError};

/// Branch name shown when git cannot tell us anything.
pub const UNKNOWN_BRANCH: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitStatus {
    pub branch: String,
    pub dirty: bool,
}

impl GitStatus {
    pub fn unknown() -> Self {
        Self {
            branch: UNKNOWN_BRANCH.to_string(),
            dirty: false,
        }
    }
}

/// Current branch and working-tree dirtiness, via two git queries.
pub struct GitCollector {
    dir: PathBuf,
    timeout: Duration,
}

impl GitCollector {
    pub fn new(dir: &Path, timeout: Duration) -> Self {
        Self {
            dir: dir.to_path_buf(),
            timeout,
        }
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.dir)
            // Read-only queries must not take the index lock from a concurrent git.
            .env("GIT_OPTIONAL_LOCKS", "0");
        output_with_timeout(cmd, self.timeout)
    }
}

impl Collector for GitCollector {
    type Output = GitStatus;

    fn name(&self) -> &'static str {
        "git"
    }

    fn cache_key(&self) -> Option<&'static str> {
        Some(GIT_STATUS)
    }

    fn collect(&self) -> Result<GitStatus> {
        which::which("git").map_err(|_| StatuslineError::MissingTool("git".into()))?;

        let branch = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = branch.trim();
        let porcelain = self.git(&["status", "--porcelain"])?;

        Ok(GitStatus {
            branch: if branch.is_empty() {
                UNKNOWN_BRANCH.to_string()
            } else {
                branch.to_string()
            },
            dirty: is_dirty(&porcelain),
        })
    }

    fn sentinel(&self) -> GitStatus {
        GitStatus::unknown()
    }
}

/// Any non-blank line of `git status --porcelain` means a modified,
/// staged or untracked path.
fn is_dirty(porcelain: &str) -> bool {
    porcelain.lines().any(|line| !line.trim().is_empty())
}
