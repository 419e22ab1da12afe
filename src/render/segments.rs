// ---------------------------------------------------------------------------
// Segment renderers. Each returns one colored fragment, or None when the
// fact has nothing worth showing at this size.
// ---------------------------------------------------------------------------

use std::path::Path;

use colored::Colorize;

use super::Glyphs;
use crate::ansi;
use crate::collectors::git::UNKNOWN_BRANCH;
use crate::collectors::{Analysis, Collected, GitStatus, McpServers, SessionFacts};
use crate::input::SessionInfo;

/// Placeholder for facts whose source is absent.
pub const NOT_CONFIGURED: &str = "not configured";

/// Format a token count as a human-readable string (e.g. 45230 -> "45K").
pub fn format_tokens(tokens: u64) -> String {
    if tokens < 1000 {
        return tokens.to_string();
    }
    if tokens < 1_000_000 {
        return format!("{}K", tokens / 1000);
    }
    format!("{:.1}M", tokens as f64 / 1_000_000.0)
}

/// Show `path` relative to home as `~/...`; with `full == false`, only the
/// last component.
pub fn display_dir(path: &str, home: Option<&Path>, full: bool) -> String {
    let p = Path::new(path);
    if !full {
        return p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
    }
    match home.and_then(|h| p.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.to_string(),
    }
}

pub fn dir(
    input: &SessionInfo,
    fallback: &Path,
    home: Option<&Path>,
    full: bool,
    max: usize,
    glyphs: &Glyphs,
) -> Option<String> {
    if max == 0 {
        return None;
    }
    let raw = input
        .current_dir()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.display().to_string());
    let text = ansi::truncate(&display_dir(&raw, home, full), max, glyphs.ellipsis);
    Some(text.cyan().to_string())
}

pub fn git(git: &Collected<GitStatus>, max: usize, glyphs: &Glyphs) -> String {
    let status = git.value();
    let branch = ansi::truncate(&status.branch, max, glyphs.ellipsis);
    if git.is_default() || status.branch == UNKNOWN_BRANCH {
        return format!("{} {}", glyphs.branch, branch).dimmed().to_string();
    }
    let mut out = format!("{} {}", glyphs.branch, branch).magenta().to_string();
    if status.dirty {
        out.push_str(&glyphs.dirty.yellow().to_string());
    }
    out
}

pub fn model(input: &SessionInfo, max: usize, glyphs: &Glyphs) -> Option<String> {
    let name = input.model_name()?;
    Some(ansi::truncate(name, max, glyphs.ellipsis).bold().to_string())
}

/// Cost with two decimals for consistency (e.g. "$0.14").
pub fn cost(input: &SessionInfo) -> Option<String> {
    input
        .cost_usd()
        .map(|c| format!("${:.2}", c).green().to_string())
}

/// Context window usage (e.g. "45K/200K"), colored by fill ratio.
pub fn context(input: &SessionInfo) -> Option<String> {
    let tokens = input.context_tokens?;
    let window = input.context_window?;
    if window == 0 {
        return None;
    }

    let ratio = tokens as f64 / window as f64;
    let text = format!("{}/{}", format_tokens(tokens), format_tokens(window));

    Some(if ratio >= 0.8 {
        text.bright_red().to_string()
    } else if ratio >= 0.5 {
        text.yellow().to_string()
    } else {
        text.green().to_string()
    })
}

pub fn elapsed(elapsed: &Collected<String>, glyphs: &Glyphs) -> String {
    let text = format!("{} {}", glyphs.clock, elapsed.value());
    if elapsed.is_default() {
        text.dimmed().to_string()
    } else {
        text.normal().to_string()
    }
}

/// Analysis segment. `with_suggestion` is false where only the score fits.
pub fn analysis(analysis: &Analysis, with_suggestion: bool, glyphs: &Glyphs) -> String {
    match analysis {
        Analysis::NotConfigured | Analysis::Stale => {
            format!("{} {}", glyphs.analysis, NOT_CONFIGURED)
                .dimmed()
                .to_string()
        }
        Analysis::Loading => format!("{} loading{}", glyphs.analysis, glyphs.ellipsis)
            .yellow()
            .to_string(),
        Analysis::Failed { .. } => format!("{} error", glyphs.analysis).red().to_string(),
        Analysis::Ready { score, suggestion } => {
            let badge = format!("{} {:.0}", glyphs.analysis, score);
            let badge = if *score >= 80.0 {
                badge.green()
            } else if *score >= 50.0 {
                badge.yellow()
            } else {
                badge.bright_red()
            };
            if with_suggestion && !suggestion.is_empty() {
                format!("{} {}", badge, suggestion.italic())
            } else {
                badge.to_string()
            }
        }
    }
}

pub fn mcp(mcp: &Collected<McpServers>, glyphs: &Glyphs) -> String {
    if mcp.is_default() {
        return format!("{} {}", glyphs.mcp, NOT_CONFIGURED)
            .dimmed()
            .to_string();
    }
    format!("{} {}", glyphs.mcp, mcp.value().names.len())
        .blue()
        .to_string()
}

/// Extension counts and integrations from the session file; wide mode only.
pub fn extensions(session: &Collected<SessionFacts>) -> Option<String> {
    if session.is_default() {
        return None;
    }
    let facts = session.value();
    let counts = &facts.extensions;
    if counts.total() == 0 && facts.integrations.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = [
        (counts.skills, "skills"),
        (counts.agents, "agents"),
        (counts.hooks, "hooks"),
        (counts.commands, "cmds"),
    ]
    .iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{} {}", n, label))
    .collect();
    if !facts.integrations.is_empty() {
        parts.push(facts.integrations.join(","));
    }
    Some(parts.join(" ").dimmed().to_string())
}

pub fn python_env(env: &Collected<String>, glyphs: &Glyphs) -> Option<String> {
    if env.is_default() {
        return None;
    }
    Some(format!("{}{}", glyphs.python, env.value()).yellow().to_string())
}
