pub mod segments;

use std::path::Path;

use colored::Colorize;

use crate::ansi;
use crate::collectors::Facts;
use crate::input::SessionInfo;
use crate::layout::{Layout, LayoutMode};

/// Printed instead of the statusline when rendering fails in any way.
pub const FALLBACK_LINE: &str = "statusline: unavailable";

/// Background painted behind wide layouts (xterm-256 grey).
const BACKGROUND: &str = "\x1b[48;5;236m";

/// Output switches from the command line.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub unicode: bool,
    pub color: bool,
}

/// Symbols used in segments, in Unicode and ASCII variants.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub separator: &'static str,
    pub ellipsis: &'static str,
    pub branch: &'static str,
    pub dirty: &'static str,
    pub clock: &'static str,
    pub analysis: &'static str,
    pub mcp: &'static str,
    pub python: &'static str,
}

impl Glyphs {
    pub const UNICODE: Glyphs = Glyphs {
        separator: "\u{2502}",
        ellipsis: "\u{2026}",
        branch: "\u{2387}",
        dirty: "\u{25CF}",
        clock: "\u{25F7}",
        analysis: "\u{2726}",
        mcp: "\u{2261}",
        python: "py:",
    };

    pub const ASCII: Glyphs = Glyphs {
        separator: "|",
        ellipsis: "...",
        branch: "br",
        dirty: "*",
        clock: "t:",
        analysis: "q:",
        mcp: "mcp:",
        python: "py:",
    };

    pub fn for_style(style: &Style) -> Self {
        if style.unicode {
            Self::UNICODE
        } else {
            Self::ASCII
        }
    }
}

/// Everything the renderer reads, borrowed for one pass.
pub struct View<'a> {
    pub facts: &'a Facts,
    pub input: &'a SessionInfo,
    pub project_dir: &'a Path,
    pub home_dir: Option<&'a Path>,
}

/// Compose the statusline. Always returns at least one line, each no wider
/// than `layout.width` visible columns.
pub fn render(view: &View<'_>, layout: &Layout, style: &Style) -> Vec<String> {
    let glyphs = Glyphs::for_style(style);
    let sep = format!(" {} ", glyphs.separator.dimmed());

    let lines = match layout.mode {
        LayoutMode::Minimal => vec![minimal_line(view, layout, &glyphs, &sep)],
        LayoutMode::Compact => vec![compact_line(view, layout, &glyphs, &sep)],
        LayoutMode::Comfortable | LayoutMode::Wide => multi_line(view, layout, &glyphs, &sep),
    };

    lines
        .into_iter()
        .map(|line| finish_line(&line, layout, style, &glyphs))
        .collect()
}

/// Overflow guard, then background fill where the layout asks for it.
fn finish_line(line: &str, layout: &Layout, style: &Style, glyphs: &Glyphs) -> String {
    let line = if ansi::visible_len(line) > layout.width {
        ansi::truncate(line, layout.width, glyphs.ellipsis)
    } else {
        line.to_string()
    };
    if layout.background && style.color {
        ansi::with_background(&line, layout.width, BACKGROUND)
    } else {
        line
    }
}

fn join(parts: Vec<String>, sep: &str) -> String {
    parts.join(sep)
}

/// `primary` padded to the primary column, a separator, then `secondary`
/// cut to whatever is left.
fn two_columns(primary: &str, secondary: &str, layout: &Layout, glyphs: &Glyphs, sep: &str) -> String {
    let left = ansi::fit(primary, layout.primary_width(), glyphs.ellipsis);
    let right = ansi::truncate(
        secondary,
        layout.secondary_width(ansi::visible_len(sep)),
        glyphs.ellipsis,
    );
    format!("{}{}{}", left, sep, right)
}

fn minimal_line(view: &View<'_>, layout: &Layout, glyphs: &Glyphs, sep: &str) -> String {
    let facts = view.facts;
    let mut parts = vec![segments::git(&facts.git, layout.max_branch, glyphs)];
    if let Some(model) = segments::model(view.input, layout.max_model, glyphs) {
        parts.push(model);
    }
    parts.push(segments::analysis(facts.analysis.value(), false, glyphs));
    join(parts, sep)
}

fn compact_line(view: &View<'_>, layout: &Layout, glyphs: &Glyphs, sep: &str) -> String {
    let facts = view.facts;
    let left = join(primary_parts(view, layout, glyphs, false), sep);

    let mut right = Vec::new();
    right.extend(segments::cost(view.input));
    right.extend(segments::context(view.input));
    right.push(segments::elapsed(&facts.elapsed, glyphs));

    two_columns(&left, &join(right, sep), layout, glyphs, sep)
}

fn multi_line(view: &View<'_>, layout: &Layout, glyphs: &Glyphs, sep: &str) -> Vec<String> {
    let facts = view.facts;
    let wide = layout.mode == LayoutMode::Wide;

    let mut top_left = primary_parts(view, layout, glyphs, true);
    if wide {
        top_left.extend(segments::python_env(&facts.python_env, glyphs));
    }
    let mut top_right = Vec::new();
    top_right.extend(segments::cost(view.input));
    top_right.extend(segments::context(view.input));
    if wide {
        top_right.push(segments::elapsed(&facts.elapsed, glyphs));
    }

    let bottom_left = segments::analysis(facts.analysis.value(), true, glyphs);
    let mut bottom_right = Vec::new();
    if !wide {
        bottom_right.push(segments::elapsed(&facts.elapsed, glyphs));
    }
    bottom_right.push(segments::mcp(&facts.mcp, glyphs));
    if wide {
        bottom_right.extend(segments::extensions(&facts.session));
    }

    let mut lines = vec![
        two_columns(&join(top_left, sep), &join(top_right, sep), layout, glyphs, sep),
        two_columns(&bottom_left, &join(bottom_right, sep), layout, glyphs, sep),
    ];
    lines.truncate(layout.lines);
    lines
}

/// Directory, branch and model: the left column of every split layout.
fn primary_parts(view: &View<'_>, layout: &Layout, glyphs: &Glyphs, full_dir: bool) -> Vec<String> {
    let mut parts = Vec::new();
    parts.extend(segments::dir(
        view.input,
        view.project_dir,
        view.home_dir,
        full_dir,
        layout.max_dir,
        glyphs,
    ));
    parts.push(segments::git(&view.facts.git, layout.max_branch, glyphs));
    parts.extend(segments::model(view.input, layout.max_model, glyphs));
    parts
}
