//! Width-triggered layout presets.

use crate::config::Environment;

/// Width used when nothing reports one.
pub const DEFAULT_WIDTH: u16 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Minimal,
    Compact,
    Comfortable,
    Wide,
}

impl LayoutMode {
    /// `< 80` minimal, `80..=119` compact, `120..=159` comfortable, `>= 160` wide.
    pub fn for_width(width: u16) -> Self {
        match width {
            0..=79 => LayoutMode::Minimal,
            80..=119 => LayoutMode::Compact,
            120..=159 => LayoutMode::Comfortable,
            _ => LayoutMode::Wide,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutMode::Minimal => "minimal",
            LayoutMode::Compact => "compact",
            LayoutMode::Comfortable => "comfortable",
            LayoutMode::Wide => "wide",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A layout mode plus the budgets the renderer works within.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub mode: LayoutMode,
    pub width: usize,
    /// Share of the width given to the primary (left) column, in percent.
    /// 100 means a single column.
    pub primary_pct: u8,
    pub lines: usize,
    /// Paint a background behind every line, padding included.
    pub background: bool,
    pub max_branch: usize,
    pub max_model: usize,
    pub max_dir: usize,
}

impl Layout {
    pub fn for_width(width: u16) -> Self {
        let mode = LayoutMode::for_width(width);
        let width = width as usize;
        match mode {
            LayoutMode::Minimal => Self {
                mode,
                width,
                primary_pct: 100,
                lines: 1,
                background: false,
                max_branch: 16,
                max_model: 10,
                max_dir: 0,
            },
            LayoutMode::Compact => Self {
                mode,
                width,
                primary_pct: 70,
                lines: 1,
                background: false,
                max_branch: 20,
                max_model: 14,
                max_dir: 16,
            },
            LayoutMode::Comfortable => Self {
                mode,
                width,
                primary_pct: 70,
                lines: 2,
                background: false,
                max_branch: 28,
                max_model: 20,
                max_dir: 24,
            },
            LayoutMode::Wide => Self {
                mode,
                width,
                primary_pct: 70,
                lines: 2,
                background: true,
                max_branch: 40,
                max_model: 28,
                max_dir: 48,
            },
        }
    }

    /// Visible columns of the primary column.
    pub fn primary_width(&self) -> usize {
        self.width * self.primary_pct as usize / 100
    }

    /// Visible columns left for the secondary column once `separator_width`
    /// is taken out.
    pub fn secondary_width(&self, separator_width: usize) -> usize {
        self.width
            .saturating_sub(self.primary_width())
            .saturating_sub(separator_width)
    }
}

/// Width from the `--width` flag, `STATUSLINE_WIDTH`, `COLUMNS`, the
/// terminal attached to stdout, then [`DEFAULT_WIDTH`].
pub fn resolve_width(flag: Option<u16>, env: &Environment, terminal: Option<u16>) -> u16 {
    flag.filter(|w| *w > 0)
        .or(env.width)
        .or(env.columns)
        .or(terminal.filter(|w| *w > 0))
        .unwrap_or(DEFAULT_WIDTH)
}

/// Column count of the terminal on stdout, if there is one.
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(terminal_size::Width(w), _)| w)
}
