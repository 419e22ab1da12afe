use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use clap::Args as ClapArgs;

use crate::cache::{now_millis, TtlCache};
use crate::collectors;
use crate::config::{self, Config, Environment};
use crate::input::SessionInfo;
use crate::layout::{self, Layout};
use crate::render::{self, Style, View, FALLBACK_LINE};

// ---------------------------------------------------------------------------
// Clap Args
// ---------------------------------------------------------------------------

/// Arguments for rendering the statusline (the default command).
#[derive(ClapArgs, Debug, Default)]
pub struct Args {
    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long)]
    pub no_color: bool,

    /// Use ASCII-only characters (no Unicode symbols)
    #[arg(long)]
    pub no_unicode: bool,

    /// Override terminal width (default: $STATUSLINE_WIDTH, $COLUMNS, the
    /// terminal, then 120)
    #[arg(long)]
    pub width: Option<u16>,

    /// Print render time to stderr after the statusline
    #[arg(long)]
    pub bench: bool,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Entry point. Rendering runs under `catch_unwind` so that errors and
/// panics end in the fallback line and the process always exits 0.
pub fn run(args: Args, config_path: Option<&Path>, env: &Environment) -> Result<()> {
    let started = Instant::now();
    print_guarded(&mut std::io::stdout().lock(), || {
        render_lines(&args, config_path, env)
    });

    if args.bench {
        eprintln!("{}", bench_line(started.elapsed().as_secs_f64() * 1000.0));
    }
    Ok(())
}

/// Write the lines produced by `produce` to `out`, or [`FALLBACK_LINE`] if it
/// fails or panics. Write errors (a closed pipe) are logged, never raised.
fn print_guarded<W, F>(out: &mut W, produce: F)
where
    W: Write,
    F: FnOnce() -> Result<Vec<String>>,
{
    let lines = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(produce)) {
        Ok(Ok(lines)) => lines,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "render failed; printing fallback line");
            vec![FALLBACK_LINE.to_string()]
        }
        Err(_) => {
            tracing::warn!("render panicked; printing fallback line");
            vec![FALLBACK_LINE.to_string()]
        }
    };

    if let Err(e) = write_lines(out, &lines) {
        tracing::debug!(error = %e, "stdout write failed; trying fallback line");
        let _ = write_lines(out, &[FALLBACK_LINE.to_string()]);
    }
}

fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

fn bench_line(elapsed_ms: f64) -> String {
    format!("statusline rendered in {:.2}ms", elapsed_ms)
}

fn render_lines(args: &Args, config_path: Option<&Path>, env: &Environment) -> Result<Vec<String>> {
    // Hosts pipe stdout, so colored would normally turn itself off.
    let color = !(args.no_color || env.no_color);
    colored::control::set_override(color);

    let file = config::load_file(config::config_path(config_path, env).as_deref());
    let input = SessionInfo::from_stdin();
    let config = Config::resolve(file, env, &input);

    let width = layout::resolve_width(args.width, env, layout::terminal_width());
    let layout = Layout::for_width(width);
    tracing::debug!(width, mode = %layout.mode, project = %config.project_dir.display(), "rendering");

    let cache = TtlCache::new(config.cache_file.clone(), config.ttl.clone());
    let facts = collectors::gather(&config, &cache, &input, now_millis());

    let view = View {
        facts: &facts,
        input: &input,
        project_dir: &config.project_dir,
        home_dir: config.home_dir.as_deref(),
    };
    let style = Style {
        unicode: !args.no_unicode,
        color,
    };
    Ok(render::render(&view, &layout, &style))
}
