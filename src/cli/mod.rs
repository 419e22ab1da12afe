pub mod cache;
pub mod output;
pub mod statusline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Context-aware statusline for AI coding sessions
#[derive(Parser, Debug)]
#[command(name = "statusline", version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: $STATUSLINE_CONFIG, then
    /// <config dir>/statusline/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level for stderr diagnostics: off, error, warn, info, debug, trace
    /// (default: $STATUSLINE_LOG or off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(flatten)]
    pub render: statusline::Args,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or reset the fact cache
    Cache(cache::Args),
}

/// Initialize tracing to stderr. Installation errors are ignored so a second
/// subscriber (tests) never panics.
pub fn init_tracing(flag: Option<&str>, env: &Environment) {
    let requested = flag.or(env.log_filter.as_deref()).unwrap_or("off");
    let filter = match requested {
        "off" | "error" | "warn" | "info" | "debug" | "trace" => EnvFilter::new(requested),
        other => EnvFilter::try_new(other).unwrap_or_else(|_| {
            eprintln!("warning: unknown log level '{}', logging disabled", other);
            EnvFilter::new("off")
        }),
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
