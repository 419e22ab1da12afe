use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Subcommand};

use crate::cache::{now_millis, TtlCache};
use crate::cli::output;
use crate::config::{self, Config, Environment};
use crate::input::SessionInfo;

/// Arguments for the `statusline cache` subcommand.
///
/// No stdin payload is read here, so the project directory comes from
/// `--project`, then `CLAUDE_PROJECT_DIR`, then the current directory.
#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Project whose cache to use (default: $CLAUDE_PROJECT_DIR, then the
    /// current directory; the host payload's project dir is not consulted)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Available cache subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List cached facts with their age
    Show {
        /// Print the raw cache mapping as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the cache file
    Clear,
    /// Print the cache file location
    Path,
}

/// Run the cache subcommand specified in `args`.
pub fn run(args: Args, config_path: Option<&Path>, env: &Environment) -> Result<()> {
    let env = project_env(args.project, env);
    let file = config::load_file(config::config_path(config_path, &env).as_deref());
    let config = Config::resolve(file, &env, &SessionInfo::default());
    let cache = TtlCache::new(config.cache_file.clone(), config.ttl.clone());

    match args.command {
        CacheCommand::Show { json } => run_show(&cache, json),
        CacheCommand::Clear => run_clear(&cache),
        CacheCommand::Path => {
            println!("{}", cache.path().display());
            Ok(())
        }
    }
}

/// The captured environment with `--project` taking the place of
/// `CLAUDE_PROJECT_DIR`.
fn project_env(project: Option<PathBuf>, env: &Environment) -> Environment {
    let mut env = env.clone();
    if let Some(dir) = project {
        env.project_dir = Some(dir);
    }
    env
}

fn run_show(cache: &TtlCache, json: bool) -> Result<()> {
    let entries = cache.entries();

    if json {
        let out = serde_json::to_string_pretty(&entries).context("failed to serialize cache")?;
        println!("{}", out);
        return Ok(());
    }

    output::header(&format!("Cache: {}", cache.path().display()));
    if entries.is_empty() {
        output::info("No cached facts.");
        return Ok(());
    }

    let now = now_millis();
    for (key, entry) in &entries {
        let ttl = cache.ttl().ttl_for(key);
        let age = entry.age_ms(now);
        let msg = format!("{:<14} age {}ms, ttl {}ms", key, age, ttl.as_millis());
        if entry.is_fresh(ttl, now) {
            output::success(&msg);
        } else {
            output::warning(&format!("{} (stale)", msg));
        }
    }
    Ok(())
}

fn run_clear(cache: &TtlCache) -> Result<()> {
    let removed = cache
        .clear()
        .with_context(|| format!("failed to remove {}", cache.path().display()))?;
    if removed {
        output::success(&format!("Removed {}", cache.path().display()));
    } else {
        output::info("Cache already empty.");
    }
    Ok(())
}
