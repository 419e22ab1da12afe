mod ansi;
mod cache;
mod cli;
mod collectors;
mod config;
mod error;
mod input;
mod layout;
mod render;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};
use config::Environment;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = Environment::capture();
    cli::init_tracing(cli.log_level.as_deref(), &env);

    let config_path = cli.config.as_deref();
    match cli.command {
        Some(Command::Cache(args)) => cli::cache::run(args, config_path, &env),
        None => cli::statusline::run(cli.render, config_path, &env),
    }
}
