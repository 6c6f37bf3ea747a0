//! B-Side Nexus library root.
//! Exposes the CLI parser, the high-level run() function, and the core
//! modules for key lifecycle tracking and HRP work-time logging.

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use auth::{SessionAuthority, StaticSessionAuthority};
use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, auth: &dyn SessionAuthority) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Profile { action } => cli::commands::profile::handle(action, cfg, auth),
        Commands::Key { action } => cli::commands::key::handle(action, cfg, auth),
        Commands::Hrp { action } => cli::commands::hrp::handle(action, cfg, auth),
    }
}

/// The identity provider sits outside this program; the CLI receives its
/// answer through `--user` / `--role`.
fn session_from_cli(cli: &Cli) -> StaticSessionAuthority {
    match &cli.user {
        Some(user) if !user.trim().is_empty() => {
            StaticSessionAuthority::signed_in(user.trim(), cli.roles.iter().map(|r| r.trim()))
        }
        _ => StaticSessionAuthority::anonymous(),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }

    let auth = session_from_cli(&cli);

    dispatch(&cli, &cfg, &auth)
}
