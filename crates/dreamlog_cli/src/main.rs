//! DreamLog command-line entry point.
//!
//! # Responsibility
//! - Open a journal database read-only from the engine's point of view.
//! - Print statistics and dream listings as JSON for quick inspection.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dreamlog_core::db::open_db;
use dreamlog_core::{
    core_version, default_log_level, init_logging, Clock, DreamService, DreamStatsService,
    FixedClock, SqliteDreamStore, StatsConfig, SystemClock,
};
use log::info;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "dreamlog", version, about = "Dream journal statistics")]
struct Cli {
    /// Absolute directory for rolling log files. Logging stays off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the core crate version.
    Version,
    /// Print every statistic for one user.
    Stats {
        #[command(flatten)]
        target: Target,

        /// Override "today" (YYYY-MM-DD).
        #[arg(long)]
        today: Option<NaiveDate>,

        /// JSON file with `top_n`, `week_start` and `other_label`.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print one user's dreams ordered by date.
    Dreams {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args)]
struct Target {
    /// Path to the SQLite journal.
    #[arg(long)]
    db: PathBuf,

    /// User UUID.
    #[arg(long)]
    user: Uuid,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    match cli.command {
        Command::Version => println!("dreamlog_core version={}", core_version()),
        Command::Stats {
            target,
            today,
            config,
        } => {
            let config = load_config(config)?;
            match today {
                Some(date) => print_stats(&target, FixedClock(date), config)?,
                None => print_stats(&target, SystemClock, config)?,
            }
        }
        Command::Dreams { target } => {
            let conn = open_db(&target.db)
                .with_context(|| format!("failed to open `{}`", target.db.display()))?;
            let service = DreamService::new(SqliteDreamStore::try_new(&conn)?);
            let dreams = service.sorted_dreams(target.user)?;
            println!("{}", serde_json::to_string_pretty(&dreams)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<StatsConfig> {
    let Some(path) = path else {
        return Ok(StatsConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config `{}`", path.display()))?;
    Ok(StatsConfig::from_json_str(&raw)?)
}

fn print_stats<C: Clock>(target: &Target, clock: C, config: StatsConfig) -> Result<()> {
    let conn = open_db(&target.db)
        .with_context(|| format!("failed to open `{}`", target.db.display()))?;
    let store = SqliteDreamStore::try_new(&conn)?;
    let stats = DreamStatsService::with_clock(store, clock, config).user_stats(target.user)?;
    info!("event=cli_stats module=cli status=ok user_id={}", target.user);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
