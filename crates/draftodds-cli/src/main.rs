// Draft lottery odds entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file, stdout carries the report)
// 3. Load config, copying defaults on first run
// 4. Run the requested command and print its table

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use draftodds_cli::app::{self, SimulationOptions};
use draftodds_cli::config;

#[derive(Parser)]
#[command(
    name = "draftodds",
    about = "Draft lottery pick probabilities",
    version
)]
struct Cli {
    /// Directory holding config/ and defaults/
    #[arg(short, long, default_value = ".", global = true)]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute exact pick probabilities for every lottery team
    Odds {
        /// Standings CSV (default: data_paths.standings from config)
        #[arg(short, long)]
        standings: Option<PathBuf>,
    },

    /// Estimate pick probabilities by running repeated lotteries
    Simulate {
        /// Standings CSV (default: data_paths.standings from config)
        #[arg(short, long)]
        standings: Option<PathBuf>,

        /// Number of lotteries to run
        #[arg(short, long)]
        trials: Option<u32>,

        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.dir)?;
    info!("draftodds starting up");

    let config = config::load_config(&cli.dir).context("failed to load configuration")?;
    info!(
        "Config loaded: {} chance slots, {} tickets",
        config.lottery.chances.len(),
        config.lottery.total_chances
    );

    let default_standings = || cli.dir.join(&config.data_paths.standings);
    let result = match cli.command {
        Commands::Odds { ref standings } => {
            let path = standings.clone().unwrap_or_else(default_standings);
            app::run_odds(&config, &path)
        }
        Commands::Simulate {
            ref standings,
            trials,
            seed,
        } => {
            let path = standings.clone().unwrap_or_else(default_standings);
            app::run_simulation(&config, &path, SimulationOptions { trials, seed })
        }
    };

    match result {
        Ok(table) => {
            print!("{table}");
            Ok(())
        }
        Err(e) => {
            error!("command failed: {e:#}");
            Err(e)
        }
    }
}

/// Initialize tracing to log to a file, keeping stdout for the report.
fn init_tracing(base_dir: &std::path::Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draftodds.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftodds_core=info,draftodds_cli=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
