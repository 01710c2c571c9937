// Command orchestration: standings -> lottery entries -> odds report.

use std::path::Path;

use anyhow::Context;
use draftodds_core::chances::{assign_chances, lottery_order};
use draftodds_core::draw::simulate;
use draftodds_core::{pick_probabilities, LotteryEntry};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::Config;
use crate::report::format_odds_table;
use crate::standings::{load_standings, Standings};

/// Lottery entries ready for the engine, with the pool they fill.
#[derive(Debug, Clone)]
pub struct Lottery {
    pub entries: Vec<LotteryEntry>,
    pub total_chances: u32,
}

/// Settings for a Monte Carlo run; `None` fields fall back to config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationOptions {
    pub trials: Option<u32>,
    pub seed: Option<u64>,
}

/// Turn loaded standings into lottery entries.
///
/// Explicit chances are taken as given, in file order, and must fill the
/// configured `total_chances` pool; the engine rejects any mismatch. Otherwise
/// teams are put in lottery order and take tickets from the configured chance
/// table.
pub fn build_lottery(config: &Config, standings: Standings) -> anyhow::Result<Lottery> {
    let mut entries = standings.entries;

    let total_chances = if standings.explicit_chances {
        config.lottery.total_chances
    } else {
        lottery_order(&mut entries);
        assign_chances(
            &mut entries,
            &config.lottery.chances,
            config.lottery.split_ties,
        )
        .context("failed to assign lottery chances")?
    };

    Ok(Lottery {
        entries,
        total_chances,
    })
}

fn load_lottery(config: &Config, standings_path: &Path) -> anyhow::Result<Lottery> {
    let standings = load_standings(standings_path)
        .with_context(|| format!("failed to load standings from {}", standings_path.display()))?;
    build_lottery(config, standings)
}

/// Compute the exact odds and render them.
pub fn run_odds(config: &Config, standings_path: &Path) -> anyhow::Result<String> {
    let lottery = load_lottery(config, standings_path)?;
    let matrix = pick_probabilities(&lottery.entries, lottery.total_chances)
        .context("failed to compute lottery odds")?;
    info!(
        "Computed odds for {} teams ({} tickets)",
        lottery.entries.len(),
        lottery.total_chances
    );
    Ok(format_odds_table(
        "Lottery odds",
        &lottery.entries,
        &matrix,
        lottery.total_chances,
    ))
}

/// Estimate the odds by repeated draws and render them.
pub fn run_simulation(
    config: &Config,
    standings_path: &Path,
    options: SimulationOptions,
) -> anyhow::Result<String> {
    let lottery = load_lottery(config, standings_path)?;
    let trials = options.trials.unwrap_or(config.simulation.trials);
    let mut rng = match options.seed.or(config.simulation.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let chances: Vec<u32> = lottery.entries.iter().map(|e| e.chances).collect();
    let matrix = simulate(&chances, lottery.total_chances, trials, &mut rng)
        .context("failed to simulate lottery")?;

    Ok(format_odds_table(
        &format!("Simulated odds ({trials} lotteries)"),
        &lottery.entries,
        &matrix,
        lottery.total_chances,
    ))
}
