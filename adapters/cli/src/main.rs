#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless, auto-playing Merge Arena session.

use std::{
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use clap::Parser;
use log::{debug, info};
use merge_arena_core::{HeroClassId, UpgradeTrack};
use merge_arena_host::{FileStore, GameSpeed, MemoryStore, SaveStore, Simulation, SimulationConfig};
use merge_arena_world::query;

const FRAME: Duration = Duration::from_millis(16);
const DECISION_INTERVAL: Duration = Duration::from_secs(1);

/// Runs an auto-playing session for a fixed amount of wall time.
#[derive(Debug, Parser)]
#[command(name = "merge-arena", version)]
struct Cli {
    /// TOML file with simulation tunables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON save file to resume from and write back.
    #[arg(long)]
    save: Option<PathBuf>,
    /// Seconds of frames to simulate before stopping.
    #[arg(long, default_value_t = 60)]
    seconds: u64,
    /// Game speed multiplier.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    speed: Option<u8>,
    /// Seed overriding the configured one.
    #[arg(long)]
    seed: Option<u64>,
}

/// Entry point for the Merge Arena command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(speed) = cli.speed {
        config.speed = GameSpeed::try_from(speed).context("invalid game speed")?;
    }

    let now_ms = unix_millis()?;
    let today = calendar_day(now_ms).context("system clock is out of calendar range")?;

    match cli.save {
        Some(path) => {
            let mut store = FileStore::new(path);
            run(&mut store, &config, cli.seconds, now_ms, today)
        }
        None => run(&mut MemoryStore::default(), &config, cli.seconds, now_ms, today),
    }
}

fn run(
    store: &mut impl SaveStore,
    config: &SimulationConfig,
    seconds: u64,
    now_ms: u64,
    today: NaiveDate,
) -> Result<()> {
    let mut simulation = Simulation::load(&*store, config, now_ms, today);
    if let Err(reason) = simulation.claim_daily_reward(today) {
        debug!("daily reward not claimed: {reason}");
    }
    simulation.set_auto_merge(true);

    let total = Duration::from_secs(seconds);
    let mut elapsed = Duration::ZERO;
    let mut since_decision = Duration::ZERO;
    while elapsed < total {
        simulation.tick(FRAME);
        elapsed += FRAME;
        since_decision += FRAME;
        if since_decision >= DECISION_INTERVAL {
            since_decision = Duration::ZERO;
            autoplay(&mut simulation);
        }
        let _ = simulation.drain_events();
    }

    let played_ms = u64::try_from(total.as_millis()).unwrap_or(u64::MAX);
    simulation
        .save(store, now_ms.saturating_add(played_ms))
        .context("failed to write save file")?;

    let world = simulation.world();
    let profile = query::profile(world);
    info!("session finished after {seconds}s");
    println!(
        "stage {} wave {} | best stage {} | gold {} gems {} | kills {} | dps {:.1}",
        profile.stage,
        profile.wave,
        profile.best_stage,
        profile.gold,
        profile.gems,
        profile.stats.kills,
        query::dps(world),
    );
    Ok(())
}

fn autoplay(simulation: &mut Simulation) {
    let class = query::selected_class(simulation.world());
    while simulation.summon(class).is_ok() {}

    for hero in HeroClassId::ALL {
        if query::profile(simulation.world()).is_unlocked(hero) {
            let _ = simulation.activate_skill(hero);
        }
    }

    if let Err(reason) = simulation.purchase_upgrade(UpgradeTrack::Attack) {
        debug!("attack upgrade skipped: {reason}");
    }
}

fn unix_millis() -> Result<u64> {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?;
    Ok(u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX))
}

fn calendar_day(unix_ms: u64) -> Option<NaiveDate> {
    let days = unix_ms / 86_400_000;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_days(Days::new(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_day_counts_from_epoch() {
        assert_eq!(calendar_day(0), NaiveDate::from_ymd_opt(1970, 1, 1));
        assert_eq!(
            calendar_day(1_709_510_400_000),
            NaiveDate::from_ymd_opt(2024, 3, 4)
        );
    }

    #[test]
    fn cli_parses_speed_and_seconds() {
        let cli = Cli::try_parse_from(["merge-arena", "--seconds", "5", "--speed", "2"])
            .expect("valid arguments");
        assert_eq!(cli.seconds, 5);
        assert_eq!(cli.speed, Some(2));
        assert!(Cli::try_parse_from(["merge-arena", "--speed", "4"]).is_err());
    }
}
