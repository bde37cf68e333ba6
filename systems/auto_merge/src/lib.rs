#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cadence timer that asks the world to auto-merge the selected grid.

use std::time::Duration;

use merge_arena_core::{balance::AUTO_MERGE_INTERVAL, Command, Event, HeroClassId};

/// Configuration parameters that control the auto-merge cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    interval: Duration,
}

impl Config {
    /// Creates a new configuration with the provided merge interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Simulated time between two auto-merge attempts.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(AUTO_MERGE_INTERVAL)
    }
}

/// Auto-merge system that accumulates simulated time while the setting is on.
#[derive(Debug)]
pub struct AutoMerge {
    config: Config,
    accumulator: Duration,
}

impl AutoMerge {
    /// Creates a new auto-merge system.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            accumulator: Duration::ZERO,
        }
    }

    /// Emits one `Command::AutoMerge` per elapsed interval while `enabled` holds.
    ///
    /// Time that passes while the setting is off is discarded.
    pub fn handle(
        &mut self,
        events: &[Event],
        enabled: bool,
        selected: HeroClassId,
        out: &mut Vec<Command>,
    ) {
        if !enabled || self.config.interval.is_zero() {
            self.accumulator = Duration::ZERO;
            return;
        }

        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.accumulator = self.accumulator.saturating_add(*dt);
            }
        }

        while self.accumulator >= self.config.interval {
            self.accumulator -= self.config.interval;
            out.push(Command::AutoMerge { class: selected });
        }
    }
}
