#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::time::Duration;

use path_defence_core::{Command, Event, WaveProgress};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence.
    #[must_use]
    pub const fn new(spawn_interval: Duration) -> Self {
        Self { spawn_interval }
    }
}

/// Pure system that paces enemy spawns within the active wave.
///
/// The accumulator is primed to a full interval when a wave starts so the
/// first enemy of a wave spawns immediately.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and the wave progress snapshot to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], progress: WaveProgress, out: &mut Vec<Command>) {
        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::WaveStarted { .. } => {
                    self.accumulator = self.spawn_interval;
                }
                Event::TimeAdvanced { dt } => {
                    accumulated = accumulated.saturating_add(*dt);
                }
                _ => {}
            }
        }

        if !progress.in_progress {
            self.accumulator = Duration::ZERO;
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let attempts = self.resolve_spawn_attempts(progress.remaining());
        for _ in 0..attempts {
            out.push(Command::SpawnEnemy);
        }
    }

    fn resolve_spawn_attempts(&mut self, remaining: u32) -> u32 {
        let mut attempts = 0;
        while attempts < remaining && self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        if attempts == remaining {
            // The wave has nothing left to spawn; surplus time must not leak
            // into the next wave.
            self.accumulator = Duration::ZERO;
        }
        attempts
    }
}
