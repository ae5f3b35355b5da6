#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for emitting disc launch commands.

use mcbean_core::{
    Command, Event, GamePhase, RandomSource, TargetLaunch, Trajectory, MAX_LIVE_TARGETS,
    SPAWN_INTERVAL_TICKS,
};

const MIN_SPEED: f32 = 2.0;
const MAX_SPEED: f32 = 3.0;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval_ticks: u32,
    live_cap: usize,
}

impl Config {
    /// Creates a new configuration using the provided cadence and live-disc cap.
    #[must_use]
    pub const fn new(spawn_interval_ticks: u32, live_cap: usize) -> Self {
        Self {
            spawn_interval_ticks,
            live_cap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL_TICKS, MAX_LIVE_TARGETS)
    }
}

/// Pure system that emits spawn commands while a round is in progress.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval_ticks: u32,
    live_cap: usize,
    cooldown: u32,
    random: Box<dyn RandomSource>,
}

impl Spawning {
    /// Creates a new spawning system drawing launch parameters from `random`.
    #[must_use]
    pub fn new(config: Config, random: Box<dyn RandomSource>) -> Self {
        Self {
            spawn_interval_ticks: config.spawn_interval_ticks,
            live_cap: config.live_cap,
            cooldown: 0,
            random,
        }
    }

    /// Consumes events and the disc count taken at the start of the tick to
    /// emit spawn commands.
    ///
    /// The cooldown keeps counting while the live cap is reached. A slot freed
    /// by a departed disc counts as occupied for the rest of that tick, so it is
    /// refilled on the next tick.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: GamePhase,
        live_targets: usize,
        out: &mut Vec<Command>,
    ) {
        if phase != GamePhase::Gameplay {
            self.cooldown = 0;
            return;
        }

        let mut ticks = 0u32;
        for event in events {
            match event {
                Event::TimeAdvanced {
                    phase: GamePhase::Gameplay,
                } => ticks = ticks.saturating_add(1),
                Event::RoundStarted { .. } => {
                    self.cooldown = 0;
                    ticks = 0;
                }
                _ => {}
            }
        }

        if ticks == 0 {
            return;
        }

        self.cooldown = self.cooldown.saturating_add(ticks);
        if self.cooldown > self.spawn_interval_ticks && live_targets < self.live_cap {
            let launch = self.next_launch();
            tracing::trace!(?launch, "launching disc");
            out.push(Command::SpawnTarget { launch });
            self.cooldown = 0;
        }
    }

    fn next_launch(&mut self) -> TargetLaunch {
        let last = Trajectory::ALL.len() as u32 - 1;
        let index = self.random.integer(0, last) as usize;
        let trajectory = Trajectory::ALL[index];
        let speed = self.random.uniform(MIN_SPEED, MAX_SPEED);
        TargetLaunch { trajectory, speed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcbean_core::SeededRandom;

    fn gameplay_tick() -> Event {
        Event::TimeAdvanced {
            phase: GamePhase::Gameplay,
        }
    }

    #[test]
    fn waits_for_full_interval_before_first_launch() {
        let mut spawning = Spawning::new(Config::default(), Box::new(SeededRandom::from_seed(3)));
        let mut commands = Vec::new();

        for _ in 0..SPAWN_INTERVAL_TICKS {
            spawning.handle(&[gameplay_tick()], GamePhase::Gameplay, 0, &mut commands);
        }
        assert!(commands.is_empty(), "no launch before the interval elapses");

        spawning.handle(&[gameplay_tick()], GamePhase::Gameplay, 0, &mut commands);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn launch_parameters_stay_in_range() {
        let mut spawning = Spawning::new(Config::new(0, 3), Box::new(SeededRandom::from_seed(11)));
        let mut seen = [false; 4];
        for _ in 0..256 {
            let launch = spawning.next_launch();
            assert!((MIN_SPEED..MAX_SPEED).contains(&launch.speed));
            let index = Trajectory::ALL
                .iter()
                .position(|trajectory| *trajectory == launch.trajectory)
                .expect("launch uses a known trajectory");
            seen[index] = true;
        }
        assert!(seen.iter().all(|hit| *hit), "every trajectory is drawn");
    }

    #[test]
    fn other_phases_reset_cooldown() {
        let mut spawning = Spawning::new(Config::new(2, 3), Box::new(SeededRandom::from_seed(5)));
        let mut commands = Vec::new();

        spawning.handle(&[gameplay_tick()], GamePhase::Gameplay, 0, &mut commands);
        spawning.handle(&[gameplay_tick()], GamePhase::Gameplay, 0, &mut commands);
        spawning.handle(&[], GamePhase::GameOver, 0, &mut commands);
        spawning.handle(&[gameplay_tick()], GamePhase::Gameplay, 0, &mut commands);

        assert!(commands.is_empty());
        assert_eq!(spawning.cooldown, 1);
    }
}
