//! Drives the world and its systems from per-frame input.

use std::time::Duration;

use mcbean_core::{Command, Event, MenuDirection, SeededRandom};
use mcbean_rendering::{AudioCue, FrameControl, FrameInput, FrameOutput, KeyInput};
use mcbean_system_spawning::{Config as SpawningConfig, Spawning};
use mcbean_world::{self as world, query, World};

/// Time the window stays up after a confirmed quit so the music fade can finish.
const QUIT_GRACE: Duration = Duration::from_millis(2_100);

const WORLD_STREAM: u64 = 0;
const SPAWNING_STREAM: u64 = 1;

/// Everything that makes up one playthrough. Restarting replaces the whole value.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    spawning: Spawning,
}

/// Outcome of feeding one frame of input to a session.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct SessionReport {
    pub(crate) cues: Vec<AudioCue>,
    pub(crate) restart: bool,
    pub(crate) quit: bool,
}

impl Session {
    /// Builds a fresh playthrough whose random streams derive from `seed` and `generation`.
    pub(crate) fn new(seed: u64, generation: u64) -> Self {
        let random = |stream| Box::new(SeededRandom::from_seed(derive_seed(seed, generation, stream)));
        Self {
            world: World::new(random(WORLD_STREAM)),
            spawning: Spawning::new(SpawningConfig::default(), random(SPAWNING_STREAM)),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies clicks and key presses, then simulates the due ticks.
    pub(crate) fn advance(&mut self, input: &FrameInput) -> SessionReport {
        let mut events = Vec::new();

        for &position in &input.clicks {
            self.execute(Command::Fire { position }, &mut events);
        }
        for key in &input.keys {
            let command = match key {
                KeyInput::Up => Command::MoveSelection {
                    direction: MenuDirection::Up,
                },
                KeyInput::Down => Command::MoveSelection {
                    direction: MenuDirection::Down,
                },
                KeyInput::Confirm => Command::ConfirmSelection,
            };
            self.execute(command, &mut events);
        }
        for _ in 0..input.ticks {
            self.execute(Command::Tick, &mut events);
        }

        report(&events)
    }

    fn execute(&mut self, command: Command, log: &mut Vec<Event>) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            query::phase(&self.world),
            query::tick_start_target_count(&self.world),
            &mut commands,
        );
        log.append(&mut events);

        for command in commands {
            world::apply(&mut self.world, command, log);
        }
    }
}

fn report(events: &[Event]) -> SessionReport {
    let mut report = SessionReport::default();
    for event in events {
        match event {
            Event::ShotFired { .. } => report.cues.push(AudioCue::Shot),
            Event::RoundCompleted { .. } => report.cues.push(AudioCue::RoundComplete),
            Event::RestartConfirmed => {
                report.cues.push(AudioCue::FadeOutAndRestart);
                report.restart = true;
            }
            Event::QuitConfirmed => {
                report.cues.push(AudioCue::FadeOutAndStop);
                report.quit = true;
            }
            _ => {}
        }
    }
    report
}

fn derive_seed(seed: u64, generation: u64, stream: u64) -> u64 {
    seed ^ ((generation << 1) | stream).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// Owns the current session and handles restart and quit across sessions.
#[derive(Debug)]
pub(crate) struct Game {
    seed: u64,
    generation: u64,
    session: Session,
    quit_grace: Option<Duration>,
}

impl Game {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            seed,
            generation: 0,
            session: Session::new(seed, 0),
            quit_grace: None,
        }
    }

    pub(crate) fn world(&self) -> &World {
        self.session.world()
    }

    /// Runs one presented frame.
    pub(crate) fn frame(&mut self, dt: Duration, input: FrameInput) -> FrameOutput {
        if input.quit_requested {
            tracing::info!("quit requested");
            return exit();
        }

        if let Some(remaining) = self.quit_grace.as_mut() {
            *remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                return exit();
            }
            return FrameOutput::default();
        }

        let SessionReport {
            cues,
            restart,
            quit,
        } = self.session.advance(&input);

        if quit {
            tracing::info!(
                score = query::score(self.world()),
                "quit confirmed; fading out"
            );
            self.quit_grace = Some(QUIT_GRACE);
        } else if restart {
            self.generation += 1;
            tracing::info!(generation = self.generation, "restarting");
            self.session = Session::new(self.seed, self.generation);
        }

        FrameOutput {
            cues,
            control: FrameControl::Continue,
        }
    }
}

fn exit() -> FrameOutput {
    FrameOutput {
        cues: Vec::new(),
        control: FrameControl::Exit,
    }
}
