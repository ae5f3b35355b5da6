#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for the McBean shooting gallery.
//!
//! The world owns every live entity and the round bookkeeping. Adapters and
//! systems mutate it exclusively through [`apply`] and observe it through the
//! [`query`] module.

mod player;
mod targets;
mod tumbleweed;

use glam::Vec2;
use mcbean_core::{
    Command, Event, GamePhase, MenuDirection, MenuOption, RandomSource, RoundResult, TargetId,
    TargetLaunch, INTRO_TICKS, ROUND_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, TOTAL_ROUNDS, WALK_TICKS,
};

pub use player::{Player, Pose, SHOOT_POSE_TICKS};
pub use targets::{Debris, Target, DEBRIS_GRAVITY, DEBRIS_PER_TARGET};
pub use tumbleweed::Tumbleweed;

const WALK_SPEED: f32 = 2.0;
const WALK_START_X: f32 = -100.0;

/// Where the player stands on the title card.
pub const INTRO_POSITION: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
/// Where the player stands while shooting.
pub const STANCE_POSITION: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT - 150.0);

#[derive(Clone, Debug)]
struct Scoreboard {
    score: u32,
    bullets: u32,
    round: u32,
    total_rounds: u32,
    round_hits: u32,
    results: Vec<RoundResult>,
}

impl Scoreboard {
    fn new(total_rounds: u32) -> Self {
        Self {
            score: 0,
            bullets: ROUND_SIZE,
            round: 1,
            total_rounds: total_rounds.max(1),
            round_hits: 0,
            results: Vec::new(),
        }
    }
}

/// Represents the authoritative McBean game state.
#[derive(Debug)]
pub struct World {
    phase: GamePhase,
    phase_ticks: u32,
    player: Player,
    tumbleweed: Option<Tumbleweed>,
    targets: Vec<Target>,
    targets_at_tick_start: usize,
    next_target_id: TargetId,
    scoreboard: Scoreboard,
    menu_selection: MenuOption,
    random: Box<dyn RandomSource>,
}

impl World {
    /// Creates a new world on the intro screen, drawing debris from `random`.
    #[must_use]
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Self::with_rounds(random, TOTAL_ROUNDS)
    }

    /// Creates a new world that plays `total_rounds` rounds before game over.
    #[must_use]
    pub fn with_rounds(random: Box<dyn RandomSource>, total_rounds: u32) -> Self {
        Self {
            phase: GamePhase::Intro,
            phase_ticks: 0,
            player: Player::new(INTRO_POSITION),
            tumbleweed: None,
            targets: Vec::new(),
            targets_at_tick_start: 0,
            next_target_id: TargetId::new(0),
            scoreboard: Scoreboard::new(total_rounds),
            menu_selection: MenuOption::default(),
            random,
        }
    }

    fn enter_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        let from = self.phase;
        self.phase = phase;
        self.phase_ticks = 0;
        tracing::debug!(?from, to = ?phase, "phase changed");
        out_events.push(Event::PhaseChanged { from, to: phase });
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        let phase = self.phase;
        self.phase_ticks = self.phase_ticks.saturating_add(1);
        out_events.push(Event::TimeAdvanced { phase });

        match phase {
            GamePhase::Intro => {
                if self.phase_ticks > INTRO_TICKS {
                    self.tumbleweed = Some(Tumbleweed::new());
                    self.player
                        .place(Vec2::new(WALK_START_X, SCREEN_HEIGHT - 100.0));
                    self.enter_phase(GamePhase::Walk, out_events);
                }
            }
            GamePhase::Walk => {
                self.player.walk(WALK_SPEED);
                if let Some(tumbleweed) = self.tumbleweed.as_mut() {
                    tumbleweed.advance();
                }
                if self.phase_ticks > WALK_TICKS {
                    self.tumbleweed = None;
                    self.player.place(STANCE_POSITION);
                    self.enter_phase(GamePhase::Gameplay, out_events);
                }
            }
            GamePhase::Gameplay => {
                self.targets_at_tick_start = self.targets.len();
                self.player.advance();
                for target in &mut self.targets {
                    target.advance();
                }
                self.targets.retain(|target| {
                    if target.is_alive() {
                        true
                    } else {
                        out_events.push(Event::TargetRemoved {
                            target: target.id(),
                        });
                        false
                    }
                });
            }
            GamePhase::GameOver => {}
        }
    }

    fn spawn_target(&mut self, launch: TargetLaunch, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Gameplay {
            return;
        }
        let id = self.next_target_id;
        self.next_target_id = TargetId::new(id.get().wrapping_add(1));
        // The disc flies once on the tick it launches.
        let mut target = Target::launch(id, launch);
        target.advance();
        self.targets.push(target);
        out_events.push(Event::TargetSpawned {
            target: id,
            trajectory: launch.trajectory,
        });
    }

    fn fire(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::Gameplay || self.scoreboard.bullets == 0 {
            return;
        }

        let random = self.random.as_mut();
        let mut hit = None;
        if let Some(target) = self
            .targets
            .iter_mut()
            .find(|target| target.contains(position))
        {
            if target.break_apart(random) {
                hit = Some(target.id());
                out_events.push(Event::TargetBroken {
                    target: target.id(),
                    position: target.position(),
                });
            }
        }

        if hit.is_some() {
            self.scoreboard.score += 1;
            self.scoreboard.round_hits += 1;
        }
        self.scoreboard.bullets -= 1;
        self.player.shoot();
        out_events.push(Event::ShotFired {
            position,
            hit,
            bullets_remaining: self.scoreboard.bullets,
        });

        if self.scoreboard.bullets == 0 {
            self.complete_round(out_events);
        }
    }

    fn complete_round(&mut self, out_events: &mut Vec<Event>) {
        let result = RoundResult::new(self.scoreboard.round_hits, ROUND_SIZE);
        self.scoreboard.results.push(result);
        tracing::info!(
            round = self.scoreboard.round,
            hits = result.hits,
            shots = result.shots,
            "round complete"
        );
        out_events.push(Event::RoundCompleted {
            round: self.scoreboard.round,
            result,
        });

        if self.scoreboard.round < self.scoreboard.total_rounds {
            self.scoreboard.round += 1;
            self.scoreboard.bullets = ROUND_SIZE;
            self.scoreboard.round_hits = 0;
            self.targets.clear();
            out_events.push(Event::RoundStarted {
                round: self.scoreboard.round,
            });
        } else {
            self.enter_phase(GamePhase::GameOver, out_events);
        }
    }

    fn move_selection(&mut self, direction: MenuDirection, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        let option = match direction {
            MenuDirection::Up => MenuOption::Restart,
            MenuDirection::Down => MenuOption::Quit,
        };
        if option != self.menu_selection {
            self.menu_selection = option;
            out_events.push(Event::MenuSelectionChanged { option });
        }
    }

    fn confirm_selection(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        out_events.push(match self.menu_selection {
            MenuOption::Restart => Event::RestartConfirmed,
            MenuOption::Quit => Event::QuitConfirmed,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => world.tick(out_events),
        Command::SpawnTarget { launch } => world.spawn_target(launch, out_events),
        Command::Fire { position } => world.fire(position, out_events),
        Command::MoveSelection { direction } => world.move_selection(direction, out_events),
        Command::ConfirmSelection => world.confirm_selection(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use mcbean_core::{GamePhase, MenuOption, RoundResult};

    use super::{Player, Target, Tumbleweed, World};

    /// Phase currently active.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Ticks simulated since the current phase began.
    #[must_use]
    pub fn phase_ticks(world: &World) -> u32 {
        world.phase_ticks
    }

    /// The player character.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// The walk-cutscene prop, present only during the walk phase.
    #[must_use]
    pub fn tumbleweed(world: &World) -> Option<&Tumbleweed> {
        world.tumbleweed.as_ref()
    }

    /// Live discs in spawn order, which is also hit-test order.
    #[must_use]
    pub fn targets(world: &World) -> &[Target] {
        &world.targets
    }

    /// Number of live discs, broken ones included until their debris settle.
    #[must_use]
    pub fn live_target_count(world: &World) -> usize {
        world.targets.len()
    }

    /// Disc count observed at the start of the latest gameplay tick, before
    /// that tick culled anything. Spawn decisions compare against this count.
    #[must_use]
    pub fn tick_start_target_count(world: &World) -> usize {
        world.targets_at_tick_start
    }

    /// Cumulative score across rounds.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.scoreboard.score
    }

    /// Bullets left in the current round.
    #[must_use]
    pub fn bullets(world: &World) -> u32 {
        world.scoreboard.bullets
    }

    /// One-based index of the current round.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.scoreboard.round
    }

    /// Number of rounds in a game.
    #[must_use]
    pub fn total_rounds(world: &World) -> u32 {
        world.scoreboard.total_rounds
    }

    /// Hits recorded in the current round.
    #[must_use]
    pub fn round_hits(world: &World) -> u32 {
        world.scoreboard.round_hits
    }

    /// Results of every completed round, oldest first.
    #[must_use]
    pub fn round_results(world: &World) -> &[RoundResult] {
        &world.scoreboard.results
    }

    /// Highlighted entry of the game-over menu.
    #[must_use]
    pub fn menu_selection(world: &World) -> MenuOption {
        world.menu_selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcbean_core::{SeededRandom, Trajectory};

    fn world() -> World {
        World::new(Box::new(SeededRandom::from_seed(1)))
    }

    fn tick(world: &mut World, count: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..count {
            apply(world, Command::Tick, &mut events);
        }
        events
    }

    fn enter_gameplay(world: &mut World) {
        let _ = tick(world, INTRO_TICKS + 1 + WALK_TICKS + 1);
        assert_eq!(query::phase(world), GamePhase::Gameplay);
    }

    #[test]
    fn intro_lasts_until_timer_exceeds_threshold() {
        let mut world = world();
        let _ = tick(&mut world, INTRO_TICKS);
        assert_eq!(query::phase(&world), GamePhase::Intro);
        assert!(query::tumbleweed(&world).is_none());

        let events = tick(&mut world, 1);
        assert_eq!(query::phase(&world), GamePhase::Walk);
        assert!(query::tumbleweed(&world).is_some());
        assert!(events.contains(&Event::PhaseChanged {
            from: GamePhase::Intro,
            to: GamePhase::Walk,
        }));
    }

    #[test]
    fn walk_moves_player_then_resets_to_stance() {
        let mut world = world();
        let _ = tick(&mut world, INTRO_TICKS + 1);
        let _ = tick(&mut world, 10);
        assert_eq!(query::player(&world).position().x, WALK_START_X + 20.0);

        let _ = tick(&mut world, WALK_TICKS - 10);
        assert_eq!(query::phase(&world), GamePhase::Walk);
        let _ = tick(&mut world, 1);
        assert_eq!(query::phase(&world), GamePhase::Gameplay);
        assert_eq!(query::player(&world).position(), STANCE_POSITION);
        assert!(query::tumbleweed(&world).is_none());
    }

    #[test]
    fn spawns_are_ignored_outside_gameplay() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnTarget {
                launch: TargetLaunch {
                    trajectory: Trajectory::TopLeftToBottomRight,
                    speed: 2.0,
                },
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::live_target_count(&world), 0);
    }

    #[test]
    fn clicks_outside_gameplay_do_not_spend_bullets() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Fire {
                position: Vec2::new(10.0, 10.0),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::bullets(&world), ROUND_SIZE);
    }

    #[test]
    fn first_matching_target_wins_overlapping_clicks() {
        let mut world = world();
        enter_gameplay(&mut world);
        let mut events = Vec::new();
        let launch = TargetLaunch {
            trajectory: Trajectory::TopLeftToBottomRight,
            speed: 2.0,
        };
        apply(&mut world, Command::SpawnTarget { launch }, &mut events);
        apply(&mut world, Command::SpawnTarget { launch }, &mut events);

        let position = query::targets(&world)[0].position();
        apply(&mut world, Command::Fire { position }, &mut events);

        let targets = query::targets(&world);
        assert!(!targets[0].is_intact());
        assert!(targets[1].is_intact());
        assert_eq!(query::score(&world), 1);
    }

    #[test]
    fn menu_input_only_applies_on_game_over() {
        let mut world = world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MoveSelection {
                direction: MenuDirection::Down,
            },
            &mut events,
        );
        apply(&mut world, Command::ConfirmSelection, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::menu_selection(&world), MenuOption::Restart);
    }
}
