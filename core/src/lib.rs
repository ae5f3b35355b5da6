#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the McBean shooting gallery.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod random;
mod sprite;

use glam::Vec2;

pub use random::{RandomSource, SeededRandom};
pub use sprite::{Sprite, SpriteSize};

/// Title shown on the intro screen and used for the window caption.
pub const GAME_TITLE: &str = "M&M McBean";

/// Width of the playfield in screen pixels.
pub const SCREEN_WIDTH: f32 = 800.0;
/// Height of the playfield in screen pixels.
pub const SCREEN_HEIGHT: f32 = 600.0;
/// Number of simulation ticks executed per second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Ticks the intro screen must exceed before the walk cutscene begins.
pub const INTRO_TICKS: u32 = 120;
/// Ticks the walk cutscene must exceed before gameplay begins.
pub const WALK_TICKS: u32 = 180;
/// Ticks the spawn cooldown must exceed before another disc may launch.
pub const SPAWN_INTERVAL_TICKS: u32 = 60;
/// Maximum number of discs that may be live at once.
pub const MAX_LIVE_TARGETS: usize = 3;

/// Bullets loaded at the start of every round.
pub const ROUND_SIZE: u32 = 6;
/// Number of rounds played before the game ends.
pub const TOTAL_ROUNDS: u32 = 1;

/// Width of a flying disc and of its hit box.
pub const TARGET_WIDTH: f32 = 60.0;
/// Height of a flying disc and of its hit box.
pub const TARGET_HEIGHT: f32 = 40.0;

/// Phases the game moves through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Title card showing the character.
    Intro,
    /// Cutscene where the character walks into the desert.
    Walk,
    /// Timed shooting round against flying discs.
    Gameplay,
    /// Final score screen with the restart/quit menu.
    GameOver,
}

/// Entries of the game-over menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MenuOption {
    /// Start a brand new game.
    #[default]
    Restart,
    /// Leave the game.
    Quit,
}

/// Directional menu input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuDirection {
    /// Moves the selection toward the first entry.
    Up,
    /// Moves the selection toward the last entry.
    Down,
}

/// Unique identifier assigned to a flying disc.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u32);

impl TargetId {
    /// Creates a new target identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One of the four corner-to-corner flight paths a disc may take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trajectory {
    /// Launches low on the right edge and climbs toward the upper left.
    BottomRightToTopLeft,
    /// Launches high on the right edge and sinks toward the lower left.
    TopRightToBottomLeft,
    /// Launches high on the left edge and sinks toward the lower right.
    TopLeftToBottomRight,
    /// Launches low on the left edge and climbs toward the upper right.
    BottomLeftToTopRight,
}

const LAUNCH_MARGIN: f32 = 50.0;
const HIGH_LANE_Y: f32 = SCREEN_HEIGHT * 0.1;
const LOW_LANE_Y: f32 = SCREEN_HEIGHT - 100.0;
const ARC_HEIGHT: f32 = 100.0;

impl Trajectory {
    /// Every trajectory class, in the order used for uniform selection.
    pub const ALL: [Trajectory; 4] = [
        Trajectory::BottomRightToTopLeft,
        Trajectory::TopRightToBottomLeft,
        Trajectory::TopLeftToBottomRight,
        Trajectory::BottomLeftToTopRight,
    ];

    /// Whether the disc launches from the right edge and travels left.
    #[must_use]
    pub const fn launches_from_right(self) -> bool {
        matches!(
            self,
            Trajectory::BottomRightToTopLeft | Trajectory::TopRightToBottomLeft
        )
    }

    /// Horizontal launch position, just outside the visible area.
    #[must_use]
    pub fn start_x(self) -> f32 {
        if self.launches_from_right() {
            SCREEN_WIDTH + LAUNCH_MARGIN
        } else {
            -LAUNCH_MARGIN
        }
    }

    /// Vertical launch position.
    #[must_use]
    pub const fn start_y(self) -> f32 {
        match self {
            Trajectory::BottomRightToTopLeft | Trajectory::BottomLeftToTopRight => LOW_LANE_Y,
            Trajectory::TopRightToBottomLeft | Trajectory::TopLeftToBottomRight => HIGH_LANE_Y,
        }
    }

    /// Vertical position reached at the end of the path.
    #[must_use]
    pub const fn end_y(self) -> f32 {
        match self {
            Trajectory::BottomRightToTopLeft | Trajectory::BottomLeftToTopRight => HIGH_LANE_Y,
            Trajectory::TopRightToBottomLeft | Trajectory::TopLeftToBottomRight => LOW_LANE_Y,
        }
    }

    /// Converts a speed magnitude into a signed horizontal velocity.
    #[must_use]
    pub fn velocity_for(self, speed: f32) -> f32 {
        if self.launches_from_right() {
            -speed.abs()
        } else {
            speed.abs()
        }
    }

    /// Length of the path used to normalise travel progress.
    #[must_use]
    pub fn total_distance(self) -> f32 {
        SCREEN_WIDTH + 2.0 * LAUNCH_MARGIN
    }

    /// Sign applied to the parabolic offset: climbing paths use `+1`.
    #[must_use]
    pub const fn arc_sign(self) -> f32 {
        match self {
            Trajectory::BottomRightToTopLeft | Trajectory::BottomLeftToTopRight => 1.0,
            Trajectory::TopRightToBottomLeft | Trajectory::TopLeftToBottomRight => -1.0,
        }
    }

    /// Vertical position for the provided progress ratio, arc included.
    #[must_use]
    pub fn height_at(self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        let linear = self.start_y() + (self.end_y() - self.start_y()) * progress;
        linear + self.arc_sign() * parabolic_offset(progress)
    }
}

/// Unsigned parabolic bow `4p(1-p)·100`; zero at both ends and 100 at `p = 0.5`.
#[must_use]
pub fn parabolic_offset(progress: f32) -> f32 {
    4.0 * progress * (1.0 - progress) * ARC_HEIGHT
}

/// Launch parameters chosen by the spawning system for a new disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetLaunch {
    /// Flight path the disc follows.
    pub trajectory: Trajectory,
    /// Horizontal speed magnitude in pixels per tick.
    pub speed: f32,
}

/// Outcome of one completed round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoundResult {
    /// Discs broken during the round.
    pub hits: u32,
    /// Shots available during the round.
    pub shots: u32,
}

impl RoundResult {
    /// Creates a new round result.
    #[must_use]
    pub const fn new(hits: u32, shots: u32) -> Self {
        Self { hits, shots }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by a single fixed tick.
    Tick,
    /// Launches a new disc using the provided parameters. The disc advances
    /// once immediately as part of the tick that requested it.
    SpawnTarget {
        /// Trajectory and speed selected for the disc.
        launch: TargetLaunch,
    },
    /// Fires a shot at the provided screen position.
    Fire {
        /// Pointer position in screen pixels.
        position: Vec2,
    },
    /// Moves the game-over menu selection.
    MoveSelection {
        /// Direction of the requested move.
        direction: MenuDirection,
    },
    /// Confirms the currently selected game-over menu entry.
    ConfirmSelection,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Phase that was active while the tick was simulated.
        phase: GamePhase,
    },
    /// Announces a transition between phases.
    PhaseChanged {
        /// Phase that was left.
        from: GamePhase,
        /// Phase that became active.
        to: GamePhase,
    },
    /// Confirms that a disc was launched.
    TargetSpawned {
        /// Identifier assigned to the disc.
        target: TargetId,
        /// Path the disc follows.
        trajectory: Trajectory,
    },
    /// Reports that a shot broke a disc.
    TargetBroken {
        /// Identifier of the broken disc.
        target: TargetId,
        /// Disc position at the moment it broke.
        position: Vec2,
    },
    /// Reports that a disc left the playfield and was discarded.
    TargetRemoved {
        /// Identifier of the removed disc.
        target: TargetId,
    },
    /// Reports that a shot was fired, regardless of whether it hit.
    ShotFired {
        /// Pointer position of the shot.
        position: Vec2,
        /// Disc broken by the shot, if any.
        hit: Option<TargetId>,
        /// Bullets left in the current round after the shot.
        bullets_remaining: u32,
    },
    /// Reports that the last bullet of a round was fired.
    RoundCompleted {
        /// One-based index of the completed round.
        round: u32,
        /// Hits recorded for the round.
        result: RoundResult,
    },
    /// Reports that a fresh round started with a full magazine.
    RoundStarted {
        /// One-based index of the new round.
        round: u32,
    },
    /// Reports that the game-over menu selection moved.
    MenuSelectionChanged {
        /// Entry that is now highlighted.
        option: MenuOption,
    },
    /// The player confirmed a restart from the game-over menu.
    RestartConfirmed,
    /// The player confirmed quitting from the game-over menu.
    QuitConfirmed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parabolic_offset_vanishes_at_path_ends() {
        assert_eq!(parabolic_offset(0.0), 0.0);
        assert_eq!(parabolic_offset(1.0), 0.0);
    }

    #[test]
    fn parabolic_offset_peaks_at_midpoint() {
        assert!((parabolic_offset(0.5) - 100.0).abs() < 1e-4);
        for step in 0..=100 {
            let progress = step as f32 / 100.0;
            assert!(parabolic_offset(progress) <= parabolic_offset(0.5) + 1e-4);
            assert!(parabolic_offset(progress) >= 0.0);
        }
    }

    #[test]
    fn climbing_and_sinking_paths_bow_in_opposite_directions() {
        let climbing = Trajectory::BottomLeftToTopRight;
        let sinking = Trajectory::TopLeftToBottomRight;
        let climbing_mid = climbing.height_at(0.5);
        let sinking_mid = sinking.height_at(0.5);

        let linear_mid = (climbing.start_y() + climbing.end_y()) / 2.0;
        assert!((climbing_mid - (linear_mid + 100.0)).abs() < 1e-3);
        assert!((sinking_mid - (linear_mid - 100.0)).abs() < 1e-3);
    }

    #[test]
    fn height_clamps_progress_to_unit_range() {
        let trajectory = Trajectory::TopRightToBottomLeft;
        assert_eq!(trajectory.height_at(-1.0), trajectory.start_y());
        assert_eq!(trajectory.height_at(3.0), trajectory.end_y());
    }

    #[test]
    fn velocity_sign_follows_launch_edge() {
        for trajectory in Trajectory::ALL {
            let velocity = trajectory.velocity_for(2.5);
            if trajectory.launches_from_right() {
                assert!(velocity < 0.0);
                assert!(trajectory.start_x() > SCREEN_WIDTH);
            } else {
                assert!(velocity > 0.0);
                assert!(trajectory.start_x() < 0.0);
            }
        }
    }

    #[test]
    fn menu_defaults_to_restart() {
        assert_eq!(MenuOption::default(), MenuOption::Restart);
    }
}
