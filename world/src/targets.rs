//! Flying discs and the debris they leave behind.

use glam::Vec2;
use mcbean_core::{
    RandomSource, TargetId, TargetLaunch, Trajectory, SCREEN_HEIGHT, SCREEN_WIDTH, TARGET_HEIGHT,
    TARGET_WIDTH,
};

/// Fragments produced when a disc breaks.
pub const DEBRIS_PER_TARGET: usize = 8;
/// Downward acceleration applied to debris every tick.
pub const DEBRIS_GRAVITY: f32 = 0.5;

const CULL_MARGIN: f32 = 100.0;

/// Single fragment of a broken disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Debris {
    /// Center of the fragment in screen pixels.
    pub position: Vec2,
    /// Displacement applied every tick.
    pub velocity: Vec2,
    /// Drawn radius of the fragment.
    pub radius: f32,
}

impl Debris {
    fn advance(&mut self) {
        self.position += self.velocity;
        self.velocity.y += DEBRIS_GRAVITY;
    }
}

#[derive(Clone, Debug, PartialEq)]
enum TargetState {
    Intact,
    Broken { debris: Vec<Debris> },
}

/// A flying disc owned by the world.
#[derive(Clone, Debug)]
pub struct Target {
    id: TargetId,
    trajectory: Trajectory,
    position: Vec2,
    velocity_x: f32,
    distance_traveled: f32,
    alive: bool,
    state: TargetState,
}

impl Target {
    /// Places a new disc at the launch point of its trajectory.
    pub(crate) fn launch(id: TargetId, launch: TargetLaunch) -> Self {
        let trajectory = launch.trajectory;
        Self {
            id,
            trajectory,
            position: Vec2::new(trajectory.start_x(), trajectory.start_y()),
            velocity_x: trajectory.velocity_for(launch.speed),
            distance_traveled: 0.0,
            alive: true,
            state: TargetState::Intact,
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Flight path followed by the disc.
    #[must_use]
    pub fn trajectory(&self) -> Trajectory {
        self.trajectory
    }

    /// Current center of the disc.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Signed horizontal velocity in pixels per tick.
    #[must_use]
    pub fn velocity_x(&self) -> f32 {
        self.velocity_x
    }

    /// Travel progress along the path, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        (self.distance_traveled / self.trajectory.total_distance()).clamp(0.0, 1.0)
    }

    /// Whether the disc has not been hit yet.
    #[must_use]
    pub fn is_intact(&self) -> bool {
        matches!(self.state, TargetState::Intact)
    }

    /// Whether the disc should stay in the live collection.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Fragments of a broken disc; empty while intact.
    #[must_use]
    pub fn debris(&self) -> &[Debris] {
        match &self.state {
            TargetState::Intact => &[],
            TargetState::Broken { debris } => debris,
        }
    }

    /// Rectangular hit test against the disc's bounding box.
    ///
    /// The box matches the drawn ellipse's bounds, so clicks in its corners
    /// count as hits. Both axes use strict inequality.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        if !self.is_intact() {
            return false;
        }
        let offset = (point - self.position).abs();
        offset.x < TARGET_WIDTH / 2.0 && offset.y < TARGET_HEIGHT / 2.0
    }

    /// Advances the disc or its debris by one tick.
    pub(crate) fn advance(&mut self) {
        if !self.alive {
            return;
        }
        match &mut self.state {
            TargetState::Intact => {
                self.position.x += self.velocity_x;
                self.distance_traveled += self.velocity_x.abs();
                self.position.y = self.trajectory.height_at(self.progress());

                if self.position.x < -CULL_MARGIN || self.position.x > SCREEN_WIDTH + CULL_MARGIN {
                    self.alive = false;
                }
            }
            TargetState::Broken { debris } => {
                for piece in debris.iter_mut() {
                    piece.advance();
                }
                if debris.iter().all(|piece| piece.position.y > SCREEN_HEIGHT) {
                    self.alive = false;
                }
            }
        }
    }

    /// Shatters an intact disc into debris. Returns `false` if it was already broken.
    pub(crate) fn break_apart(&mut self, random: &mut dyn RandomSource) -> bool {
        if !self.is_intact() {
            return false;
        }
        let debris = (0..DEBRIS_PER_TARGET)
            .map(|_| Debris {
                position: self.position,
                velocity: Vec2::new(random.uniform(-3.0, 3.0), random.uniform(-5.0, -1.0)),
                radius: random.integer(5, 15) as f32,
            })
            .collect();
        self.state = TargetState::Broken { debris };
        true
    }
}
