//! The player character and its shooting pose.

use glam::Vec2;

/// Ticks the shooting pose stays visible after a shot.
pub const SHOOT_POSE_TICKS: u32 = 10;

/// Pose used to pick the player sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    /// Standing still.
    Idle,
    /// Recoil pose shown briefly after each shot.
    Shooting,
}

/// The single player character.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    position: Vec2,
    shoot_timer: u32,
}

impl Player {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            shoot_timer: 0,
        }
    }

    /// Center of the character sprite.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> Pose {
        if self.shoot_timer > 0 {
            Pose::Shooting
        } else {
            Pose::Idle
        }
    }

    /// Ticks left before the shooting pose ends.
    #[must_use]
    pub fn shoot_timer(&self) -> u32 {
        self.shoot_timer
    }

    pub(crate) fn place(&mut self, position: Vec2) {
        self.position = position;
    }

    pub(crate) fn walk(&mut self, dx: f32) {
        self.position.x += dx;
    }

    pub(crate) fn shoot(&mut self) {
        self.shoot_timer = SHOOT_POSE_TICKS;
    }

    pub(crate) fn advance(&mut self) {
        self.shoot_timer = self.shoot_timer.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shooting_pose_decays_after_fixed_ticks() {
        let mut player = Player::new(Vec2::ZERO);
        player.shoot();
        for _ in 0..SHOOT_POSE_TICKS - 1 {
            player.advance();
            assert_eq!(player.pose(), Pose::Shooting);
        }
        player.advance();
        assert_eq!(player.pose(), Pose::Idle);
        player.advance();
        assert_eq!(player.shoot_timer(), 0);
    }

    #[test]
    fn shooting_again_rearms_the_timer() {
        let mut player = Player::new(Vec2::ZERO);
        player.shoot();
        player.advance();
        player.shoot();
        assert_eq!(player.shoot_timer(), SHOOT_POSE_TICKS);
    }
}
