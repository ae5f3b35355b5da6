//! Frame pacing and music fade helpers shared by backends.

use std::time::Duration;

use crate::RenderingError;

const MAX_TICKS_PER_FRAME: u32 = 5;

/// Converts variable frame deltas into a whole number of fixed simulation ticks.
///
/// Time beyond five ticks in a single frame is dropped so a
/// long stall does not replay seconds of simulation at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
}

impl FixedTimestep {
    /// Creates a clock that emits `ticks_per_second` ticks per simulated second.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidTickRate`] when the rate is zero.
    pub fn new(ticks_per_second: u32) -> Result<Self, RenderingError> {
        if ticks_per_second == 0 {
            return Err(RenderingError::InvalidTickRate { ticks_per_second });
        }
        Ok(Self {
            step: Duration::from_secs(1) / ticks_per_second,
            accumulator: Duration::ZERO,
        })
    }

    /// Duration of one tick.
    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Accumulates `dt` and returns how many ticks are now due.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulator += dt;
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
            if ticks == MAX_TICKS_PER_FRAME {
                self.accumulator = self.accumulator.min(self.step);
                break;
            }
        }
        ticks
    }
}

/// Linear volume ramp used to fade background music.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeEnvelope {
    volume: f32,
    fade: Option<Fade>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Fade {
    duration: Duration,
    elapsed: Duration,
}

impl FadeEnvelope {
    /// Creates a steady envelope at `volume`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            fade: None,
        }
    }

    /// Begins fading to silence over `duration`. Restarts any fade in progress.
    pub fn start(&mut self, duration: Duration) {
        self.fade = Some(Fade {
            duration,
            elapsed: Duration::ZERO,
        });
    }

    /// Moves the fade forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed = (fade.elapsed + dt).min(fade.duration);
        }
    }

    /// Whether a fade has been started.
    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Whether a started fade has reached silence.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.fade
            .map_or(false, |fade| fade.elapsed >= fade.duration)
    }

    /// Volume to apply right now.
    #[must_use]
    pub fn volume(&self) -> f32 {
        match self.fade {
            None => self.volume,
            Some(fade) if fade.duration.is_zero() => 0.0,
            Some(fade) => {
                let remaining = 1.0 - fade.elapsed.as_secs_f32() / fade.duration.as_secs_f32();
                self.volume * remaining.clamp(0.0, 1.0)
            }
        }
    }

    /// Drops any fade and returns to the steady volume.
    pub fn reset(&mut self) {
        self.fade = None;
    }
}
