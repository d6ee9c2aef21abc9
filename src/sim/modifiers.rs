//! Global timing modifiers: warp slow-motion, magnet window, camera shake
//!
//! Warp and magnet countdowns tick once per simulation frame regardless of the
//! time scale, so a warp does not stretch its own duration.

use crate::consts::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Modifiers {
    /// Multiplier applied to every in-world per-frame delta (0.5 or 1.0)
    pub time_scale: f32,
    /// Frames of warp remaining (0 = inactive)
    pub warp_timer: u32,
    /// Frames of magnet remaining (0 = inactive)
    pub magnet_timer: u32,
    /// Render-origin jitter amplitude
    pub shake: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            warp_timer: 0,
            magnet_timer: 0,
            shake: 0.0,
        }
    }
}

impl Modifiers {
    /// Advance countdowns and decay shake. Runs first in every tick.
    pub fn advance(&mut self) {
        if self.warp_timer > 0 {
            self.warp_timer -= 1;
            self.time_scale = if self.warp_timer == 0 {
                1.0
            } else {
                WARP_TIME_SCALE
            };
        }

        self.magnet_timer = self.magnet_timer.saturating_sub(1);

        if self.shake > 0.0 {
            self.shake *= SHAKE_DECAY;
            if self.shake < SHAKE_CUTOFF {
                self.shake = 0.0;
            }
        }
    }

    /// Start or refresh warp (does not stack)
    pub fn activate_warp(&mut self) {
        self.warp_timer = WARP_FRAMES;
    }

    /// Start or refresh magnet (does not stack)
    pub fn activate_magnet(&mut self) {
        self.magnet_timer = MAGNET_FRAMES;
    }

    pub fn warp_active(&self) -> bool {
        self.warp_timer > 0
    }

    pub fn magnet_active(&self) -> bool {
        self.magnet_timer > 0
    }

    /// Set shake to an event's intensity (replaces, never accumulates)
    pub fn shake(&mut self, intensity: f32) {
        self.shake = intensity;
    }
}
