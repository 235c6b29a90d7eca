//! Procedural recoil animation
//!
//! A shot rotates the weapon about its local Z axis up to a terminal angle
//! and then back down to `terminal - span`, in fixed steps.

use crate::error::GunError;

/// How far the weapon rotates per animation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecoilStep {
    /// Fixed degrees per update call; speed follows the frame rate
    PerTick(f32),
    /// Degrees per second, scaled by the frame's delta time
    PerSecond(f32),
}

impl RecoilStep {
    /// Angle to advance for a frame lasting `delta_time` seconds
    pub fn increment(self, delta_time: f32) -> f32 {
        match self {
            RecoilStep::PerTick(degrees) => degrees,
            RecoilStep::PerSecond(degrees_per_second) => degrees_per_second * delta_time,
        }
    }
}

impl Default for RecoilStep {
    fn default() -> Self {
        RecoilStep::PerTick(1.0)
    }
}

/// Animation phase of a single weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoilPhase {
    #[default]
    Idle,
    /// Rotating toward the terminal angle
    Recoiling,
    /// Rotating back down to rest
    Returning,
}

impl RecoilPhase {
    pub fn in_animation(self) -> bool {
        self != RecoilPhase::Idle
    }

    pub fn is_returning(self) -> bool {
        self == RecoilPhase::Returning
    }
}

/// Per-weapon recoil shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoilCurve {
    /// Terminal Z rotation in degrees
    pub final_rotation: f32,
    /// Degrees between the terminal angle and the rest angle
    pub span: f32,
    pub step: RecoilStep,
}

impl Default for RecoilCurve {
    fn default() -> Self {
        Self {
            final_rotation: 10.0,
            span: 10.0,
            step: RecoilStep::default(),
        }
    }
}

impl RecoilCurve {
    pub fn new(final_rotation: f32, span: f32, step: RecoilStep) -> Self {
        Self {
            final_rotation,
            span,
            step,
        }
    }

    pub fn with_final_rotation(mut self, final_rotation: f32) -> Self {
        self.final_rotation = final_rotation;
        self
    }

    pub fn with_span(mut self, span: f32) -> Self {
        self.span = span;
        self
    }

    pub fn with_step(mut self, step: RecoilStep) -> Self {
        self.step = step;
        self
    }

    /// Z rotation the weapon settles at when a cycle completes
    pub fn rest_rotation(&self) -> f32 {
        self.final_rotation - self.span
    }

    /// Checks that a cycle settles in a bounded number of steps
    pub fn validate(&self) -> Result<(), GunError> {
        let step = match self.step {
            RecoilStep::PerTick(degrees) | RecoilStep::PerSecond(degrees) => degrees,
        };
        if !step.is_finite() || step <= 0.0 {
            return Err(GunError::InvalidRecoil("step must be positive and finite"));
        }
        if !self.span.is_finite() || self.span < 0.0 {
            return Err(GunError::InvalidRecoil("span must be non-negative and finite"));
        }
        if !self.final_rotation.is_finite() {
            return Err(GunError::InvalidRecoil("final rotation must be finite"));
        }
        Ok(())
    }

    /// Advances one animation step from `angle` in `phase`.
    ///
    /// Returns the new angle and phase. Idle input is returned unchanged.
    pub fn advance(&self, phase: RecoilPhase, angle: f32, delta_time: f32) -> (f32, RecoilPhase) {
        let increment = self.step.increment(delta_time);

        match phase {
            RecoilPhase::Idle => (angle, RecoilPhase::Idle),
            RecoilPhase::Recoiling => {
                let next = angle + increment;
                if next >= self.final_rotation {
                    (self.final_rotation, RecoilPhase::Returning)
                } else {
                    (next, RecoilPhase::Recoiling)
                }
            }
            RecoilPhase::Returning => {
                let next = angle - increment;
                if next <= self.rest_rotation() {
                    (self.rest_rotation(), RecoilPhase::Idle)
                } else {
                    (next, RecoilPhase::Returning)
                }
            }
        }
    }
}
