/// Per-object animation behaviors
use std::f64::consts::TAU;

use nalgebra::{Matrix4, Vector3};

use crate::solids::SolidKind;
use crate::transform::{Transform, TRANSLATION_Y};

/// Default time for one full revolution
pub const DEFAULT_ROTATION_PERIOD_MS: f64 = 5000.0;

/// Slack used when comparing the bobbing height against its bounds, so that
/// repeated `0.05` steps still land on `±2`.
const BOB_EPSILON: f64 = 1e-9;

/// Constant-rate spin about a fixed axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub axis: Vector3<f64>,
    pub period_ms: f64,
}

impl Spin {
    pub fn new(axis: Vector3<f64>, period_ms: f64) -> Self {
        Self { axis, period_ms }
    }

    /// Angle covered in `elapsed_ms`
    pub fn angle(&self, elapsed_ms: f64) -> f64 {
        TAU * (elapsed_ms / self.period_ms)
    }

    pub fn apply(&self, transform: &Matrix4<f64>, elapsed_ms: f64) -> Matrix4<f64> {
        Transform::rotate(transform, self.angle(elapsed_ms), &self.axis)
    }
}

/// Bounds and per-frame step of the vertical bob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BobParams {
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
}

impl Default for BobParams {
    fn default() -> Self {
        Self {
            lower: -2.0,
            upper: 2.0,
            step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BobPhase {
    Rising,
    Falling,
}

/// Bounded vertical oscillator with hysteresis.
///
/// Steps once per frame regardless of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bob {
    pub params: BobParams,
    pub phase: BobPhase,
}

impl Bob {
    pub fn new(params: BobParams) -> Self {
        Self {
            params,
            phase: BobPhase::Rising,
        }
    }

    /// Advance one frame from height `y` and return the new height
    pub fn step(&mut self, y: f64) -> f64 {
        let BobParams { lower, upper, step } = self.params;
        match self.phase {
            BobPhase::Rising => {
                let y = if y < upper - BOB_EPSILON { y + step } else { y };
                if y >= upper - BOB_EPSILON {
                    self.phase = BobPhase::Falling;
                }
                y
            }
            BobPhase::Falling => {
                let y = if y > lower + BOB_EPSILON { y - step } else { y };
                if y <= lower + BOB_EPSILON {
                    self.phase = BobPhase::Rising;
                }
                y
            }
        }
    }

    /// Step the translation Y of `transform` in place
    pub fn apply(&mut self, transform: &mut Matrix4<f64>) {
        let y = self.step(transform[TRANSLATION_Y]);
        transform[TRANSLATION_Y] = y;
    }
}

/// What a mesh does every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    Spin(Spin),
    SpinAndBob(Spin, Bob),
}

impl Animation {
    /// Default behavior for a solid: everything spins, the octahedron also bobs.
    pub fn for_solid(kind: SolidKind, spin: Spin, bob: BobParams) -> Self {
        match kind {
            SolidKind::Pyramid | SolidKind::Dodecahedron => Animation::Spin(spin),
            SolidKind::Octahedron => Animation::SpinAndBob(spin, Bob::new(bob)),
        }
    }

    /// Advance `transform` by `elapsed_ms` of animation
    pub fn update(&mut self, transform: &mut Matrix4<f64>, elapsed_ms: f64) {
        match self {
            Animation::Spin(spin) => {
                *transform = spin.apply(transform, elapsed_ms);
            }
            Animation::SpinAndBob(spin, bob) => {
                *transform = spin.apply(transform, elapsed_ms);
                bob.apply(transform);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_period_is_full_turn() {
        let spin = Spin::new(Vector3::y(), DEFAULT_ROTATION_PERIOD_MS);
        assert!((spin.angle(5000.0) - TAU).abs() < 1e-12);
        assert!((spin.angle(1250.0) - TAU / 4.0).abs() < 1e-12);
        assert_eq!(spin.angle(0.0), 0.0);
    }

    #[test]
    fn test_bob_rises_then_falls() {
        let mut bob = Bob::new(BobParams::default());
        let mut y = 0.0;
        for _ in 0..39 {
            y = bob.step(y);
            assert_eq!(bob.phase, BobPhase::Rising);
        }
        y = bob.step(y);
        assert!(y >= 2.0 - 1e-9);
        assert_eq!(bob.phase, BobPhase::Falling);

        for _ in 0..79 {
            y = bob.step(y);
            assert_eq!(bob.phase, BobPhase::Falling);
        }
        y = bob.step(y);
        assert!(y <= -2.0 + 1e-9);
        assert_eq!(bob.phase, BobPhase::Rising);
    }

    #[test]
    fn test_bob_above_bound_turns_without_moving() {
        let mut bob = Bob::new(BobParams::default());
        assert_eq!(bob.step(3.0), 3.0);
        assert_eq!(bob.phase, BobPhase::Falling);
        assert!((bob.step(3.0) - 2.95).abs() < 1e-12);
    }

    #[test]
    fn test_spin_and_bob_moves_translation_only_by_step() {
        let mut animation = Animation::SpinAndBob(
            Spin::new(Vector3::new(1.0, 0.0, 1.0), DEFAULT_ROTATION_PERIOD_MS),
            Bob::new(BobParams::default()),
        );
        let mut m = Transform::placed_at(&Vector3::new(1.5, 0.0, 0.0));
        animation.update(&mut m, 16.0);
        let t = Transform::translation(&m);
        assert_eq!(t.x, 1.5);
        assert!((t.y - 0.05).abs() < 1e-12);
    }
}
