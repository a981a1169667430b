//! Stick displacement state and the radial travel limit

use tracing::trace;

use super::geometry::{DisplacementVector, DisplayFrame, PointerSample, Vector2};
use crate::config::ControlConfig;

/// Clamp a vector to a disk of the given radius.
///
/// Vectors inside the disk pass through unchanged. Vectors outside are scaled
/// back onto the boundary along their own direction, so the reachable set is
/// a disk rather than the square a per-axis clamp would give.
pub fn radial_clamp(v: Vector2, radius: f64) -> Vector2 {
    if v.magnitude() <= radius {
        return v;
    }
    // Outside a non-negative radius, so the vector is never zero here
    v.normalize().map(|unit| unit * radius).unwrap_or(Vector2::ZERO)
}

/// Owns the stick's current displacement from the widget centre.
///
/// After every update `current.magnitude() <= travel_limit`.
#[derive(Debug, Clone)]
pub struct StickModel {
    current: DisplacementVector,
    frame: DisplayFrame,
    travel_limit: f64,
    min_intensity: u8,
}

impl StickModel {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            current: Vector2::ZERO,
            frame: *config.frame(),
            travel_limit: config.travel_limit(),
            min_intensity: config.min_intensity(),
        }
    }

    pub fn current(&self) -> DisplacementVector {
        self.current
    }

    pub fn travel_limit(&self) -> f64 {
        self.travel_limit
    }

    /// Move the stick by the pointer delta between two samples.
    ///
    /// The tentative position (`current + delta`) is clamped to the travel
    /// limit by rescaling it, not by cutting the drag where it crosses the
    /// boundary: a large jump snaps the knob onto the boundary in the
    /// direction of the tentative position.
    pub fn apply_drag(&mut self, previous: PointerSample, next: PointerSample) -> DisplacementVector {
        let delta = self.frame.to_control_space(next) - self.frame.to_control_space(previous);
        let tentative = self.current + delta;
        let clamped = radial_clamp(tentative, self.travel_limit);

        if clamped != tentative {
            trace!(
                "Stick clamped: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                tentative.x, tentative.y, clamped.x, clamped.y
            );
        }

        self.current = clamped;
        self.current
    }

    /// Snap back to centre
    pub fn reset(&mut self) -> DisplacementVector {
        self.current = Vector2::ZERO;
        self.current
    }

    /// Ring brightness in `[min_intensity, 255]`, linear in displacement.
    ///
    /// Visual only; computed from `current` on every call.
    pub fn feedback_intensity(&self) -> u8 {
        let min = f64::from(self.min_intensity);
        let span = 255.0 - min;
        let fraction = (self.current.magnitude() / self.travel_limit).clamp(0.0, 1.0);
        (min + span * fraction).clamp(min, 255.0) as u8
    }
}
