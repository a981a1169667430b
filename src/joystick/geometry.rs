//! Coordinate frames and planar vector helpers.
//!
//! Two frames are in play:
//!
//! - **Display space**: window pixels, origin top-left, y grows downward.
//! - **Control space**: origin at the widget centre, y grows upward.
//!
//! All stick math happens in control space. Conversion back to display space
//! truncates toward zero, so `to_control_space(to_display_space(v))` lands
//! within one pixel of `v` on each axis.

use std::ops::{Add, Mul, Sub};

use crate::error::{JoystickError, Result};

/// Planar vector in control space (stick displacement, drag delta, ...)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

/// The stick's offset from the widget centre
pub type DisplacementVector = Vector2;

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction.
    ///
    /// Fails with [`JoystickError::DegenerateVector`] for the zero vector;
    /// callers that may hold a resting stick must check the magnitude first.
    pub fn normalize(self) -> Result<Vector2> {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return Err(JoystickError::DegenerateVector);
        }
        Ok(Vector2::new(self.x / magnitude, self.y / magnitude))
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, scalar: f64) -> Vector2 {
        Vector2::new(self.x * scalar, self.y * scalar)
    }
}

/// A pointer position in display-space pixels.
///
/// Produced by the input backend and consumed within a single event; never
/// stored past the event that carried it (except as the gesture's last
/// tracked position).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The display frame the widget is drawn into, described by its centre pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFrame {
    centre: PointerSample,
}

impl DisplayFrame {
    pub const fn new(centre: PointerSample) -> Self {
        Self { centre }
    }

    pub fn centre(&self) -> PointerSample {
        self.centre
    }

    /// Translate so the centre maps to the origin and flip y upward
    pub fn to_control_space(&self, p: PointerSample) -> DisplacementVector {
        Vector2::new(p.x - self.centre.x, self.centre.y - p.y)
    }

    /// Inverse of [`Self::to_control_space`], truncating to whole pixels
    pub fn to_display_space(&self, v: DisplacementVector) -> PointerSample {
        PointerSample::new((self.centre.x + v.x).trunc(), (self.centre.y - v.y).trunc())
    }
}
