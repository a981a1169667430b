//! Displacement to velocity scaling and the published message shape

use serde::{Deserialize, Serialize};

use super::geometry::DisplacementVector;
use crate::config::ControlConfig;

/// Planar velocity derived from the stick displacement each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityVector {
    pub x: f64,
    pub y: f64,
}

/// Linear map from `[0, travel_limit]` onto `[0, max_output]`, per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputScaler {
    factor: f64,
}

impl OutputScaler {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            factor: config.max_output() / config.travel_limit(),
        }
    }

    pub fn scale(&self, component: f64) -> f64 {
        self.factor * component
    }

    /// Velocity units per pixel of displacement
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn velocity(&self, displacement: DisplacementVector) -> VelocityVector {
        VelocityVector {
            x: self.scale(displacement.x),
            y: self.scale(displacement.y),
        }
    }
}

/// Three-axis component block of a [`TwistMessage`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Velocity command in the linear/angular layout motion consumers expect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwistMessage {
    pub topic: String,
    pub linear: Vector3,
    pub angular: Vector3,
}

impl TwistMessage {
    /// Planar command: only `linear.x` and `linear.y` are populated
    pub fn planar(topic: impl Into<String>, velocity: VelocityVector) -> Self {
        Self {
            topic: topic.into(),
            linear: Vector3 {
                x: velocity.x,
                y: velocity.y,
                z: 0.0,
            },
            angular: Vector3::default(),
        }
    }

    pub fn is_stop(&self) -> bool {
        self.linear == Vector3::default() && self.angular == Vector3::default()
    }
}
