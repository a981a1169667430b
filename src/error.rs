//! Error types for the joystick core
//!
//! The core has a deliberately narrow failure surface: vector math on a zero
//! vector, and geometry that cannot describe a usable widget. Everything else
//! (pointer events outside a transition, publisher I/O) is handled without
//! surfacing an error here.

use thiserror::Error;

/// Errors raised by the joystick core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JoystickError {
    /// A zero-length vector has no direction to normalize to
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// Construction-time geometry or output settings are inconsistent
    #[error("invalid joystick configuration: {field} {reason}")]
    InvalidConfig {
        /// Offending configuration key (e.g. "stick_radius")
        field: &'static str,
        /// Human readable explanation
        reason: String,
    },
}

impl JoystickError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JoystickError>;
