//! Virtual joystick core
//!
//! Pointer events flow through [`GestureController`] into [`StickModel`],
//! whose clamped displacement is mapped to a velocity by [`OutputScaler`].
//! The core performs no I/O; rendering and publishing read it through
//! [`JoystickHandle`].

pub mod geometry;
pub mod gesture;
pub mod handle;
pub mod input;
pub mod model;
pub mod output;

pub use geometry::{DisplacementVector, DisplayFrame, PointerSample, Vector2};
pub use gesture::{EngagementState, GestureController, GestureOutcome};
pub use handle::{JoystickHandle, RenderSnapshot};
pub use input::PointerEventSink;
pub use model::{radial_clamp, StickModel};
pub use output::{OutputScaler, TwistMessage, Vector3, VelocityVector};
