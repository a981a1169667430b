//! Stick GW - on-screen virtual joystick publishing planar velocity commands
//!
//! The [`joystick`] module is the I/O-free core (geometry, stick model,
//! gesture state machine, output scaling). [`ui`] renders it in a native
//! window and [`publish`] samples it at a fixed rate for a motion consumer.

pub mod config;
pub mod error;
pub mod joystick;
pub mod publish;
pub mod ui;

pub use config::{AppConfig, ControlConfig};
pub use error::JoystickError;
pub use joystick::{JoystickHandle, TwistMessage, VelocityVector};
