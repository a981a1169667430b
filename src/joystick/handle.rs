//! Shared joystick handle for the UI thread and the publish task
//!
//! The gesture controller is the single owner of stick state. The window
//! feeds it pointer events on the UI thread while the publish loop samples it
//! from a tokio worker, so the controller sits behind one mutex. Nothing is
//! held across an await and every critical section is a handful of float ops.

use std::sync::Arc;

use parking_lot::Mutex;

use super::geometry::{DisplacementVector, PointerSample};
use super::gesture::{EngagementState, GestureController, GestureOutcome};
use super::input::PointerEventSink;
use super::output::{OutputScaler, VelocityVector};
use crate::config::ControlConfig;

/// Snapshot of everything the renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSnapshot {
    pub displacement: DisplacementVector,
    pub intensity: u8,
    pub state: EngagementState,
}

/// Cloneable handle to the single joystick instance
#[derive(Clone)]
pub struct JoystickHandle {
    inner: Arc<Mutex<GestureController>>,
    scaler: OutputScaler,
    config: Arc<ControlConfig>,
}

impl JoystickHandle {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GestureController::new(&config))),
            scaler: OutputScaler::new(&config),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn scaler(&self) -> OutputScaler {
        self.scaler
    }

    pub fn state(&self) -> EngagementState {
        self.inner.lock().state()
    }

    pub fn current_displacement_for_render(&self) -> DisplacementVector {
        self.inner.lock().stick().current()
    }

    /// Displacement, ring intensity and engagement read under one lock
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let gesture = self.inner.lock();
        RenderSnapshot {
            displacement: gesture.stick().current(),
            intensity: gesture.stick().feedback_intensity(),
            state: gesture.state(),
        }
    }

    pub fn current_velocity(&self) -> VelocityVector {
        let displacement = self.current_displacement_for_render();
        self.scaler.velocity(displacement)
    }
}

impl PointerEventSink for JoystickHandle {
    fn on_pointer_down(&mut self, p: PointerSample) -> GestureOutcome {
        self.inner.lock().on_pointer_down(p)
    }

    fn on_pointer_move(&mut self, p: PointerSample) -> GestureOutcome {
        self.inner.lock().on_pointer_move(p)
    }

    fn on_pointer_up(&mut self, p: PointerSample) -> GestureOutcome {
        self.inner.lock().on_pointer_up(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JoystickConfig;
    use crate::joystick::geometry::Vector2;

    fn handle() -> JoystickHandle {
        JoystickHandle::new(ControlConfig::new(&JoystickConfig::default()).unwrap())
    }

    #[test]
    fn test_clones_share_state() {
        let mut ui_side = handle();
        let publish_side = ui_side.clone();

        ui_side.on_pointer_down(PointerSample::new(125.0, 125.0));
        ui_side.on_pointer_move(PointerSample::new(160.0, 125.0));

        assert_eq!(publish_side.state(), EngagementState::Dragging);
        assert_eq!(publish_side.current_displacement_for_render(), Vector2::new(35.0, 0.0));
        let velocity = publish_side.current_velocity();
        assert!((velocity.x - 2.5).abs() < 1e-12);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_render_snapshot_reflects_release() {
        let mut joystick = handle();
        joystick.on_pointer_down(PointerSample::new(125.0, 125.0));
        joystick.on_pointer_move(PointerSample::new(125.0, 55.0));

        let snapshot = joystick.render_snapshot();
        assert_eq!(snapshot.displacement, Vector2::new(0.0, 70.0));
        assert_eq!(snapshot.intensity, 255);

        joystick.on_pointer_up(PointerSample::new(125.0, 55.0));
        let snapshot = joystick.render_snapshot();
        assert_eq!(snapshot.displacement, Vector2::ZERO);
        assert_eq!(snapshot.intensity, 60);
        assert_eq!(snapshot.state, EngagementState::Idle);
        assert_eq!(joystick.current_velocity(), VelocityVector::default());
    }

    #[test]
    fn test_updates_from_another_thread_are_visible() {
        let joystick = handle();
        let mut worker = joystick.clone();

        std::thread::spawn(move || {
            worker.on_pointer_down(PointerSample::new(125.0, 125.0));
            worker.on_pointer_move(PointerSample::new(125.0, 139.0));
        })
        .join()
        .unwrap();

        let velocity = joystick.current_velocity();
        assert!((velocity.y + 1.0).abs() < 1e-12);
    }
}
