//! Latch/release gesture state machine
//!
//! ```text
//!            pointer_down on knob
//!   ┌──────┐ ─────────────────────▶ ┌──────────┐ ──┐ pointer_move inside
//!   │ Idle │                        │ Dragging │   │ boundary: apply drag
//!   └──────┘ ◀───────────────────── └──────────┘ ◀─┘
//!            pointer_up, or pointer_move on/outside boundary (reset)
//! ```
//!
//! Events that match no transition are ignored.

use tracing::{debug, trace};

use super::geometry::{DisplacementVector, DisplayFrame, PointerSample};
use super::input::PointerEventSink;
use super::model::StickModel;
use crate::config::ControlConfig;

/// Whether the pointer currently holds the stick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementState {
    Idle,
    Dragging,
}

/// What a pointer event did to the joystick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// No transition matched; nothing changed
    Ignored,
    /// Pointer landed on the knob and latched it
    Engaged,
    /// Stick moved while dragging
    Moved(DisplacementVector),
    /// Pointer released; stick back at centre
    Released,
    /// Pointer left the boundary while dragging; stick back at centre
    Escaped,
}

impl GestureOutcome {
    /// Whether the widget must be redrawn after this event
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Self::Moved(_) | Self::Released | Self::Escaped)
    }
}

#[derive(Debug, Clone, Copy)]
enum Latch {
    Idle,
    Dragging { last_pointer: PointerSample },
}

/// Drives [`StickModel`] from pointer-down/move/up events
#[derive(Debug, Clone)]
pub struct GestureController {
    latch: Latch,
    stick: StickModel,
    frame: DisplayFrame,
    stick_radius: f64,
    control_circle_radius: f64,
}

impl GestureController {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            latch: Latch::Idle,
            stick: StickModel::new(config),
            frame: *config.frame(),
            stick_radius: config.stick_radius(),
            control_circle_radius: config.control_circle_radius(),
        }
    }

    pub fn state(&self) -> EngagementState {
        match self.latch {
            Latch::Idle => EngagementState::Idle,
            Latch::Dragging { .. } => EngagementState::Dragging,
        }
    }

    pub fn stick(&self) -> &StickModel {
        &self.stick
    }

    fn release(&mut self) {
        self.latch = Latch::Idle;
        self.stick.reset();
    }
}

impl PointerEventSink for GestureController {
    fn on_pointer_down(&mut self, p: PointerSample) -> GestureOutcome {
        if !is_finite(p) {
            trace!("Ignoring non-finite pointer_down {:?}", p);
            return GestureOutcome::Ignored;
        }

        match self.latch {
            Latch::Idle => {
                let from_knob = self.frame.to_control_space(p) - self.stick.current();
                if from_knob.magnitude() < self.stick_radius {
                    self.latch = Latch::Dragging { last_pointer: p };
                    debug!("Stick engaged at ({:.0}, {:.0})", p.x, p.y);
                    GestureOutcome::Engaged
                } else {
                    trace!("pointer_down at ({:.0}, {:.0}) missed the knob", p.x, p.y);
                    GestureOutcome::Ignored
                }
            }
            Latch::Dragging { .. } => {
                trace!("pointer_down while already dragging, ignored");
                GestureOutcome::Ignored
            }
        }
    }

    fn on_pointer_move(&mut self, p: PointerSample) -> GestureOutcome {
        if !is_finite(p) {
            trace!("Ignoring non-finite pointer_move {:?}", p);
            return GestureOutcome::Ignored;
        }

        let Latch::Dragging { last_pointer } = self.latch else {
            return GestureOutcome::Ignored;
        };

        if self.frame.to_control_space(p).magnitude() < self.control_circle_radius {
            let current = self.stick.apply_drag(last_pointer, p);
            self.latch = Latch::Dragging { last_pointer: p };
            GestureOutcome::Moved(current)
        } else {
            self.release();
            debug!("Pointer escaped the boundary at ({:.0}, {:.0}), stick reset", p.x, p.y);
            GestureOutcome::Escaped
        }
    }

    fn on_pointer_up(&mut self, _p: PointerSample) -> GestureOutcome {
        match self.latch {
            Latch::Idle => GestureOutcome::Ignored,
            Latch::Dragging { .. } => {
                self.release();
                debug!("Stick released");
                GestureOutcome::Released
            }
        }
    }
}

fn is_finite(p: PointerSample) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JoystickConfig;
    use crate::joystick::geometry::Vector2;

    fn controller() -> GestureController {
        GestureController::new(&ControlConfig::new(&JoystickConfig::default()).unwrap())
    }

    /// Pointer at a control-space offset from the stock centre (125, 125)
    fn offset(dx: f64, dy: f64) -> PointerSample {
        PointerSample::new(125.0 + dx, 125.0 - dy)
    }

    #[test]
    fn test_initial_state_is_idle() {
        let gesture = controller();
        assert_eq!(gesture.state(), EngagementState::Idle);
        assert_eq!(gesture.stick().current(), Vector2::ZERO);
    }

    #[test]
    fn test_scenario_a_drag_and_release() {
        let mut gesture = controller();

        assert_eq!(gesture.on_pointer_down(offset(10.0, 0.0)), GestureOutcome::Engaged);
        assert_eq!(gesture.state(), EngagementState::Dragging);

        let outcome = gesture.on_pointer_move(offset(30.0, 0.0));
        assert_eq!(outcome, GestureOutcome::Moved(Vector2::new(20.0, 0.0)));
        assert!(outcome.needs_redraw());

        let outcome = gesture.on_pointer_up(offset(30.0, 0.0));
        assert_eq!(outcome, GestureOutcome::Released);
        assert!(outcome.needs_redraw());
        assert_eq!(gesture.state(), EngagementState::Idle);
        assert_eq!(gesture.stick().current(), Vector2::ZERO);
    }

    #[test]
    fn test_scenario_a_clamps_beyond_travel_limit() {
        let mut gesture = controller();
        gesture.on_pointer_down(offset(10.0, 0.0));

        // 100 px of drag, pointer still inside the 120 px boundary
        let outcome = gesture.on_pointer_move(offset(110.0, 0.0));
        assert_eq!(outcome, GestureOutcome::Moved(Vector2::new(70.0, 0.0)));
    }

    #[test]
    fn test_scenario_b_boundary_escape_resets_without_pointer_up() {
        let mut gesture = controller();
        gesture.on_pointer_down(offset(0.0, 0.0));
        gesture.on_pointer_move(offset(40.0, 0.0));

        // Exactly on the boundary counts as escaped
        let outcome = gesture.on_pointer_move(offset(120.0, 0.0));
        assert_eq!(outcome, GestureOutcome::Escaped);
        assert!(outcome.needs_redraw());
        assert_eq!(gesture.state(), EngagementState::Idle);
        assert_eq!(gesture.stick().current(), Vector2::ZERO);
    }

    #[test]
    fn test_move_beyond_boundary_escapes_and_stays_idle() {
        let mut gesture = controller();
        gesture.on_pointer_down(offset(0.0, 0.0));
        gesture.on_pointer_move(offset(30.0, -20.0));
        assert_eq!(gesture.stick().current(), Vector2::new(30.0, -20.0));

        assert_eq!(gesture.on_pointer_move(offset(130.0, 0.0)), GestureOutcome::Escaped);
        assert_eq!(gesture.state(), EngagementState::Idle);
        assert_eq!(gesture.stick().current(), Vector2::ZERO);

        // Coming back inside does not re-engage without a new press
        assert_eq!(gesture.on_pointer_move(offset(20.0, 0.0)), GestureOutcome::Ignored);
        assert_eq!(gesture.state(), EngagementState::Idle);
        assert_eq!(gesture.stick().current(), Vector2::ZERO);
    }

    #[test]
    fn test_scenario_c_press_off_knob_is_ignored() {
        let mut gesture = controller();
        let outcome = gesture.on_pointer_down(offset(80.0, 0.0));
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert!(!outcome.needs_redraw());
        assert_eq!(gesture.state(), EngagementState::Idle);
    }

    #[test]
    fn test_press_on_knob_edge_is_ignored() {
        let mut gesture = controller();
        assert_eq!(gesture.on_pointer_down(offset(50.0, 0.0)), GestureOutcome::Ignored);
        assert_eq!(gesture.on_pointer_down(offset(49.0, 0.0)), GestureOutcome::Engaged);
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut gesture = controller();
        assert_eq!(gesture.on_pointer_move(offset(20.0, 20.0)), GestureOutcome::Ignored);
        assert_eq!(gesture.stick().current(), Vector2::ZERO);
    }

    #[test]
    fn test_second_press_while_dragging_is_ignored() {
        let mut gesture = controller();
        gesture.on_pointer_down(offset(0.0, 0.0));
        gesture.on_pointer_move(offset(10.0, 5.0));

        assert_eq!(gesture.on_pointer_down(offset(10.0, 5.0)), GestureOutcome::Ignored);
        assert_eq!(gesture.state(), EngagementState::Dragging);
        assert_eq!(gesture.stick().current(), Vector2::new(10.0, 5.0));
    }

    #[test]
    fn test_release_while_idle_is_ignored() {
        let mut gesture = controller();
        assert_eq!(gesture.on_pointer_up(offset(0.0, 0.0)), GestureOutcome::Ignored);
    }

    #[test]
    fn test_drag_tracks_last_pointer_not_press_point() {
        let mut gesture = controller();
        gesture.on_pointer_down(offset(0.0, 0.0));
        gesture.on_pointer_move(offset(10.0, 0.0));
        gesture.on_pointer_move(offset(10.0, 15.0));
        assert_eq!(gesture.stick().current(), Vector2::new(10.0, 15.0));
    }

    #[test]
    fn test_knob_is_back_at_centre_after_release() {
        let mut gesture = controller();
        gesture.on_pointer_down(offset(0.0, 0.0));
        gesture.on_pointer_move(offset(60.0, 0.0));
        gesture.on_pointer_up(offset(60.0, 0.0));

        // Back at centre after release, so a press at +60 misses again
        assert_eq!(gesture.on_pointer_down(offset(60.0, 0.0)), GestureOutcome::Ignored);
    }

    #[test]
    fn test_non_finite_samples_are_ignored() {
        let mut gesture = controller();
        gesture.on_pointer_down(offset(0.0, 0.0));
        let outcome = gesture.on_pointer_move(PointerSample::new(f64::NAN, 125.0));
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert_eq!(gesture.state(), EngagementState::Dragging);
        assert_eq!(gesture.stick().current(), Vector2::ZERO);
    }
}
