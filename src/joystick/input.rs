//! Event-ingestion interface for UI backends

use super::geometry::PointerSample;
use super::gesture::GestureOutcome;

/// Receives pointer events in display-space pixels.
///
/// Any windowing or input backend can drive the joystick through these three
/// calls. Implementors never fail: events that do not apply are reported as
/// [`GestureOutcome::Ignored`].
pub trait PointerEventSink {
    /// Primary button pressed
    fn on_pointer_down(&mut self, p: PointerSample) -> GestureOutcome;

    /// Pointer moved (button state is irrelevant)
    fn on_pointer_move(&mut self, p: PointerSample) -> GestureOutcome;

    /// Primary button released
    fn on_pointer_up(&mut self, p: PointerSample) -> GestureOutcome;
}
