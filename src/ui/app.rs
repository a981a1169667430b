//! eframe application hosting the joystick widget.
//!
//! Each frame the app first forwards the pending pointer events to the
//! joystick, then takes a render snapshot and paints it, so a frame always
//! shows the state after every event that arrived before it.

use egui::{Event, PointerButton, Pos2};
use tokio::sync::watch;
use tracing::{debug, info};

use super::drawing::draw_widget;
use crate::joystick::{JoystickHandle, PointerEventSink, PointerSample};

/// Window-side driver of the joystick
pub struct JoystickApp {
    joystick: JoystickHandle,
    shutdown: watch::Receiver<bool>,
    closing: bool,
}

impl JoystickApp {
    pub fn new(joystick: JoystickHandle, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            joystick,
            shutdown,
            closing: false,
        }
    }

    /// Translate egui input events into joystick pointer events.
    ///
    /// `origin` is the widget's top-left corner on screen; samples are sent
    /// in widget-local pixels.
    fn forward_pointer_events(&mut self, events: &[Event], origin: Pos2) {
        for event in events {
            let outcome = match event {
                Event::PointerMoved(pos) => self.joystick.on_pointer_move(local_sample(*pos, origin)),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    ..
                } => self.joystick.on_pointer_down(local_sample(*pos, origin)),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: false,
                    ..
                } => self.joystick.on_pointer_up(local_sample(*pos, origin)),
                // Release is position-independent; a lost pointer or focus ends the drag
                Event::PointerGone | Event::WindowFocused(false) => {
                    self.joystick.on_pointer_up(PointerSample::new(0.0, 0.0))
                }
                _ => continue,
            };

            if outcome.needs_redraw() {
                debug!(?outcome, "Joystick changed");
            }
        }
    }
}

fn local_sample(pos: Pos2, origin: Pos2) -> PointerSample {
    PointerSample::new(f64::from(pos.x - origin.x), f64::from(pos.y - origin.y))
}

impl eframe::App for JoystickApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.closing {
            let escape = ctx.input(|i| i.key_pressed(egui::Key::Escape));
            let external = *self.shutdown.borrow();
            if escape || external {
                info!("Closing joystick window ({})", if escape { "Esc" } else { "shutdown signal" });
                self.closing = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let side = self.joystick.config().frame_size() as f32;
                let (response, painter) =
                    ui.allocate_painter(egui::Vec2::splat(side), egui::Sense::click_and_drag());
                let origin = response.rect.min;

                let events = ctx.input(|i| i.events.clone());
                self.forward_pointer_events(&events, origin);

                let snapshot = self.joystick.render_snapshot();
                draw_widget(&painter, origin, self.joystick.config(), &snapshot);
            });

        // Repaint at display refresh so the knob and the shutdown check stay live
        ctx.request_repaint();
    }
}
