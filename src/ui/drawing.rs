//! Painter helpers for the joystick widget
//!
//! The whole widget is repainted every frame: background, boundary circle,
//! then the knob and its intensity ring on top.

use egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::config::{ControlConfig, Rgb};
use crate::joystick::{DisplacementVector, RenderSnapshot};

const BOUNDARY_STROKE_WIDTH: f32 = 2.0;
const RING_STROKE_WIDTH: f32 = 3.0;

pub fn to_color32(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.r(), rgb.g(), rgb.b())
}

/// Ring color: green channel carries the feedback intensity
pub fn ring_color(intensity: u8) -> Color32 {
    Color32::from_rgb(0, intensity, 0)
}

/// Screen position of the knob centre for a displacement
///
/// `origin` is the top-left corner of the widget on screen.
pub fn knob_position(origin: Pos2, config: &ControlConfig, displacement: DisplacementVector) -> Pos2 {
    let pixel = config.frame().to_display_space(displacement);
    frame_to_screen(origin, pixel.x, pixel.y)
}

fn frame_to_screen(origin: Pos2, x: f64, y: f64) -> Pos2 {
    egui::pos2(origin.x + x as f32, origin.y + y as f32)
}

/// Paint the full widget for one frame
pub fn draw_widget(painter: &Painter, origin: Pos2, config: &ControlConfig, snapshot: &RenderSnapshot) {
    let side = config.frame_size() as f32;
    let frame_rect = Rect::from_min_size(origin, egui::vec2(side, side));
    painter.rect_filled(frame_rect, 0.0, to_color32(config.frame_colour()));

    let centre = config.frame().centre();
    painter.circle_stroke(
        frame_to_screen(origin, centre.x, centre.y),
        config.control_circle_radius() as f32,
        Stroke::new(BOUNDARY_STROKE_WIDTH, to_color32(config.control_circle_colour())),
    );

    draw_knob(
        painter,
        knob_position(origin, config, snapshot.displacement),
        config.stick_radius() as f32,
        snapshot.intensity,
    );
}

/// Filled black disc with a green ring whose brightness tracks displacement
pub fn draw_knob(painter: &Painter, centre: Pos2, radius: f32, intensity: u8) {
    painter.circle_filled(centre, radius, Color32::BLACK);
    painter.circle_stroke(centre, radius, Stroke::new(RING_STROKE_WIDTH, ring_color(intensity)));
}
