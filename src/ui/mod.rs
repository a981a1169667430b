//! Joystick window - native egui surface for the virtual stick
//!
//! Renders the widget and feeds pointer input to the joystick core. Blocks
//! the calling thread (which must be the main thread on most platforms)
//! until the window closes.

mod app;
pub mod drawing;

pub use app::JoystickApp;

use anyhow::Result;
use tokio::sync::watch;

use crate::joystick::JoystickHandle;

/// Window title
pub const WINDOW_TITLE: &str = "joystick";

/// Open the joystick window and run until it is closed.
///
/// The window closes on Esc, on the window's close button, or when
/// `shutdown` flips to `true`.
pub fn run_window(joystick: JoystickHandle, shutdown: watch::Receiver<bool>) -> Result<()> {
    let side = joystick.config().frame_size() as f32;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([side, side])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |_cc| Ok(Box::new(JoystickApp::new(joystick, shutdown)))),
    )
    .map_err(|e| anyhow::anyhow!("Joystick window failed: {}", e))
}
