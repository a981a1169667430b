//! Configuration management for Stick GW
//!
//! Handles loading and validating the YAML configuration file. Every key has a
//! default, so an absent file (or an empty one) yields the stock 251 px widget
//! publishing at 60 Hz.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

use crate::error::JoystickError;
use crate::joystick::geometry::{DisplayFrame, PointerSample};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub joystick: JoystickConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
}

/// Widget geometry, colors and output scaling as written in the file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JoystickConfig {
    /// Side length of the square window, in pixels
    #[serde(default = "default_frame_size")]
    pub frame_size: u32,
    /// Widget centre in window pixels
    #[serde(default = "default_frame_centre")]
    pub frame_centre: [u32; 2],
    #[serde(default = "default_frame_colour")]
    pub frame_colour: Rgb,
    /// Outer boundary; the pointer loses the stick on or beyond it
    #[serde(default = "default_control_circle_radius")]
    pub control_circle_radius: f64,
    #[serde(default = "default_control_circle_colour")]
    pub control_circle_colour: Rgb,
    #[serde(default = "default_stick_radius")]
    pub stick_radius: f64,
    /// Green channel of the knob ring when the stick is at rest
    #[serde(default = "default_min_stick_intensity")]
    pub min_stick_intensity: u8,
    /// Output magnitude on each axis at full travel
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            frame_size: default_frame_size(),
            frame_centre: default_frame_centre(),
            frame_colour: default_frame_colour(),
            control_circle_radius: default_control_circle_radius(),
            control_circle_colour: default_control_circle_colour(),
            stick_radius: default_stick_radius(),
            min_stick_intensity: default_min_stick_intensity(),
            max_speed: default_max_speed(),
        }
    }
}

/// RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }
}

/// Slowest accepted publish cadence, in ticks per second
pub const MIN_RATE_HZ: f64 = 0.1;
/// Fastest accepted publish cadence, in ticks per second
pub const MAX_RATE_HZ: f64 = 1000.0;

/// Where velocity commands go
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublisherConfig {
    #[serde(default = "default_publisher_kind")]
    pub kind: PublisherKind,
    /// Publish cadence, in ticks per second
    #[serde(default = "default_rate_hz")]
    pub rate_hz: f64,
    /// Topic carried in every message envelope
    #[serde(default = "default_topic")]
    pub topic: String,
    /// `host:port` destination, required for the `udp` publisher
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_target: Option<String>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            kind: default_publisher_kind(),
            rate_hz: default_rate_hz(),
            topic: default_topic(),
            udp_target: None,
        }
    }
}

/// Publisher backend
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublisherKind {
    Console,
    Json,
    Udp,
}

/// Validated, immutable joystick settings shared by every component.
///
/// Built once at startup through [`ControlConfig::new`]; there is no way to
/// change it afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlConfig {
    frame_size: u32,
    frame: DisplayFrame,
    frame_colour: Rgb,
    control_circle_radius: f64,
    control_circle_colour: Rgb,
    stick_radius: f64,
    min_intensity: u8,
    max_output: f64,
}

impl ControlConfig {
    /// Validate raw settings into a consistent geometry.
    ///
    /// Rejects non-positive or non-finite radii, a stick that does not fit
    /// inside the boundary circle, a non-positive maximum output, an empty
    /// frame, and a centre outside the frame.
    pub fn new(settings: &JoystickConfig) -> Result<Self, JoystickError> {
        if settings.frame_size == 0 {
            return Err(JoystickError::invalid("frame_size", "must be at least 1 pixel"));
        }

        let [cx, cy] = settings.frame_centre;
        if cx >= settings.frame_size || cy >= settings.frame_size {
            return Err(JoystickError::invalid(
                "frame_centre",
                format!(
                    "({}, {}) lies outside the {}x{} frame",
                    cx, cy, settings.frame_size, settings.frame_size
                ),
            ));
        }

        check_positive("control_circle_radius", settings.control_circle_radius)?;
        check_positive("stick_radius", settings.stick_radius)?;
        check_positive("max_speed", settings.max_speed)?;

        if settings.stick_radius >= settings.control_circle_radius {
            return Err(JoystickError::invalid(
                "stick_radius",
                format!(
                    "({}) must be smaller than control_circle_radius ({})",
                    settings.stick_radius, settings.control_circle_radius
                ),
            ));
        }

        let radius = settings.control_circle_radius;
        let fits = [cx, cy].iter().all(|&c| {
            let c = f64::from(c);
            c - radius >= 0.0 && c + radius < f64::from(settings.frame_size)
        });
        if !fits {
            warn!(
                "Control circle (radius {}) extends past the {}x{} frame; escapes near the edge may be missed",
                settings.control_circle_radius, settings.frame_size, settings.frame_size
            );
        }

        Ok(Self {
            frame_size: settings.frame_size,
            frame: DisplayFrame::new(PointerSample::new(f64::from(cx), f64::from(cy))),
            frame_colour: settings.frame_colour,
            control_circle_radius: settings.control_circle_radius,
            control_circle_colour: settings.control_circle_colour,
            stick_radius: settings.stick_radius,
            min_intensity: settings.min_stick_intensity,
            max_output: settings.max_speed,
        })
    }

    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }

    pub fn frame(&self) -> &DisplayFrame {
        &self.frame
    }

    pub fn frame_colour(&self) -> Rgb {
        self.frame_colour
    }

    pub fn control_circle_radius(&self) -> f64 {
        self.control_circle_radius
    }

    pub fn control_circle_colour(&self) -> Rgb {
        self.control_circle_colour
    }

    pub fn stick_radius(&self) -> f64 {
        self.stick_radius
    }

    pub fn min_intensity(&self) -> u8 {
        self.min_intensity
    }

    pub fn max_output(&self) -> f64 {
        self.max_output
    }

    /// Furthest the stick centre may travel from the widget centre
    pub fn travel_limit(&self) -> f64 {
        self.control_circle_radius - self.stick_radius
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), JoystickError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(JoystickError::invalid(
            field,
            format!("must be a positive finite number (got {})", value),
        ));
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file falls back to defaults; a file that exists but cannot be
    /// read or parsed is an error.
    pub async fn load(path: &str) -> Result<Self> {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Config file {} not found, using built-in defaults", path);
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read config file: {}", path));
            }
        };

        Self::from_yaml(&contents).with_context(|| format!("Failed to parse YAML config: {}", path))
    }

    /// Parse configuration from YAML text (empty text yields defaults)
    pub fn from_yaml(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Validate configuration and derive the immutable joystick settings
    pub fn validate(&self) -> Result<ControlConfig> {
        let control = ControlConfig::new(&self.joystick)?;

        let rate = self.publisher.rate_hz;
        if !(MIN_RATE_HZ..=MAX_RATE_HZ).contains(&rate) {
            anyhow::bail!(
                "publisher.rate_hz must be between {} and {} (got {})",
                MIN_RATE_HZ,
                MAX_RATE_HZ,
                rate
            );
        }

        if self.publisher.topic.is_empty() {
            anyhow::bail!("publisher.topic cannot be empty");
        }

        if self.publisher.kind == PublisherKind::Udp && self.publisher.udp_target.is_none() {
            anyhow::bail!("publisher.udp_target is required when publisher.kind is 'udp'");
        }

        Ok(control)
    }
}

// Default value functions
fn default_frame_size() -> u32 { 251 }
fn default_frame_centre() -> [u32; 2] { [125, 125] }
fn default_frame_colour() -> Rgb { Rgb([50, 50, 50]) }
fn default_control_circle_radius() -> f64 { 120.0 }
fn default_control_circle_colour() -> Rgb { Rgb([255, 0, 0]) }
fn default_stick_radius() -> f64 { 50.0 }
fn default_min_stick_intensity() -> u8 { 60 }
fn default_max_speed() -> f64 { 5.0 }
fn default_publisher_kind() -> PublisherKind { PublisherKind::Console }
fn default_rate_hz() -> f64 { 60.0 }
fn default_topic() -> String { "/turtle1/cmd_vel".to_string() }
