//! Configuration system.
//!
//! Loads simulation configuration from JSON strings/files (file IO left to app).

use serde::{Deserialize, Serialize};

/// Lowest and highest positions of the mouse sensitivity slider.
pub const SENSITIVITY_SLIDER_MIN: u32 = 1;
pub const SENSITIVITY_SLIDER_MAX: u32 = 100;
const SENSITIVITY_SLIDER_SCALE: f64 = 50.0;

/// Root configuration shared by client/server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Fixed simulation tick rate.
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
    /// Capacity of the client send queue / server inbox channel.
    #[serde(default = "default_inbox_capacity")]
    pub inbox_capacity: usize,
    /// Client input settings.
    #[serde(default)]
    pub input: InputSettings,
}

/// Mouse-look settings applied before angles are quantized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    /// Multiplier on raw mouse deltas, in `[0.02, 2.0]`.
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f64,
    #[serde(default)]
    pub invert_mouse_y: bool,
}

fn default_tick_hz() -> u32 {
    64
}

fn default_inbox_capacity() -> usize {
    256
}

fn default_mouse_sensitivity() -> f64 {
    1.0
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
            inbox_capacity: default_inbox_capacity(),
            input: InputSettings::default(),
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: default_mouse_sensitivity(),
            invert_mouse_y: false,
        }
    }
}

impl SimConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Length of one simulation tick in seconds.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_hz.max(1) as f32
    }
}

impl InputSettings {
    /// Maps a settings-slider position to a sensitivity multiplier.
    ///
    /// Out-of-range slider values are clamped to `1..=100`.
    pub fn from_slider(value: u32) -> Self {
        let value = value.clamp(SENSITIVITY_SLIDER_MIN, SENSITIVITY_SLIDER_MAX);
        Self {
            mouse_sensitivity: f64::from(value) / SENSITIVITY_SLIDER_SCALE,
            ..Self::default()
        }
    }

    /// Slider position for the current sensitivity.
    pub fn slider_value(&self) -> u32 {
        let v = (self.mouse_sensitivity * SENSITIVITY_SLIDER_SCALE).round();
        (v as u32).clamp(SENSITIVITY_SLIDER_MIN, SENSITIVITY_SLIDER_MAX)
    }
}
