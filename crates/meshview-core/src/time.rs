//! Frame time tracking for the viewer
//!
//! Drives the periodic transform animations with a clamped, scalable delta.

use serde::{Deserialize, Serialize};

/// Configuration for frame time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many animation seconds pass per real second
    pub time_scale: f32,
    /// Maximum delta time, so a stalled frame does not jump animations
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Frame time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Scaled time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Clamped but unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether time is paused
    pub paused: bool,
}

impl GameTime {
    /// Create a new frame clock with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }

    /// Scaled elapsed time as `f32`, for animation phase
    pub fn elapsed(&self) -> f32 {
        self.total_time as f32
    }

    /// Pause the clock
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}
