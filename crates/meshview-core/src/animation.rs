//! Periodic transform animation
//!
//! These tasks mutate a node's local [`Transform`] once per frame. They never
//! touch geometry, so statistics and framing are unaffected by them.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Transform;

/// Parameters for [`Oscillator`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    /// Seconds between random translation jumps
    pub translation_interval: f32,
    /// Minimum jump distance
    pub min_distance: f32,
    /// Maximum jump distance
    pub max_distance: f32,
    /// Rotation axis (local space)
    pub rotation_axis: Vec3,
    /// Rotation speed in degrees per second
    pub rotation_speed: f32,
    /// Scale factor around which the scale oscillates
    pub scale_base: f32,
    /// Amplitude of the scale oscillation
    pub scale_amplitude: f32,
    /// Scale oscillation frequency in radians per second
    pub scale_frequency: f32,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self {
            translation_interval: 2.0,
            min_distance: 0.5,
            max_distance: 2.0,
            rotation_axis: Vec3::Y,
            rotation_speed: 90.0,
            scale_base: 1.0,
            scale_amplitude: 0.25,
            scale_frequency: 1.0,
        }
    }
}

/// Random jumps along X or Y, constant spin, and a pulsing uniform scale.
#[derive(Debug, Clone)]
pub struct Oscillator {
    config: OscillatorConfig,
    initial_scale: Vec3,
    translation_timer: f32,
}

impl Oscillator {
    /// Create an oscillator anchored at the transform's current scale
    pub fn new(config: OscillatorConfig, transform: &Transform) -> Self {
        let translation_timer = config.translation_interval;
        Self {
            config,
            initial_scale: transform.scale,
            translation_timer,
        }
    }

    pub fn config(&self) -> &OscillatorConfig {
        &self.config
    }

    /// Advance by `delta` seconds; `elapsed` is the total animation time
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        transform: &mut Transform,
        delta: f32,
        elapsed: f32,
        rng: &mut R,
    ) {
        self.apply_random_translation(transform, delta, rng);
        self.apply_rotation(transform, delta);
        self.apply_scale(transform, elapsed);
    }

    fn apply_random_translation<R: Rng + ?Sized>(
        &mut self,
        transform: &mut Transform,
        delta: f32,
        rng: &mut R,
    ) {
        self.translation_timer -= delta;
        if self.translation_timer > 0.0 {
            return;
        }

        let (min, max) = (self.config.min_distance, self.config.max_distance);
        let distance = if max > min { rng.gen_range(min..max) } else { min };
        let direction = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
        let offset = if rng.gen_bool(0.5) {
            Vec3::new(distance * direction, 0.0, 0.0)
        } else {
            Vec3::new(0.0, distance * direction, 0.0)
        };

        transform.translate(offset);
        self.translation_timer = self.config.translation_interval;
    }

    fn apply_rotation(&self, transform: &mut Transform, delta: f32) {
        let axis = self.config.rotation_axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let angle = (self.config.rotation_speed * delta).to_radians();
        transform.rotate_local(Quat::from_axis_angle(axis, angle));
    }

    fn apply_scale(&self, transform: &mut Transform, elapsed: f32) {
        let factor = self.config.scale_base
            + (elapsed * self.config.scale_frequency).sin() * self.config.scale_amplitude;
        transform.scale = self.initial_scale * factor;
    }
}

/// Parameters for [`Sway`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwayConfig {
    pub amplitude: f32,
    pub speed: f32,
}

impl Default for SwayConfig {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            speed: 1.0,
        }
    }
}

/// Sinusoidal sway along local X around the initial position.
///
/// Remembers the transform it was created from so it can be reset.
#[derive(Debug, Clone)]
pub struct Sway {
    config: SwayConfig,
    initial: Transform,
    enabled: bool,
}

impl Sway {
    pub fn new(config: SwayConfig, transform: &Transform) -> Self {
        Self {
            config,
            initial: *transform,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn tick(&self, transform: &mut Transform, elapsed: f32) {
        if !self.enabled {
            return;
        }
        let t = elapsed * self.config.speed;
        transform.position.x = self.initial.position.x + t.sin() * self.config.amplitude;
    }

    /// Disable the sway and restore the initial transform
    pub fn reset(&mut self, transform: &mut Transform) {
        self.enabled = false;
        *transform = self.initial;
    }
}
