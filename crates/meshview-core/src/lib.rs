//! meshview Core - Shared types and utilities for meshview
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Mathematical primitives (re-exported from glam)
//! - Transform and identity types for scene nodes
//! - Frame time tracking
//! - Periodic transform animation, kept apart from the geometry pipeline

pub mod animation;
pub mod time;
pub mod types;

pub use glam::{DVec3, Mat4, Quat, Vec3};
pub use animation::{Oscillator, OscillatorConfig, Sway, SwayConfig};
pub use time::{GameTime, TimeConfig};
pub use types::{Color, NodeId, Transform};
