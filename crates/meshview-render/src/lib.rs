//! meshview Render - View modes and display primitives
//!
//! Converts a [`meshview_geometry::ProcessedModel`] into bytemuck-castable
//! vertex arrays for the active [`ViewMode`]. No GPU code lives here.

pub mod display;
pub mod vertex;
pub mod view_mode;

pub use display::{DisplayOptions, DisplayPrimitive};
pub use vertex::{LineVertex, PointVertex, Vertex3D};
pub use view_mode::{ViewMode, ViewModeSelector};
