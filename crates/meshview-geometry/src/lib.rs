//! meshview Geometry - Mesh statistics, merging and framing
//!
//! Turns a loaded [`SceneGraph`] into what a viewer needs:
//! - [`MeshStats`]: mesh, vertex and triangle counts
//! - a merged, unindexed [`GeometryBuffer`] holding every mesh
//! - a [`BoundingSphere`] and the [`Normalization`] that frames it in a unit
//!   sphere at the origin
//!
//! Everything here is synchronous and pure; loaders and renderers live in
//! other crates.

mod bounds;
mod buffer;
mod edges;
mod error;
mod merge;
mod normals;
mod pipeline;
mod scene;
pub mod shapes;
mod stats;

pub use bounds::{bounding_box, frame, BoundingSphere, Normalization};
pub use buffer::GeometryBuffer;
pub use edges::{edge_segments, extract_edges, extract_edges_welded, unique_points};
pub use error::GeometryError;
pub use merge::merge;
pub use normals::compute_vertex_normals;
pub use pipeline::{ProcessOptions, ProcessedModel};
pub use scene::{MeshLeaves, MeshNode, MeshSlot, NodeKey, PreOrder, SceneGraph};
pub use stats::MeshStats;
