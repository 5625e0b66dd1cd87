//! meshview Assets - Model loading
//!
//! Reads glTF 2.0, Wavefront OBJ and STL files into a
//! [`meshview_geometry::SceneGraph`], and runs those loads in the background
//! with last-request-wins semantics.

mod error;
mod format;
mod gltf_loader;
mod handle;
mod loader;
mod model;
mod obj_loader;
mod stl_loader;

pub use error::AssetError;
pub use format::ModelFormat;
pub use gltf_loader::{load_gltf, load_gltf_slice, GltfContents};
pub use handle::LoadId;
pub use loader::{LoadOutcome, ModelLoader};
pub use model::{load_model, LoadedModel};
pub use obj_loader::{load_obj, load_obj_reader, obj_scene};
pub use stl_loader::{load_stl, parse_stl, StlError};
