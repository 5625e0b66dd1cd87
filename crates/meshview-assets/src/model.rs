use std::path::Path;

use meshview_geometry::{GeometryBuffer, MeshNode, SceneGraph};
use tracing::info;

use crate::error::AssetError;
use crate::format::ModelFormat;
use crate::gltf_loader::{self, GltfContents};
use crate::obj_loader;
use crate::stl_loader;

/// A parsed model file, before it is turned into a [`SceneGraph`].
pub enum LoadedModel {
    Gltf(GltfContents),
    Obj(Vec<tobj::Model>),
    Stl(GeometryBuffer),
}

impl LoadedModel {
    /// Parse `path` with the adapter matching its extension.
    pub fn read(path: &Path) -> Result<Self, AssetError> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }

        match ModelFormat::from_path(path)? {
            ModelFormat::Gltf => gltf_loader::load_gltf(path).map(Self::Gltf),
            ModelFormat::Obj => obj_loader::load_obj(path).map(Self::Obj),
            ModelFormat::Stl => stl_loader::load_stl(path).map(Self::Stl),
        }
    }

    /// Parse in-memory bytes as `format`. glTF buffers must be embedded.
    pub fn parse(format: ModelFormat, mut bytes: &[u8]) -> Result<Self, AssetError> {
        match format {
            ModelFormat::Gltf => gltf_loader::load_gltf_slice(bytes).map(Self::Gltf),
            ModelFormat::Obj => obj_loader::load_obj_reader(&mut bytes).map(Self::Obj),
            ModelFormat::Stl => stl_loader::parse_stl(bytes)
                .map(Self::Stl)
                .map_err(|e| AssetError::StlParseFailed("<memory>".into(), e.to_string())),
        }
    }

    pub fn format(&self) -> ModelFormat {
        match self {
            Self::Gltf(_) => ModelFormat::Gltf,
            Self::Obj(_) => ModelFormat::Obj,
            Self::Stl(_) => ModelFormat::Stl,
        }
    }

    /// Build the scene, rooted at a container named `name`.
    pub fn into_scene(self, name: &str) -> SceneGraph {
        match self {
            Self::Gltf(contents) => contents.into_scene(name),
            Self::Obj(models) => obj_loader::obj_scene(name, models),
            Self::Stl(buffer) => {
                let mut graph = SceneGraph::container(name);
                let root = graph.root();
                graph.add_child(root, MeshNode::new().with_name(name).with_mesh(buffer));
                graph
            }
        }
    }
}

/// Load any supported model file into a scene graph named after the file.
pub fn load_model(path: &Path) -> Result<SceneGraph, AssetError> {
    let loaded = LoadedModel::read(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model")
        .to_string();

    info!("Loaded {} model: {}", loaded.format().name(), path.display());
    Ok(loaded.into_scene(&name))
}
