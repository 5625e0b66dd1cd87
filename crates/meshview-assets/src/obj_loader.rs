use std::io::BufRead;
use std::path::Path;

use meshview_geometry::{GeometryBuffer, MeshNode, SceneGraph};

use crate::error::AssetError;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load the models of a Wavefront OBJ file. Materials are ignored.
pub fn load_obj(path: &Path) -> Result<Vec<tobj::Model>, AssetError> {
    let (models, _materials) = tobj::load_obj(path, &load_options())
        .map_err(|e| AssetError::ObjLoadFailed(path.to_path_buf(), e.to_string()))?;
    Ok(models)
}

/// Load OBJ models from an in-memory reader. `mtllib` references are skipped.
pub fn load_obj_reader(reader: &mut impl BufRead) -> Result<Vec<tobj::Model>, AssetError> {
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Err(tobj::LoadError::OpenFileFailed))
            .map_err(|e| AssetError::ObjLoadFailed("<memory>".into(), e.to_string()))?;
    Ok(models)
}

/// One child node per OBJ model, under a container named `name`.
pub fn obj_scene(name: &str, models: Vec<tobj::Model>) -> SceneGraph {
    let mut graph = SceneGraph::container(name);
    let root = graph.root();

    for model in models {
        let mesh = model.mesh;
        let slot = GeometryBuffer::from_flat(&mesh.positions, &mesh.normals, &mesh.indices);
        graph.add_child(root, MeshNode::new().with_name(model.name).with_mesh(slot));
    }
    graph
}
