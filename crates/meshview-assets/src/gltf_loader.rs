use std::collections::HashSet;
use std::path::Path;

use glam::{Quat, Vec3};
use meshview_core::Transform;
use meshview_geometry::{GeometryBuffer, GeometryError, MeshNode, MeshSlot, NodeKey, SceneGraph};
use tracing::{debug, warn};

use crate::error::AssetError;

/// Raw result of importing a glTF file.
pub struct GltfContents {
    pub document: gltf::Document,
    pub buffers: Vec<gltf::buffer::Data>,
}

/// Load a glTF 2.0 file (.gltf or .glb).
pub fn load_gltf(path: &Path) -> Result<GltfContents, AssetError> {
    let (document, buffers, _images) = gltf::import(path)
        .map_err(|e| AssetError::GltfLoadFailed(path.to_path_buf(), e.to_string()))?;
    Ok(GltfContents { document, buffers })
}

/// Load a glTF 2.0 file from memory. External URIs cannot be resolved.
pub fn load_gltf_slice(bytes: &[u8]) -> Result<GltfContents, AssetError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)
        .map_err(|e| AssetError::GltfLoadFailed("<memory>".into(), e.to_string()))?;
    Ok(GltfContents { document, buffers })
}

impl GltfContents {
    /// Rebuild the node hierarchy under a container named `name`.
    ///
    /// Uses the default scene, else the first scene, else every parentless
    /// node. A mesh with one primitive is attached to its node; a mesh with
    /// several gets one child node per primitive.
    ///
    /// Each glTF node is added once. A node reached a second time, through a
    /// cycle or a second parent, is skipped.
    pub fn into_scene(self, name: &str) -> SceneGraph {
        let mut graph = SceneGraph::container(name);
        let roots = self.root_nodes();
        let mut visited = HashSet::new();

        let mut stack: Vec<(gltf::Node<'_>, NodeKey)> =
            roots.into_iter().rev().map(|n| (n, graph.root())).collect();

        while let Some((node, parent)) = stack.pop() {
            if !visited.insert(node.index()) {
                warn!(
                    "glTF '{}': node {} is reachable more than once, skipping",
                    name,
                    node.index()
                );
                continue;
            }
            let key = self.add_node(&mut graph, parent, &node);
            let children: Vec<_> = node.children().collect();
            stack.extend(children.into_iter().rev().map(|child| (child, key)));
        }

        debug!(
            "glTF '{}': {} nodes, {} meshes",
            name,
            graph.len(),
            graph.mesh_buffers().count()
        );
        graph
    }

    fn root_nodes(&self) -> Vec<gltf::Node<'_>> {
        if let Some(scene) = self.document.default_scene().or_else(|| self.document.scenes().next()) {
            return scene.nodes().collect();
        }

        let children: HashSet<usize> = self
            .document
            .nodes()
            .flat_map(|n| n.children().map(|c| c.index()))
            .collect();
        self.document
            .nodes()
            .filter(|n| !children.contains(&n.index()))
            .collect()
    }

    fn add_node(&self, graph: &mut SceneGraph, parent: NodeKey, node: &gltf::Node<'_>) -> NodeKey {
        let (translation, rotation, scale) = node.transform().decomposed();
        let transform = Transform::from_trs(
            Vec3::from(translation),
            Quat::from_array(rotation),
            Vec3::from(scale),
        );

        let node_name = node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index()));
        let mut mesh_node = MeshNode::new().with_name(&node_name).with_transform(transform);

        let Some(mesh) = node.mesh() else {
            return graph.add_child(parent, mesh_node);
        };

        let mut slots: Vec<MeshSlot> = mesh.primitives().map(|p| self.read_primitive(&p)).collect();
        if slots.len() == 1 {
            if let Some(slot) = slots.pop() {
                mesh_node = mesh_node.with_mesh(slot);
            }
            return graph.add_child(parent, mesh_node);
        }

        let key = graph.add_child(parent, mesh_node);
        let mesh_name = mesh.name().unwrap_or(&node_name).to_string();
        for (i, slot) in slots.into_iter().enumerate() {
            graph.add_child(
                key,
                MeshNode::new().with_name(format!("{mesh_name}.{i}")).with_mesh(slot),
            );
        }
        key
    }

    fn read_primitive(&self, primitive: &gltf::Primitive<'_>) -> MeshSlot {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            return MeshSlot::Malformed(GeometryError::NonTriangleTopology(format!(
                "{:?}",
                primitive.mode()
            )));
        }

        let reader = primitive.reader(|buffer| self.buffers.get(buffer.index()).map(|d| &d.0[..]));

        let positions: Option<Vec<[f32; 3]>> = reader.read_positions().map(|iter| iter.collect());
        let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|iter| iter.collect());
        let indices: Option<Vec<u32>> = reader.read_indices().map(|idx| idx.into_u32().collect());

        GeometryBuffer::from_attributes(positions, normals, indices).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshview_geometry::MeshStats;

    /// Two meshes sharing one position accessor (a single triangle):
    /// "tri" is indexed, "pair" has a triangle-list primitive and a line
    /// primitive. Node "parent" holds both mesh nodes.
    const TWO_MESHES: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "parent", "translation": [5.0, 0.0, 0.0], "children": [1, 2] },
            { "name": "tri_node", "mesh": 0 },
            { "name": "pair_node", "mesh": 1 }
        ],
        "meshes": [
            { "name": "tri", "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] },
            { "name": "pair", "primitives": [
                { "attributes": { "POSITION": 0 } },
                { "attributes": { "POSITION": 0 }, "mode": 1 }
            ] }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
        ],
        "buffers": [{
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        }]
    }"#;

    fn scene() -> SceneGraph {
        load_gltf_slice(TWO_MESHES.as_bytes()).unwrap().into_scene("two")
    }

    #[test]
    fn hierarchy_is_preserved() {
        let graph = scene();
        assert_eq!(names(&graph), ["two", "parent", "tri_node", "pair_node", "pair.0", "pair.1"]);

        let parent = graph.find_by_name("parent").unwrap();
        assert_eq!(graph.node(parent).transform.position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn line_primitives_are_malformed() {
        let graph = scene();
        let lines = graph.find_by_name("pair.1").unwrap();
        assert!(matches!(
            graph.node(lines).mesh(),
            Some(MeshSlot::Malformed(GeometryError::NonTriangleTopology(_)))
        ));
    }

    #[test]
    fn stats_over_imported_scene() {
        let stats = MeshStats::from_scene(&scene());
        assert_eq!(stats.mesh_count(), 2);
        assert_eq!(stats.vertex_count(), 6);
        assert_eq!(stats.triangle_count(), 2);
    }

    fn names(graph: &SceneGraph) -> Vec<String> {
        graph
            .pre_order()
            .map(|k| graph.node(k).name().unwrap().to_string())
            .collect()
    }

    #[test]
    fn cyclic_nodes_are_added_once() {
        let doc = r#"{
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": [
                { "name": "a", "children": [1] },
                { "name": "b", "children": [0] }
            ]
        }"#;
        let graph = load_gltf_slice(doc.as_bytes()).unwrap().into_scene("cyc");
        assert_eq!(names(&graph), ["cyc", "a", "b"]);
    }

    #[test]
    fn shared_child_is_added_under_first_parent_only() {
        let doc = r#"{
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0, 1] }],
            "nodes": [
                { "name": "p1", "children": [2] },
                { "name": "p2", "children": [2] },
                { "name": "c" }
            ]
        }"#;
        let graph = load_gltf_slice(doc.as_bytes()).unwrap().into_scene("shared");
        assert_eq!(names(&graph), ["shared", "p1", "c", "p2"]);
        let p2 = graph.find_by_name("p2").unwrap();
        assert!(graph.node(p2).children().is_empty());
    }

    #[test]
    fn invalid_bytes_fail_to_load() {
        assert!(matches!(
            load_gltf_slice(b"not a gltf"),
            Err(AssetError::GltfLoadFailed(_, _))
        ));
    }
}
