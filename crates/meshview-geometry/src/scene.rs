//! Mesh scene graph
//!
//! The graph is an arena: [`SceneGraph`] owns every [`MeshNode`], and nodes
//! refer to their children and parent by [`NodeKey`]. The parent link is a
//! plain index and owns nothing. Nodes can only be appended under an existing
//! node, so the graph is always a tree rooted at [`SceneGraph::root`].

use glam::Mat4;
use meshview_core::{NodeId, Transform};
use tracing::debug;

use crate::buffer::GeometryBuffer;
use crate::error::GeometryError;

/// Index of a node inside its [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Mesh data attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshSlot {
    Valid(GeometryBuffer),
    /// The node claims a mesh but its data was rejected.
    Malformed(GeometryError),
}

impl From<Result<GeometryBuffer, GeometryError>> for MeshSlot {
    fn from(result: Result<GeometryBuffer, GeometryError>) -> Self {
        match result {
            Ok(buffer) => MeshSlot::Valid(buffer),
            Err(err) => MeshSlot::Malformed(err),
        }
    }
}

impl From<GeometryBuffer> for MeshSlot {
    fn from(buffer: GeometryBuffer) -> Self {
        MeshSlot::Valid(buffer)
    }
}

/// A node in the mesh scene graph.
#[derive(Debug, Clone)]
pub struct MeshNode {
    id: NodeId,
    name: Option<String>,
    /// Local transform relative to the parent.
    pub transform: Transform,
    mesh: Option<MeshSlot>,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl Default for MeshNode {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshNode {
    /// Creates a geometry-less node with identity transform.
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            name: None,
            transform: Transform::IDENTITY,
            mesh: None,
            parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: impl Into<MeshSlot>) -> Self {
        self.mesh = Some(mesh.into());
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mesh(&self) -> Option<&MeshSlot> {
        self.mesh.as_ref()
    }

    /// The node's geometry, if it carries a well-formed mesh.
    pub fn geometry(&self) -> Option<&GeometryBuffer> {
        match &self.mesh {
            Some(MeshSlot::Valid(buffer)) => Some(buffer),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

/// A tree of [`MeshNode`]s, built wholesale when a model finishes loading.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<MeshNode>,
}

impl SceneGraph {
    /// Create a graph with the given root node.
    pub fn new(root: MeshNode) -> Self {
        let mut root = root;
        root.parent = None;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    /// Create a graph whose root is an empty named container.
    pub fn container(name: impl Into<String>) -> Self {
        Self::new(MeshNode::new().with_name(name))
    }

    pub fn root(&self) -> NodeKey {
        NodeKey(0)
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// # Panics
    /// If `parent` does not belong to this graph.
    pub fn add_child(&mut self, parent: NodeKey, node: MeshNode) -> NodeKey {
        assert!(parent.0 < self.nodes.len(), "parent key out of range");

        let key = NodeKey(self.nodes.len());
        let mut node = node;
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(key);
        key
    }

    pub fn node(&self, key: NodeKey) -> &MeshNode {
        &self.nodes[key.0]
    }

    pub fn node_mut(&mut self, key: NodeKey) -> &mut MeshNode {
        &mut self.nodes[key.0]
    }

    pub fn get(&self, key: NodeKey) -> Option<&MeshNode> {
        self.nodes.get(key.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the first node (pre-order) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.pre_order().find(|&key| self.node(key).name() == Some(name))
    }

    /// Local-to-world matrix, composed through the parent chain.
    pub fn world_transform(&self, key: NodeKey) -> Mat4 {
        let mut matrix = self.node(key).transform.matrix();
        let mut current = self.node(key).parent;
        while let Some(parent) = current {
            let node = self.node(parent);
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// Every node key in pre-order, starting at the root.
    pub fn pre_order(&self) -> PreOrder<'_> {
        self.pre_order_from(self.root())
    }

    /// Every node key in the sub-tree rooted at `start`, in pre-order.
    pub fn pre_order_from(&self, start: NodeKey) -> PreOrder<'_> {
        PreOrder {
            graph: self,
            stack: vec![start],
        }
    }

    /// Well-formed geometry buffers of every mesh-bearing node, in pre-order.
    pub fn mesh_buffers(&self) -> impl Iterator<Item = &GeometryBuffer> + '_ {
        self.mesh_leaves().map(|(_, buffer)| buffer)
    }

    /// Like [`SceneGraph::mesh_buffers`], paired with the owning node.
    pub fn mesh_leaves(&self) -> MeshLeaves<'_> {
        self.mesh_leaves_from(self.root())
    }

    pub fn mesh_leaves_from(&self, start: NodeKey) -> MeshLeaves<'_> {
        MeshLeaves {
            nodes: self.pre_order_from(start),
        }
    }
}

/// Pre-order walk with an explicit stack.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeKey>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.stack.pop()?;
        let node = self.graph.node(key);
        self.stack.extend(node.children.iter().rev().copied());
        Some(key)
    }
}

/// Mesh-bearing nodes in pre-order; malformed meshes are skipped.
#[derive(Debug, Clone)]
pub struct MeshLeaves<'a> {
    nodes: PreOrder<'a>,
}

impl<'a> Iterator for MeshLeaves<'a> {
    type Item = (NodeKey, &'a GeometryBuffer);

    fn next(&mut self) -> Option<Self::Item> {
        let graph = self.nodes.graph;
        for key in self.nodes.by_ref() {
            let node = graph.node(key);
            match &node.mesh {
                Some(MeshSlot::Valid(buffer)) => return Some((key, buffer)),
                Some(MeshSlot::Malformed(err)) => {
                    debug!(
                        "Skipping malformed mesh on node {} ({}): {}",
                        node.name().unwrap_or("unnamed"),
                        node.id,
                        err
                    );
                }
                None => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle(x: f32) -> GeometryBuffer {
        GeometryBuffer::from_positions(vec![[x, 0.0, 0.0], [x + 1.0, 0.0, 0.0], [x, 1.0, 0.0]])
    }

    /// root
    /// ├── a (mesh 0)
    /// │   ├── a1 (malformed)
    /// │   └── a2 (mesh 1)
    /// │       └── a2x (mesh 2)
    /// └── b (mesh 3)
    fn sample() -> SceneGraph {
        let mut graph = SceneGraph::container("root");
        let root = graph.root();
        let a = graph.add_child(root, MeshNode::new().with_name("a").with_mesh(triangle(0.0)));
        graph.add_child(
            a,
            MeshNode::new()
                .with_name("a1")
                .with_mesh(MeshSlot::Malformed(GeometryError::MissingPositions)),
        );
        let a2 = graph.add_child(a, MeshNode::new().with_name("a2").with_mesh(triangle(1.0)));
        graph.add_child(a2, MeshNode::new().with_name("a2x").with_mesh(triangle(2.0)));
        graph.add_child(root, MeshNode::new().with_name("b").with_mesh(triangle(3.0)));
        graph
    }

    #[test]
    fn pre_order_visits_parents_before_children_in_insertion_order() {
        let graph = sample();
        let names: Vec<_> = graph
            .pre_order()
            .map(|key| graph.node(key).name().unwrap())
            .collect();
        assert_eq!(names, ["root", "a", "a1", "a2", "a2x", "b"]);
    }

    #[test]
    fn mesh_buffers_skip_malformed_and_containers() {
        let graph = sample();
        let xs: Vec<f32> = graph.mesh_buffers().map(|b| b.positions()[0][0]).collect();
        assert_eq!(xs, [0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn traversal_is_restartable_and_deterministic() {
        let graph = sample();
        let first: Vec<_> = graph.mesh_leaves().map(|(key, _)| key).collect();
        let second: Vec<_> = graph.mesh_leaves().map(|(key, _)| key).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn sub_tree_traversal() {
        let graph = sample();
        let a2 = graph.find_by_name("a2").unwrap();
        assert_eq!(graph.mesh_leaves_from(a2).count(), 2);
    }

    #[test]
    fn geometry_less_root_yields_nothing() {
        let graph = SceneGraph::container("empty");
        assert_eq!(graph.mesh_buffers().count(), 0);
    }

    #[test]
    fn parent_links_point_back_up() {
        let graph = sample();
        let a2x = graph.find_by_name("a2x").unwrap();
        let a2 = graph.node(a2x).parent().unwrap();
        assert_eq!(graph.node(a2).name(), Some("a2"));
        assert_eq!(graph.node(graph.root()).parent(), None);
    }

    #[test]
    fn world_transform_composes_parents() {
        let mut graph = SceneGraph::new(
            MeshNode::new().with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))),
        );
        let root = graph.root();
        let child = graph.add_child(
            root,
            MeshNode::new().with_transform(Transform::from_position(Vec3::new(0.0, 2.0, 0.0))),
        );
        let p = graph.world_transform(child).transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn added_node_cannot_bring_foreign_links() {
        let graph = sample();
        let stray = graph.node(graph.find_by_name("a").unwrap()).clone();

        let mut other = SceneGraph::container("other");
        let key = other.add_child(other.root(), stray);
        assert!(other.node(key).children().is_empty());
        assert_eq!(other.node(key).parent(), Some(other.root()));
    }
}
