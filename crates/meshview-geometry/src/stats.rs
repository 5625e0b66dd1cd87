use std::fmt;

use crate::buffer::GeometryBuffer;
use crate::scene::SceneGraph;

/// Aggregate counts over a set of meshes.
///
/// Always derived from geometry; there is no way to edit the counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MeshStats {
    mesh_count: u64,
    vertex_count: u64,
    triangle_count: u64,
}

impl MeshStats {
    /// Sum counts over `buffers`.
    ///
    /// Triangles are summed as real numbers and rounded once at the end, so
    /// many sub-meshes with ragged index counts do not compound rounding error.
    pub fn accumulate<'a>(buffers: impl IntoIterator<Item = &'a GeometryBuffer>) -> Self {
        let mut mesh_count = 0u64;
        let mut vertex_count = 0u64;
        let mut triangles = 0.0f64;

        for buffer in buffers {
            mesh_count += 1;
            vertex_count += buffer.vertex_count() as u64;
            triangles += buffer.triangle_estimate();
        }

        Self {
            mesh_count,
            vertex_count,
            triangle_count: triangles.round() as u64,
        }
    }

    /// Counts over every well-formed mesh in `scene`.
    pub fn from_scene(scene: &SceneGraph) -> Self {
        Self::accumulate(scene.mesh_buffers())
    }

    pub fn mesh_count(&self) -> u64 {
        self.mesh_count
    }

    pub fn vertex_count(&self) -> u64 {
        self.vertex_count
    }

    pub fn triangle_count(&self) -> u64 {
        self.triangle_count
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "meshes: {}, vertices: {}, triangles: {}",
            self.mesh_count, self.vertex_count, self.triangle_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MeshNode, MeshSlot};
    use crate::GeometryError;

    fn indexed(vertices: usize, indices: Vec<u32>) -> GeometryBuffer {
        GeometryBuffer::new(vec![[0.0; 3]; vertices], None, Some(indices)).unwrap()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let stats = MeshStats::accumulate(std::iter::empty());
        assert_eq!(stats, MeshStats::default());
        assert_eq!(stats.to_string(), "meshes: 0, vertices: 0, triangles: 0");
    }

    #[test]
    fn vertex_count_sums_position_counts() {
        let buffers = [
            GeometryBuffer::from_positions(vec![[0.0; 3]; 9]),
            indexed(4, vec![0, 1, 2, 0, 2, 3]),
            GeometryBuffer::from_positions(vec![[0.0; 3]; 3]),
        ];
        let stats = MeshStats::accumulate(&buffers);
        assert_eq!(stats.mesh_count(), 3);
        assert_eq!(stats.vertex_count(), 16);
        assert_eq!(stats.triangle_count(), 3 + 2 + 1);
    }

    #[test]
    fn ragged_index_counts_round_once_at_the_end() {
        // Each mesh holds 4/3 triangles. Rounding per mesh would give 3,
        // rounding the sum gives round(4.0) = 4.
        let buffers: Vec<_> = (0..3).map(|_| indexed(3, vec![0, 1, 2, 0])).collect();
        assert_eq!(MeshStats::accumulate(&buffers).triangle_count(), 4);
    }

    #[test]
    fn non_indexed_fractions_also_accumulate() {
        // 4 positions each: 4/3 triangles per mesh, 8/3 total, rounds to 3.
        let buffers: Vec<_> = (0..2)
            .map(|_| GeometryBuffer::from_positions(vec![[0.0; 3]; 4]))
            .collect();
        assert_eq!(MeshStats::accumulate(&buffers).triangle_count(), 3);
    }

    #[test]
    fn scene_stats_skip_malformed_meshes() {
        let mut scene = SceneGraph::container("root");
        let root = scene.root();
        scene.add_child(
            root,
            MeshNode::new().with_mesh(GeometryBuffer::from_positions(vec![[0.0; 3]; 6])),
        );
        scene.add_child(
            root,
            MeshNode::new().with_mesh(MeshSlot::Malformed(GeometryError::MissingPositions)),
        );
        let stats = MeshStats::from_scene(&scene);
        assert_eq!(stats.mesh_count(), 1);
        assert_eq!(stats.vertex_count(), 6);
        assert_eq!(stats.triangle_count(), 2);
    }
}
