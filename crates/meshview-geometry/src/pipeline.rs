use std::borrow::Cow;

use tracing::info;

use crate::bounds::{frame, BoundingSphere, Normalization};
use crate::buffer::GeometryBuffer;
use crate::merge::merge;
use crate::scene::SceneGraph;
use crate::stats::MeshStats;

/// Options for [`ProcessedModel::from_scene_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Apply each node's world transform to its geometry before merging.
    /// Off by default: meshes are merged in their own local space.
    pub bake_world_transforms: bool,
}

/// Everything the display layer needs from one loaded model.
///
/// Recomputed wholesale on every load, never patched.
#[derive(Debug, Clone)]
pub struct ProcessedModel {
    pub stats: MeshStats,
    /// Unindexed concatenation of every mesh, in original coordinates.
    pub merged: GeometryBuffer,
    pub sphere: BoundingSphere,
    pub normalization: Normalization,
}

impl ProcessedModel {
    pub fn from_scene(scene: &SceneGraph) -> Self {
        Self::from_scene_with(scene, ProcessOptions::default())
    }

    pub fn from_scene_with(scene: &SceneGraph, options: ProcessOptions) -> Self {
        let buffers: Vec<Cow<'_, GeometryBuffer>> = scene
            .mesh_leaves()
            .map(|(key, buffer)| {
                if options.bake_world_transforms {
                    Cow::Owned(buffer.transformed(scene.world_transform(key)))
                } else {
                    Cow::Borrowed(buffer)
                }
            })
            .collect();

        let stats = MeshStats::accumulate(buffers.iter().map(|b| &**b));
        let merged = merge(buffers.iter().map(|b| &**b));
        let (sphere, normalization) = frame(&merged);

        info!(
            "Processed model: {} | radius {:.4} | scale {:.4}",
            stats, sphere.radius, normalization.scale
        );

        Self {
            stats,
            merged,
            sphere,
            normalization,
        }
    }

    /// The merged buffer mapped into the unit sphere at the origin.
    pub fn display_buffer(&self) -> GeometryBuffer {
        self.normalization.apply_to_buffer(&self.merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshNode;
    use crate::shapes;
    use glam::{DVec3, Vec3};
    use meshview_core::Transform;

    #[test]
    fn empty_scene_degrades_gracefully() {
        let model = ProcessedModel::from_scene(&SceneGraph::container("empty"));
        assert_eq!(model.stats, MeshStats::default());
        assert!(model.merged.is_empty());
        assert_eq!(model.sphere.radius, 0.0);
        assert_eq!(model.normalization, Normalization::IDENTITY);
    }

    #[test]
    fn stats_count_sources_and_merge_expands() {
        let model = ProcessedModel::from_scene(&shapes::demo_scene());
        // cube 8 + pyramid 18 + plane 9 source vertices
        assert_eq!(model.stats.mesh_count(), 3);
        assert_eq!(model.stats.vertex_count(), 35);
        assert_eq!(model.stats.triangle_count(), 12 + 6 + 8);
        assert_eq!(model.merged.vertex_count(), 36 + 18 + 24);
        // The cube has no normals, so the merge drops them.
        assert!(!model.merged.has_normals());
    }

    #[test]
    fn display_buffer_fits_unit_sphere() {
        let model = ProcessedModel::from_scene(&shapes::demo_scene());
        let display = model.display_buffer();
        let sphere = BoundingSphere::from_buffer(&display);
        assert!((sphere.radius - 1.0).abs() < 1e-5);
        assert!(sphere.center.length() < 1e-5);
    }

    #[test]
    fn baking_world_transforms_moves_geometry() {
        let mut scene = SceneGraph::container("root");
        let root = scene.root();
        scene.add_child(
            root,
            MeshNode::new()
                .with_transform(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)))
                .with_mesh(shapes::cube(2.0)),
        );

        let local = ProcessedModel::from_scene(&scene);
        let baked = ProcessedModel::from_scene_with(
            &scene,
            ProcessOptions {
                bake_world_transforms: true,
            },
        );
        assert_eq!(local.sphere.center, DVec3::ZERO);
        assert_eq!(baked.sphere.center, DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(local.stats, baked.stats);
    }
}
