//! Vertex arrays handed to the renderer for each view mode

use meshview_core::Color;
use meshview_geometry::{edge_segments, extract_edges_welded, unique_points, ProcessedModel};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vertex::{LineVertex, PointVertex, Vertex3D};
use crate::view_mode::ViewMode;

/// Options for building display primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Merge coincident vertices before extracting edges, so seams between
    /// merged meshes don't produce doubled lines.
    pub weld_edges: bool,
    /// Draw one point per distinct position instead of one per vertex.
    pub dedup_points: bool,
    /// Distance under which two display-space positions count as one.
    pub weld_tolerance: f32,
    pub point_size: f32,
    pub face_color: Color,
    pub edge_color: Color,
    pub point_color: Color,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            weld_edges: false,
            dedup_points: false,
            weld_tolerance: 1e-5,
            point_size: 4.0,
            face_color: Color::rgb(0.8, 0.8, 0.8),
            edge_color: Color::BLACK,
            point_color: Color::rgb(1.0, 0.3, 0.1),
        }
    }
}

/// Display-space geometry for one [`ViewMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayPrimitive {
    Solid {
        vertices: Vec<Vertex3D>,
    },
    Wireframe {
        surface: Vec<Vertex3D>,
        lines: Vec<LineVertex>,
    },
    Points {
        surface: Vec<Vertex3D>,
        points: Vec<PointVertex>,
    },
}

impl DisplayPrimitive {
    /// Build the primitive for `mode` from the normalized merged buffer.
    pub fn build(model: &ProcessedModel, mode: ViewMode, options: &DisplayOptions) -> Self {
        let display = model.display_buffer();
        let display = if display.has_normals() {
            display
        } else {
            debug!("Merged buffer has no normals, recomputing");
            display.with_computed_normals()
        };

        let face_color = options.face_color.to_array();
        let surface: Vec<Vertex3D> = match display.normals() {
            Some(normals) => display
                .positions()
                .iter()
                .zip(normals)
                .map(|(&p, &n)| Vertex3D::new(p, n, face_color))
                .collect(),
            None => Vec::new(),
        };

        match mode {
            ViewMode::Faces => DisplayPrimitive::Solid { vertices: surface },
            ViewMode::Edges => {
                let segments = if options.weld_edges {
                    extract_edges_welded(&display, options.weld_tolerance)
                } else {
                    edge_segments(&display)
                };
                let color = options.edge_color.to_array();
                let lines = segments
                    .into_iter()
                    .flatten()
                    .map(|p| LineVertex::new(p, color))
                    .collect();
                DisplayPrimitive::Wireframe { surface, lines }
            }
            ViewMode::Vertices => {
                let tolerance = options.dedup_points.then_some(options.weld_tolerance);
                let color = options.point_color.to_array();
                let points = unique_points(&display, tolerance)
                    .into_iter()
                    .map(|p| PointVertex::new(p, options.point_size, color))
                    .collect();
                DisplayPrimitive::Points { surface, points }
            }
        }
    }

    pub fn mode(&self) -> ViewMode {
        match self {
            DisplayPrimitive::Solid { .. } => ViewMode::Faces,
            DisplayPrimitive::Wireframe { .. } => ViewMode::Edges,
            DisplayPrimitive::Points { .. } => ViewMode::Vertices,
        }
    }

    /// The shaded triangles, present in every mode.
    pub fn surface(&self) -> &[Vertex3D] {
        match self {
            DisplayPrimitive::Solid { vertices } => vertices,
            DisplayPrimitive::Wireframe { surface, .. } | DisplayPrimitive::Points { surface, .. } => {
                surface
            }
        }
    }

    /// Number of line segments (Edges) or points (Vertices); 0 for Faces.
    pub fn overlay_len(&self) -> usize {
        match self {
            DisplayPrimitive::Solid { .. } => 0,
            DisplayPrimitive::Wireframe { lines, .. } => lines.len() / 2,
            DisplayPrimitive::Points { points, .. } => points.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshview_core::Vec3;
    use meshview_geometry::{shapes, GeometryBuffer, MeshNode, SceneGraph};

    fn model_of(buffers: Vec<GeometryBuffer>) -> ProcessedModel {
        let mut scene = SceneGraph::container("test");
        let root = scene.root();
        for buffer in buffers {
            scene.add_child(root, MeshNode::new().with_mesh(buffer));
        }
        ProcessedModel::from_scene(&scene)
    }

    fn quad_halves() -> Vec<GeometryBuffer> {
        vec![
            GeometryBuffer::from_positions(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]),
            GeometryBuffer::from_positions(vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]),
        ]
    }

    #[test]
    fn faces_recompute_missing_normals() {
        let model = model_of(vec![shapes::cube(2.0)]);
        let primitive = DisplayPrimitive::build(&model, ViewMode::Faces, &DisplayOptions::default());
        assert_eq!(primitive.mode(), ViewMode::Faces);
        assert_eq!(primitive.surface().len(), 36);
        for v in primitive.surface() {
            assert!((Vec3::from(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn surface_is_in_display_space() {
        let model = model_of(vec![shapes::cube(50.0)]);
        let primitive = DisplayPrimitive::build(&model, ViewMode::Faces, &DisplayOptions::default());
        let max = primitive
            .surface()
            .iter()
            .map(|v| Vec3::from(v.position).length())
            .fold(0.0f32, f32::max);
        assert!((max - 1.0).abs() < 1e-5);
    }

    #[test]
    fn welding_removes_seam_edges() {
        let model = model_of(quad_halves());
        let plain = DisplayPrimitive::build(&model, ViewMode::Edges, &DisplayOptions::default());
        let welded = DisplayPrimitive::build(
            &model,
            ViewMode::Edges,
            &DisplayOptions {
                weld_edges: true,
                ..Default::default()
            },
        );
        assert_eq!(plain.overlay_len(), 6);
        assert_eq!(welded.overlay_len(), 5);
    }

    #[test]
    fn points_optionally_deduplicated() {
        let model = model_of(quad_halves());
        let all = DisplayPrimitive::build(&model, ViewMode::Vertices, &DisplayOptions::default());
        let unique = DisplayPrimitive::build(
            &model,
            ViewMode::Vertices,
            &DisplayOptions {
                dedup_points: true,
                ..Default::default()
            },
        );
        assert_eq!(all.overlay_len(), 6);
        assert_eq!(unique.overlay_len(), 4);
        assert_eq!(unique.surface().len(), 6);
    }

    #[test]
    fn empty_model_builds_empty_primitives() {
        let model = model_of(Vec::new());
        for mode in ViewMode::ALL {
            let primitive = DisplayPrimitive::build(&model, mode, &DisplayOptions::default());
            assert!(primitive.surface().is_empty());
            assert_eq!(primitive.overlay_len(), 0);
        }
    }
}
