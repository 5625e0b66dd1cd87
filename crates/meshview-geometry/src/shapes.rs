//! Procedural shapes, used for the demo scene and as test fixtures

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use meshview_core::Transform;

use crate::buffer::GeometryBuffer;
use crate::scene::{MeshNode, SceneGraph};

/// Indexed cube centered at the origin: 8 shared corners, 12 triangles, no
/// normals.
pub fn cube(size: f32) -> GeometryBuffer {
    let h = size / 2.0;
    let positions = vec![
        [-h, -h, -h],
        [h, -h, -h],
        [h, h, -h],
        [-h, h, -h],
        [-h, -h, h],
        [h, -h, h],
        [h, h, h],
        [-h, h, h],
    ];
    #[rustfmt::skip]
    let indices = vec![
        4, 5, 6, 4, 6, 7, // +z
        1, 0, 3, 1, 3, 2, // -z
        5, 1, 2, 5, 2, 6, // +x
        0, 4, 7, 0, 7, 3, // -x
        7, 6, 2, 7, 2, 3, // +y
        0, 1, 5, 0, 5, 4, // -y
    ];
    GeometryBuffer::from_parts_unchecked(positions, None, Some(indices))
}

/// Unindexed square pyramid with flat normals: base of side `base` on the
/// XZ plane, apex at `height`. Four sides plus a two-triangle base.
pub fn pyramid(base: f32, height: f32) -> GeometryBuffer {
    let h = base / 2.0;
    let apex = Vec3::new(0.0, height, 0.0);
    let a = Vec3::new(-h, 0.0, -h);
    let b = Vec3::new(h, 0.0, -h);
    let c = Vec3::new(h, 0.0, h);
    let d = Vec3::new(-h, 0.0, h);

    let faces = [
        [d, c, apex],
        [c, b, apex],
        [b, a, apex],
        [a, d, apex],
        [a, b, c],
        [a, c, d],
    ];

    let mut positions = Vec::with_capacity(faces.len() * 3);
    let mut normals = Vec::with_capacity(faces.len() * 3);
    for [p0, p1, p2] in faces {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero().to_array();
        for p in [p0, p1, p2] {
            positions.push(p.to_array());
            normals.push(normal);
        }
    }

    GeometryBuffer::from_parts_unchecked(positions, Some(normals), None)
}

/// Indexed UV sphere with smooth normals. At least 3 segments and 2 rings.
pub fn sphere(radius: f32, segments: u32, rings: u32) -> GeometryBuffer {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = radius * phi.cos();
        let ring_radius = radius * phi.sin();

        for seg in 0..=segments {
            let theta = 2.0 * PI * seg as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            positions.push([x, y, z]);
            normals.push(Vec3::new(x, y, z).normalize_or_zero().to_array());
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    GeometryBuffer::from_parts_unchecked(positions, Some(normals), Some(indices))
}

/// Indexed flat plane on XZ, facing +Y.
pub fn plane(size: f32, subdivisions: u32) -> GeometryBuffer {
    let subdivisions = subdivisions.max(1);
    let mut positions = Vec::new();
    let mut indices = Vec::new();

    let half_size = size / 2.0;
    let step = size / subdivisions as f32;

    for z in 0..=subdivisions {
        for x in 0..=subdivisions {
            let px = -half_size + x as f32 * step;
            let pz = -half_size + z as f32 * step;
            positions.push([px, 0.0, pz]);
        }
    }

    for z in 0..subdivisions {
        for x in 0..subdivisions {
            let current = z * (subdivisions + 1) + x;
            let next = current + subdivisions + 1;

            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    GeometryBuffer::from_parts_unchecked(positions, Some(normals), Some(indices))
}

/// A small hierarchy mixing indexed and unindexed meshes:
///
/// ```text
/// demo
/// ├── cube
/// └── group
///     ├── pyramid
///     └── ground
/// ```
pub fn demo_scene() -> SceneGraph {
    let mut scene = SceneGraph::container("demo");
    let root = scene.root();

    scene.add_child(root, MeshNode::new().with_name("cube").with_mesh(cube(1.0)));

    let group = scene.add_child(
        root,
        MeshNode::new().with_name("group").with_transform(Transform::from_trs(
            Vec3::new(2.0, 0.0, 0.0),
            Quat::from_rotation_y(0.25 * PI),
            Vec3::ONE,
        )),
    );
    scene.add_child(
        group,
        MeshNode::new()
            .with_name("pyramid")
            .with_mesh(pyramid(1.0, 1.5)),
    );
    scene.add_child(
        group,
        MeshNode::new()
            .with_name("ground")
            .with_transform(Transform::from_position(Vec3::new(0.0, -0.5, 0.0)))
            .with_mesh(plane(4.0, 2)),
    );

    scene
}
