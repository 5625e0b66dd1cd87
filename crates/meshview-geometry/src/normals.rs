use glam::Vec3;

use crate::buffer::GeometryBuffer;

/// Per-vertex normals averaged from the faces each vertex belongs to.
///
/// Faces are weighted by area. In an unindexed buffer every vertex belongs to
/// exactly one face, so the result is flat shading. Vertices touching no
/// face, or only degenerate ones, get a zero normal.
pub fn compute_vertex_normals(buffer: &GeometryBuffer) -> Vec<[f32; 3]> {
    let positions = buffer.positions();
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for [a, b, c] in buffer.triangles() {
        let (pa, pb, pc) = (
            Vec3::from(positions[a as usize]),
            Vec3::from(positions[b as usize]),
            Vec3::from(positions[c as usize]),
        );
        // Cross product length is twice the area.
        let face = (pb - pa).cross(pc - pa);
        sums[a as usize] += face;
        sums[b as usize] += face;
        sums[c as usize] += face;
    }

    sums.into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

impl GeometryBuffer {
    /// This buffer, with normals computed if it had none.
    pub fn with_computed_normals(self) -> GeometryBuffer {
        if self.has_normals() {
            return self;
        }
        let normals = compute_vertex_normals(&self);
        let (positions, _, indices) = self.into_parts();
        GeometryBuffer::from_parts_unchecked(positions, Some(normals), indices)
    }
}
