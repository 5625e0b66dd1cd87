use glam::{Mat3, Mat4, Vec3};

use crate::error::GeometryError;

/// Attribute arrays describing one mesh's shape.
///
/// Positions are `[x, y, z]` tuples. Normals, when present, have exactly one
/// entry per position. Indices, when present, are a flat triangle list
/// referencing positions; every index is in bounds. An index list whose length
/// is not a multiple of three is tolerated and counted as a fractional
/// triangle by the statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    indices: Option<Vec<u32>>,
}

impl GeometryBuffer {
    /// Validate and build a buffer.
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        indices: Option<Vec<u32>>,
    ) -> Result<Self, GeometryError> {
        if let Some(normals) = &normals {
            if normals.len() != positions.len() {
                return Err(GeometryError::NormalCountMismatch {
                    normals: normals.len(),
                    positions: positions.len(),
                });
            }
        }

        if let Some(indices) = &indices {
            let vertex_count = positions.len();
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(GeometryError::IndexOutOfBounds {
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self {
            positions,
            normals,
            indices,
        })
    }

    /// Build from loader output where the position attribute may be absent.
    pub fn from_attributes(
        positions: Option<Vec<[f32; 3]>>,
        normals: Option<Vec<[f32; 3]>>,
        indices: Option<Vec<u32>>,
    ) -> Result<Self, GeometryError> {
        let positions = positions.ok_or(GeometryError::MissingPositions)?;
        Self::new(positions, normals, indices)
    }

    /// Build from flat `f32` arrays as produced by most parsers.
    ///
    /// An empty position array is a missing attribute. An empty normal array
    /// means "no normals"; an empty index array means "not indexed".
    pub fn from_flat(
        positions: &[f32],
        normals: &[f32],
        indices: &[u32],
    ) -> Result<Self, GeometryError> {
        if positions.is_empty() {
            return Err(GeometryError::MissingPositions);
        }
        let positions = flat_to_tuples(positions)?;
        let normals = if normals.is_empty() {
            None
        } else {
            Some(flat_to_tuples(normals)?)
        };
        let indices = (!indices.is_empty()).then(|| indices.to_vec());
        Self::new(positions, normals, indices)
    }

    /// Non-indexed buffer without normals.
    pub fn from_positions(positions: Vec<[f32; 3]>) -> Self {
        Self {
            positions,
            normals: None,
            indices: None,
        }
    }

    /// Caller guarantees the invariants `new` would check.
    pub(crate) fn from_parts_unchecked(
        positions: Vec<[f32; 3]>,
        normals: Option<Vec<[f32; 3]>>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        debug_assert!(normals.as_ref().map_or(true, |n| n.len() == positions.len()));
        Self {
            positions,
            normals,
            indices,
        }
    }

    /// A buffer with zero vertices.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Attach normals, replacing any existing ones.
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Result<Self, GeometryError> {
        if normals.len() != self.positions.len() {
            return Err(GeometryError::NormalCountMismatch {
                normals: normals.len(),
                positions: self.positions.len(),
            });
        }
        self.normals = Some(normals);
        Ok(self)
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn normals(&self) -> Option<&[[f32; 3]]> {
        self.normals.as_deref()
    }

    #[inline]
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Number of position tuples.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Triangle count as a real number: `indices / 3` when indexed,
    /// otherwise `positions / 3`. Not rounded.
    pub fn triangle_estimate(&self) -> f64 {
        match &self.indices {
            Some(indices) => indices.len() as f64 / 3.0,
            None => self.positions.len() as f64 / 3.0,
        }
    }

    /// Complete triangles as vertex index triples. A trailing partial
    /// triangle is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let implicit = match &self.indices {
            Some(_) => 0,
            None => self.positions.len() / 3,
        };
        let explicit = self
            .indices
            .as_deref()
            .unwrap_or(&[])
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]]);
        let implicit = (0..implicit as u32).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]);
        explicit.chain(implicit)
    }

    /// Copy of this buffer with positions (and normals) mapped by `matrix`.
    pub fn transformed(&self, matrix: Mat4) -> GeometryBuffer {
        let positions = self
            .positions
            .iter()
            .map(|&p| matrix.transform_point3(Vec3::from(p)).to_array())
            .collect();

        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        let normals = self.normals.as_ref().map(|normals| {
            normals
                .iter()
                .map(|&n| (normal_matrix * Vec3::from(n)).normalize_or_zero().to_array())
                .collect()
        });

        GeometryBuffer {
            positions,
            normals,
            indices: self.indices.clone(),
        }
    }

    pub fn into_parts(self) -> (Vec<[f32; 3]>, Option<Vec<[f32; 3]>>, Option<Vec<u32>>) {
        (self.positions, self.normals, self.indices)
    }
}

/// Append `attribute` to `out`, expanded through `indices` when present.
pub(crate) fn append_expanded(
    out: &mut Vec<[f32; 3]>,
    attribute: &[[f32; 3]],
    indices: Option<&[u32]>,
) {
    match indices {
        Some(indices) => out.extend(indices.iter().map(|&i| attribute[i as usize])),
        None => out.extend_from_slice(attribute),
    }
}

fn flat_to_tuples(flat: &[f32]) -> Result<Vec<[f32; 3]>, GeometryError> {
    if flat.len() % 3 != 0 {
        return Err(GeometryError::RaggedAttribute(flat.len()));
    }
    Ok(flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> GeometryBuffer {
        GeometryBuffer::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            None,
            Some(vec![0, 1, 2, 0, 2, 3]),
        )
        .unwrap()
    }

    #[test]
    fn rejects_out_of_bounds_index() {
        let err = GeometryBuffer::new(vec![[0.0; 3]; 3], None, Some(vec![0, 1, 3])).unwrap_err();
        assert_eq!(
            err,
            GeometryError::IndexOutOfBounds {
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn rejects_normal_count_mismatch() {
        let err = GeometryBuffer::new(vec![[0.0; 3]; 3], Some(vec![[0.0, 0.0, 1.0]]), None)
            .unwrap_err();
        assert!(matches!(err, GeometryError::NormalCountMismatch { normals: 1, positions: 3 }));
    }

    #[test]
    fn missing_positions_is_malformed() {
        let err = GeometryBuffer::from_attributes(None, None, Some(vec![0, 1, 2])).unwrap_err();
        assert_eq!(err, GeometryError::MissingPositions);
    }

    #[test]
    fn from_flat_splits_tuples_and_empty_means_absent() {
        let buffer = GeometryBuffer::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[], &[])
            .unwrap();
        assert_eq!(buffer.vertex_count(), 3);
        assert!(!buffer.is_indexed());
        assert!(!buffer.has_normals());

        let err = GeometryBuffer::from_flat(&[0.0, 1.0], &[], &[]).unwrap_err();
        assert_eq!(err, GeometryError::RaggedAttribute(2));

        let err = GeometryBuffer::from_flat(&[], &[], &[]).unwrap_err();
        assert_eq!(err, GeometryError::MissingPositions);
    }

    #[test]
    fn triangle_estimate_is_fractional_for_ragged_indices() {
        let buffer = GeometryBuffer::new(vec![[0.0; 3]; 3], None, Some(vec![0, 1, 2, 0])).unwrap();
        assert!((buffer.triangle_estimate() - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(buffer.triangles().count(), 1);
    }

    #[test]
    fn indexed_triangles_follow_index_list() {
        let quad = quad();
        assert_eq!(quad.triangle_estimate(), 2.0);
        let triangles: Vec<_> = quad.triangles().collect();
        assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn non_indexed_triangles_are_implicit() {
        let buffer = GeometryBuffer::from_positions(vec![[0.0; 3]; 6]);
        let triangles: Vec<_> = buffer.triangles().collect();
        assert_eq!(triangles, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn transformed_moves_positions_and_keeps_normals_unit() {
        let buffer = GeometryBuffer::from_positions(vec![[1.0, 0.0, 0.0]; 3])
            .with_normals(vec![[0.0, 0.0, 1.0]; 3])
            .unwrap();
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 2.0, 4.0),
            glam::Quat::IDENTITY,
            Vec3::new(0.0, 1.0, 0.0),
        );
        let moved = buffer.transformed(matrix);
        assert_eq!(moved.positions()[0], [2.0, 1.0, 0.0]);
        let n = Vec3::from(moved.normals().unwrap()[0]);
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n - Vec3::Z).length() < 1e-6);
    }
}
