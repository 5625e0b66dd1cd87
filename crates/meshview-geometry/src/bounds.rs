//! Bounding sphere and display framing
//!
//! All bounds math runs in `f64` even though positions are stored as `f32`.

use glam::{DMat4, DVec3, Mat4};

use crate::buffer::GeometryBuffer;

/// Sphere enclosing every vertex of a buffer.
///
/// The center is the center of the axis-aligned bounding box; the radius is
/// the exact largest distance from that center to a vertex, not the distance
/// to a box corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: DVec3,
    pub radius: f64,
}

impl BoundingSphere {
    /// Degenerate sphere used for empty input.
    pub const EMPTY: BoundingSphere = BoundingSphere {
        center: DVec3::ZERO,
        radius: 0.0,
    };

    pub fn from_buffer(buffer: &GeometryBuffer) -> Self {
        Self::from_points(buffer.positions().iter().map(|&p| DVec3::from(p.map(f64::from))))
    }

    /// Two passes over `points`: bounding box, then exact radius.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = DVec3>,
        I::IntoIter: Clone,
    {
        let points = points.into_iter();
        let Some((min, max)) = bounding_box(points.clone()) else {
            return Self::EMPTY;
        };

        let center = (min + max) * 0.5;
        let radius_squared = points
            .map(|p| p.distance_squared(center))
            .fold(0.0f64, f64::max);

        Self {
            center,
            radius: radius_squared.sqrt(),
        }
    }

    /// True when there is nothing to scale: empty or single-point geometry.
    pub fn is_degenerate(&self) -> bool {
        !(self.radius > 0.0 && self.radius.is_finite())
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Axis-aligned `(min, max)` of `points`, or `None` when there are none.
pub fn bounding_box(points: impl IntoIterator<Item = DVec3>) -> Option<(DVec3, DVec3)> {
    points.into_iter().fold(None, |acc, p| match acc {
        None => Some((p, p)),
        Some((min, max)) => Some((min.min(p), max.max(p))),
    })
}

/// Uniform scale and offset that frame content in a unit sphere at the origin.
///
/// A point maps to `p * scale + offset`, with `offset = -center * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub offset: DVec3,
    pub scale: f64,
}

impl Normalization {
    pub const IDENTITY: Normalization = Normalization {
        offset: DVec3::ZERO,
        scale: 1.0,
    };

    /// `scale` is `1 / radius`, or 1 for a degenerate sphere.
    pub fn from_sphere(sphere: &BoundingSphere) -> Self {
        let scale = if sphere.is_degenerate() {
            1.0
        } else {
            1.0 / sphere.radius
        };
        let offset = if sphere.center.is_finite() {
            -sphere.center * scale
        } else {
            DVec3::ZERO
        };
        Self { offset, scale }
    }

    #[inline]
    pub fn apply(&self, point: DVec3) -> DVec3 {
        point * self.scale + self.offset
    }

    pub fn matrix(&self) -> DMat4 {
        DMat4::from_translation(self.offset) * DMat4::from_scale(DVec3::splat(self.scale))
    }

    /// [`Self::matrix`] narrowed to `f32`, for renderers that keep the
    /// original positions and frame them on the GPU.
    pub fn model_matrix(&self) -> Mat4 {
        self.matrix().as_mat4()
    }

    /// Copy of `buffer` in display space. Normals and indices are unchanged
    /// since the scale is uniform.
    pub fn apply_to_buffer(&self, buffer: &GeometryBuffer) -> GeometryBuffer {
        let positions = buffer
            .positions()
            .iter()
            .map(|&p| {
                let p = self.apply(DVec3::from(p.map(f64::from)));
                [p.x as f32, p.y as f32, p.z as f32]
            })
            .collect();
        GeometryBuffer::from_parts_unchecked(
            positions,
            buffer.normals().map(<[_]>::to_vec),
            buffer.indices().map(<[_]>::to_vec),
        )
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Bounding sphere of `buffer` and the framing derived from it.
pub fn frame(buffer: &GeometryBuffer) -> (BoundingSphere, Normalization) {
    let sphere = BoundingSphere::from_buffer(buffer);
    (sphere, Normalization::from_sphere(&sphere))
}
