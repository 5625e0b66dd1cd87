//! Vertex types for the display primitives

use bytemuck::{Pod, Zeroable};

/// Surface vertex with position, normal, and color
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex3D {
    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// One end of a wireframe segment
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// A vertex drawn as a point sprite of `size` pixels
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 4],
}

impl PointVertex {
    pub fn new(position: [f32; 3], size: f32, color: [f32; 4]) -> Self {
        Self {
            position,
            size,
            color,
        }
    }
}
