/// Reasons a mesh's attribute data is rejected.
///
/// None of these abort processing: a node carrying malformed data is skipped
/// when the scene is traversed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("mesh has no position attribute")]
    MissingPositions,

    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    #[error("normal count {normals} does not match position count {positions}")]
    NormalCountMismatch { normals: usize, positions: usize },

    #[error("flat attribute length {0} is not a multiple of 3")]
    RaggedAttribute(usize),

    #[error("primitive topology {0} is not a triangle list")]
    NonTriangleTopology(String),
}
