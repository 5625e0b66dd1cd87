use tracing::debug;

use crate::buffer::{append_expanded, GeometryBuffer};

/// Concatenate `buffers` into one unindexed buffer.
///
/// Indexed inputs are expanded to one vertex per index entry, keeping the
/// triangle vertex order. Normals survive only if every input has them; a
/// single input without normals drops them from the output so the consumer
/// recomputes them instead of mixing authored and derived data.
///
/// The output vertex count is expected to be a multiple of three; that is a
/// requirement on the inputs and is not checked here.
pub fn merge<'a>(buffers: impl IntoIterator<Item = &'a GeometryBuffer>) -> GeometryBuffer {
    let buffers: Vec<&GeometryBuffer> = buffers.into_iter().collect();
    if buffers.is_empty() {
        return GeometryBuffer::empty();
    }

    let expanded_len: usize = buffers
        .iter()
        .map(|b| b.indices().map_or(b.vertex_count(), <[u32]>::len))
        .sum();
    let keep_normals = buffers.iter().all(|b| b.has_normals());
    if !keep_normals && buffers.iter().any(|b| b.has_normals()) {
        debug!("Dropping normals from merged buffer: not every input provides them");
    }

    let mut positions = Vec::with_capacity(expanded_len);
    let mut normals = keep_normals.then(|| Vec::with_capacity(expanded_len));

    for buffer in &buffers {
        append_expanded(&mut positions, buffer.positions(), buffer.indices());
        if let (Some(out), Some(normals)) = (normals.as_mut(), buffer.normals()) {
            append_expanded(out, normals, buffer.indices());
        }
    }

    debug!(
        "Merged {} buffers into {} vertices (normals: {})",
        buffers.len(),
        positions.len(),
        normals.is_some()
    );

    // Both attributes were expanded through the same indices.
    GeometryBuffer::from_parts_unchecked(positions, normals, None)
}
