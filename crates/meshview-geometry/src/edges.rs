//! Edge and point sets for the wireframe and vertex display modes

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::buffer::GeometryBuffer;

/// Unique undirected edges as `[low, high]` vertex index pairs, in order of
/// first appearance. An edge shared by two triangles is emitted once;
/// collapsed edges (both ends on the same index) are skipped.
pub fn extract_edges(buffer: &GeometryBuffer) -> Vec<[u32; 2]> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for [a, b, c] in buffer.triangles() {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            if u == v {
                continue;
            }
            let edge = [u.min(v), u.max(v)];
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }

    edges
}

/// Line segments for [`extract_edges`].
pub fn edge_segments(buffer: &GeometryBuffer) -> Vec<[[f32; 3]; 2]> {
    let positions = buffer.positions();
    extract_edges(buffer)
        .into_iter()
        .map(|[a, b]| [positions[a as usize], positions[b as usize]])
        .collect()
}

/// Like [`edge_segments`], but vertices closer than `tolerance` are treated
/// as one before deduplicating.
///
/// Merged buffers repeat every shared vertex, so without welding each triangle
/// contributes its own copy of a shared edge.
pub fn extract_edges_welded(buffer: &GeometryBuffer, tolerance: f32) -> Vec<[[f32; 3]; 2]> {
    let welded = weld(buffer.positions(), tolerance);
    let positions = buffer.positions();

    let mut seen = HashSet::new();
    let mut segments = Vec::new();

    for [a, b, c] in buffer.triangles() {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let (wu, wv) = (welded[u as usize], welded[v as usize]);
            if wu == wv {
                continue;
            }
            if seen.insert([wu.min(wv), wu.max(wv)]) {
                segments.push([positions[wu as usize], positions[wv as usize]]);
            }
        }
    }

    segments
}

/// One point per position tuple, or one per distinct location when
/// `tolerance` is given.
pub fn unique_points(buffer: &GeometryBuffer, tolerance: Option<f32>) -> Vec<[f32; 3]> {
    let positions = buffer.positions();
    let Some(tolerance) = tolerance else {
        return positions.to_vec();
    };

    let welded = weld(positions, tolerance);
    welded
        .iter()
        .enumerate()
        .filter(|&(i, &w)| w as usize == i)
        .map(|(i, _)| positions[i])
        .collect()
}

/// For each vertex, the index of the first earlier vertex within `tolerance`
/// of it, or its own index if there is none.
///
/// Vertices are bucketed on a grid of `tolerance`-sized cells; a vertex is
/// compared against the representatives in its own and the 26 neighbouring
/// cells, so points straddling a cell boundary still weld.
fn weld(positions: &[[f32; 3]], tolerance: f32) -> Vec<u32> {
    let tolerance = tolerance.max(0.0);
    let cell = if tolerance > 0.0 { tolerance } else { f32::EPSILON };
    let max_distance_sq = tolerance * tolerance;
    let mut representatives: HashMap<[i64; 3], Vec<u32>> = HashMap::new();

    positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let point = Vec3::from(*p);
            let key = p.map(|c| (c / cell).floor() as i64);

            let found = neighbour_keys(key).find_map(|neighbour| {
                representatives.get(&neighbour)?.iter().copied().find(|&r| {
                    Vec3::from(positions[r as usize]).distance_squared(point) <= max_distance_sq
                })
            });

            found.unwrap_or_else(|| {
                representatives.entry(key).or_default().push(i as u32);
                i as u32
            })
        })
        .collect()
}

fn neighbour_keys(key: [i64; 3]) -> impl Iterator<Item = [i64; 3]> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| [key[0] + dx, key[1] + dy, key[2] + dz]))
    })
}
