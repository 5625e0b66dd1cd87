use std::path::Path;

use glam::Vec3;
use meshview_geometry::GeometryBuffer;

use crate::error::AssetError;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StlError {
    #[error("binary STL declares {declared} facets but holds {actual} bytes")]
    SizeMismatch { declared: u32, actual: usize },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("no facets")]
    Empty,
}

/// Load an STL file (binary or ASCII) as one unindexed buffer with facet normals.
pub fn load_stl(path: &Path) -> Result<GeometryBuffer, AssetError> {
    let bytes = std::fs::read(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))?;
    parse_stl(&bytes).map_err(|e| AssetError::StlParseFailed(path.to_path_buf(), e.to_string()))
}

/// Parse STL bytes. A file whose length matches its binary facet count is
/// binary even if its header starts with `solid`.
pub fn parse_stl(bytes: &[u8]) -> Result<GeometryBuffer, StlError> {
    if let Some(declared) = binary_facet_count(bytes) {
        let expected = HEADER_LEN + 4 + declared as usize * FACET_LEN;
        if expected == bytes.len() {
            return parse_binary(&bytes[HEADER_LEN + 4..]);
        }
        if !looks_ascii(bytes) {
            return Err(StlError::SizeMismatch {
                declared,
                actual: bytes.len(),
            });
        }
    }
    parse_ascii(&String::from_utf8_lossy(bytes))
}

fn binary_facet_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_LEN..HEADER_LEN + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let text = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    text.trim_start().starts_with("solid") && text.contains("facet")
}

fn read_vec3(raw: &[u8]) -> [f32; 3] {
    let mut out = [0.0; 3];
    for (value, chunk) in out.iter_mut().zip(raw.chunks_exact(4)) {
        *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    out
}

fn parse_binary(facets: &[u8]) -> Result<GeometryBuffer, StlError> {
    let mut builder = FacetBuilder::default();
    for facet in facets.chunks_exact(FACET_LEN) {
        builder.push(
            read_vec3(&facet[0..12]),
            [
                read_vec3(&facet[12..24]),
                read_vec3(&facet[24..36]),
                read_vec3(&facet[36..48]),
            ],
        );
    }
    builder.finish()
}

fn parse_ascii(text: &str) -> Result<GeometryBuffer, StlError> {
    let mut builder = FacetBuilder::default();
    let mut normal = [0.0; 3];
    let mut corners: Vec<[f32; 3]> = Vec::with_capacity(3);

    for (number, line) in text.lines().enumerate() {
        let line_no = number + 1;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("facet") => {
                corners.clear();
                normal = match words.next() {
                    Some("normal") => parse_floats(words, line_no)?,
                    _ => [0.0; 3],
                };
            }
            Some("vertex") => corners.push(parse_floats(words, line_no)?),
            Some("endfacet") => {
                let &[a, b, c] = corners.as_slice() else {
                    return Err(StlError::Syntax {
                        line: line_no,
                        message: format!("facet has {} vertices, expected 3", corners.len()),
                    });
                };
                builder.push(normal, [a, b, c]);
                corners.clear();
            }
            _ => {}
        }
    }
    builder.finish()
}

fn parse_floats<'a>(
    words: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; 3], StlError> {
    let mut out = [0.0; 3];
    let mut count = 0;
    for (slot, word) in out.iter_mut().zip(words) {
        *slot = word.parse().map_err(|_| StlError::Syntax {
            line,
            message: format!("invalid number '{word}'"),
        })?;
        count += 1;
    }
    if count < 3 {
        return Err(StlError::Syntax {
            line,
            message: "expected three numbers".into(),
        });
    }
    Ok(out)
}

#[derive(Default)]
struct FacetBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
}

impl FacetBuilder {
    fn push(&mut self, normal: [f32; 3], corners: [[f32; 3]; 3]) {
        let mut n = Vec3::from(normal);
        if n.length_squared() <= f32::EPSILON {
            let [a, b, c] = corners.map(Vec3::from);
            n = (b - a).cross(c - a);
        }
        let n = n.normalize_or_zero().to_array();

        self.positions.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[n, n, n]);
    }

    fn finish(self) -> Result<GeometryBuffer, StlError> {
        if self.positions.is_empty() {
            return Err(StlError::Empty);
        }
        GeometryBuffer::from_positions(self.positions)
            .with_normals(self.normals)
            .map_err(|e| StlError::Syntax {
                line: 0,
                message: e.to_string(),
            })
    }
}
