use std::path::PathBuf;

/// Errors that can occur while loading a model file.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("model not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported model format: '{0}'")]
    UnsupportedFormat(PathBuf),

    #[error("failed to load glTF file '{0}': {1}")]
    GltfLoadFailed(PathBuf, String),

    #[error("failed to load OBJ file '{0}': {1}")]
    ObjLoadFailed(PathBuf, String),

    #[error("failed to parse STL file '{0}': {1}")]
    StlParseFailed(PathBuf, String),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("model loader unavailable: {0}")]
    LoaderUnavailable(String),
}
