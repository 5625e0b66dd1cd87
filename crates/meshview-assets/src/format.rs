use std::path::Path;

use crate::error::AssetError;

/// Model file formats the loader understands, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    /// glTF 2.0, JSON (`.gltf`) or binary (`.glb`).
    Gltf,
    Obj,
    Stl,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Result<Self, AssetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| AssetError::UnsupportedFormat(path.to_path_buf()))?;

        match ext.as_str() {
            "gltf" | "glb" => Ok(Self::Gltf),
            "obj" => Ok(Self::Obj),
            "stl" => Ok(Self::Stl),
            _ => Err(AssetError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Gltf => "glTF",
            Self::Obj => "OBJ",
            Self::Stl => "STL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(ModelFormat::from_path(Path::new("a/b.GLB")).unwrap(), ModelFormat::Gltf);
        assert_eq!(ModelFormat::from_path(Path::new("scene.gltf")).unwrap(), ModelFormat::Gltf);
        assert_eq!(ModelFormat::from_path(Path::new("teapot.Obj")).unwrap(), ModelFormat::Obj);
        assert_eq!(ModelFormat::from_path(Path::new("part.stl")).unwrap(), ModelFormat::Stl);
    }

    #[test]
    fn unknown_or_missing_extension_is_unsupported() {
        for path in ["model.fbx", "README"] {
            assert!(matches!(
                ModelFormat::from_path(Path::new(path)),
                Err(AssetError::UnsupportedFormat(_))
            ));
        }
    }
}
