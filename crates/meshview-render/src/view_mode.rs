//! Faces / edges / vertices display mode

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the loaded model is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Shaded triangle surface.
    #[default]
    Faces,
    /// Surface plus a wireframe of every unique edge.
    Edges,
    /// Surface plus one point per vertex.
    Vertices,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Faces, ViewMode::Edges, ViewMode::Vertices];

    pub fn name(self) -> &'static str {
        match self {
            ViewMode::Faces => "faces",
            ViewMode::Edges => "edges",
            ViewMode::Vertices => "vertices",
        }
    }

    /// Faces -> Edges -> Vertices -> Faces.
    pub fn next(self) -> ViewMode {
        match self {
            ViewMode::Faces => ViewMode::Edges,
            ViewMode::Edges => ViewMode::Vertices,
            ViewMode::Vertices => ViewMode::Faces,
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Holds the active [`ViewMode`]. Every transition is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewModeSelector {
    current: ViewMode,
}

impl ViewModeSelector {
    pub fn new(initial: ViewMode) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> ViewMode {
        self.current
    }

    /// Switch to `mode`. Returns whether the mode changed.
    pub fn set(&mut self, mode: ViewMode) -> bool {
        if self.current == mode {
            return false;
        }
        debug!("View mode: {} -> {}", self.current, mode);
        self.current = mode;
        true
    }

    pub fn cycle(&mut self) -> ViewMode {
        self.set(self.current.next());
        self.current
    }
}
