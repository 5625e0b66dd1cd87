//! Command line arguments

use std::path::PathBuf;

use clap::Parser;
use meshview_render::ViewMode;

/// View modes as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliViewMode {
    Faces,
    Edges,
    Vertices,
}

impl From<CliViewMode> for ViewMode {
    fn from(mode: CliViewMode) -> Self {
        match mode {
            CliViewMode::Faces => ViewMode::Faces,
            CliViewMode::Edges => ViewMode::Edges,
            CliViewMode::Vertices => ViewMode::Vertices,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "meshview",
    version,
    about = "Load a mesh scene, report its statistics and frame it for display"
)]
pub struct Args {
    /// Model file (.gltf, .glb, .obj, .stl). Shows a demo scene when omitted.
    pub model: Option<PathBuf>,

    /// Initial view mode, overriding the settings file
    #[arg(long, value_enum)]
    pub mode: Option<CliViewMode>,

    /// Weld coincident vertices for edges and points
    #[arg(long)]
    pub weld: bool,

    /// Bake node transforms into the merged geometry
    #[arg(long)]
    pub bake: bool,

    /// Animation frames to simulate at 60 Hz
    #[arg(long, default_value = "120")]
    pub frames: u32,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    pub save_settings: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_and_flags() {
        let args = Args::parse_from(["meshview", "scene.glb", "--mode", "vertices", "--weld"]);
        assert_eq!(args.model, Some(PathBuf::from("scene.glb")));
        assert_eq!(args.mode.map(ViewMode::from), Some(ViewMode::Vertices));
        assert!(args.weld);
        assert_eq!(args.frames, 120);
    }

    #[test]
    fn model_is_optional() {
        let args = Args::parse_from(["meshview"]);
        assert!(args.model.is_none());
        assert!(args.mode.is_none());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Args::try_parse_from(["meshview", "--mode", "wireframe"]).is_err());
    }
}
