//! Viewer state: the current model, its load status, and the view mode
//!
//! A loaded model replaces the previous one wholesale. Mode changes are
//! accepted at any time but only produce display output once a model exists.

use meshview_assets::{LoadId, LoadOutcome};
use meshview_geometry::{MeshStats, ProcessOptions, ProcessedModel, SceneGraph};
use meshview_render::{DisplayOptions, DisplayPrimitive, ViewMode, ViewModeSelector};
use tracing::{debug, info, warn};

use crate::settings::DisplaySettings;

/// Where the most recent load request stands
#[derive(Debug, Clone, PartialEq)]
pub enum LoadPhase {
    /// Nothing requested yet
    Idle,
    /// Waiting for the loader
    Loading { id: LoadId, label: String },
    /// The current model came from the latest request
    Ready,
    /// The latest request failed; any earlier model is still shown
    Failed(String),
}

/// A scene together with everything derived from it
struct LoadedScene {
    scene: SceneGraph,
    processed: ProcessedModel,
}

pub struct Viewer {
    selector: ViewModeSelector,
    options: DisplayOptions,
    process_options: ProcessOptions,
    phase: LoadPhase,
    current: Option<LoadedScene>,
    primitive: Option<DisplayPrimitive>,
}

impl Viewer {
    pub fn new(settings: &DisplaySettings) -> Self {
        Self {
            selector: ViewModeSelector::new(settings.initial_mode),
            options: settings.options,
            process_options: ProcessOptions {
                bake_world_transforms: settings.bake_world_transforms,
            },
            phase: LoadPhase::Idle,
            current: None,
            primitive: None,
        }
    }

    /// Record that `id` is now the request whose result will be shown.
    pub fn begin_load(&mut self, id: LoadId, label: impl Into<String>) {
        let label = label.into();
        info!("Loading {} ({})", label, id);
        self.phase = LoadPhase::Loading { id, label };
    }

    /// Apply a loader result. Returns false if it belongs to a superseded request.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        let expected = match &self.phase {
            LoadPhase::Loading { id, .. } => Some(*id),
            _ => None,
        };
        if expected != Some(outcome.id) {
            debug!("Ignoring result of {} ({})", outcome.id, outcome.label);
            return false;
        }

        match outcome.result {
            Ok(scene) => self.show_scene(scene),
            Err(e) => {
                warn!("Failed to load {}: {}", outcome.label, e);
                self.phase = LoadPhase::Failed(e.to_string());
            }
        }
        true
    }

    /// Replace the current model with `scene`.
    pub fn show_scene(&mut self, scene: SceneGraph) {
        let processed = ProcessedModel::from_scene_with(&scene, self.process_options);
        self.current = Some(LoadedScene { scene, processed });
        self.phase = LoadPhase::Ready;
        self.rebuild();
    }

    /// Switch view mode. Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: ViewMode) -> bool {
        let changed = self.selector.set(mode);
        if changed {
            self.rebuild();
        }
        changed
    }

    pub fn cycle_mode(&mut self) -> ViewMode {
        let mode = self.selector.current().next();
        self.set_mode(mode);
        mode
    }

    fn rebuild(&mut self) {
        self.primitive = self.current.as_ref().map(|loaded| {
            DisplayPrimitive::build(&loaded.processed, self.selector.current(), &self.options)
        });
    }

    pub fn mode(&self) -> ViewMode {
        self.selector.current()
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn processed(&self) -> Option<&ProcessedModel> {
        self.current.as_ref().map(|loaded| &loaded.processed)
    }

    pub fn stats(&self) -> Option<MeshStats> {
        self.processed().map(|p| p.stats)
    }

    pub fn primitive(&self) -> Option<&DisplayPrimitive> {
        self.primitive.as_ref()
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.current.as_ref().map(|loaded| &loaded.scene)
    }

    /// Mutable scene access for transform animation. Geometry and stats are
    /// not recomputed.
    pub fn scene_mut(&mut self) -> Option<&mut SceneGraph> {
        self.current.as_mut().map(|loaded| &mut loaded.scene)
    }

    /// One-line status for an overlay.
    pub fn overlay_text(&self) -> String {
        match (&self.phase, self.stats()) {
            (LoadPhase::Loading { label, .. }, _) => format!("loading {}", label),
            (LoadPhase::Failed(message), None) => format!("error: {}", message),
            (_, Some(stats)) => format!("{} | {}", self.mode(), stats),
            (_, None) => format!("{} | no model", self.mode()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshview_assets::{AssetError, ModelLoader};
    use meshview_geometry::shapes;
    use std::time::Duration;

    fn viewer() -> Viewer {
        Viewer::new(&DisplaySettings::default())
    }

    #[test]
    fn mode_changes_before_a_model_produce_nothing() {
        let mut viewer = viewer();
        assert!(viewer.set_mode(ViewMode::Edges));
        assert!(viewer.primitive().is_none());
        assert_eq!(viewer.overlay_text(), "edges | no model");

        viewer.show_scene(shapes::demo_scene());
        assert_eq!(viewer.primitive().map(|p| p.mode()), Some(ViewMode::Edges));
    }

    #[test]
    fn cycling_rebuilds_primitive_without_touching_stats() {
        let mut viewer = viewer();
        viewer.show_scene(shapes::demo_scene());
        let stats = viewer.stats();

        for _ in 0..3 {
            let mode = viewer.cycle_mode();
            assert_eq!(viewer.primitive().map(|p| p.mode()), Some(mode));
            assert_eq!(viewer.stats(), stats);
        }
    }

    #[test]
    fn superseded_results_are_ignored() {
        let loader = ModelLoader::new(".", 1).unwrap();
        let old = loader.request_with("old", || Ok(SceneGraph::container("old")));
        let new = loader.request_with("new", || Ok(shapes::demo_scene()));

        let mut viewer = viewer();
        viewer.begin_load(new, "new");

        let stale = LoadOutcome {
            id: old,
            label: "old".into(),
            result: Ok(SceneGraph::container("old")),
        };
        assert!(!viewer.apply(stale));
        assert!(viewer.processed().is_none());

        let outcome = loader.wait_latest(Duration::from_secs(5)).unwrap();
        assert!(viewer.apply(outcome));
        assert_eq!(viewer.phase(), &LoadPhase::Ready);
        assert_eq!(viewer.stats().map(|s| s.mesh_count()), Some(3));
    }

    #[test]
    fn failed_load_keeps_previous_model() {
        let loader = ModelLoader::new(".", 1).unwrap();
        let mut viewer = viewer();
        viewer.show_scene(shapes::demo_scene());

        let id = loader.request_with("broken", || {
            Err(AssetError::LoaderUnavailable("broken".into()))
        });
        viewer.begin_load(id, "broken");
        let outcome = loader.wait_latest(Duration::from_secs(5)).unwrap();
        assert!(viewer.apply(outcome));

        assert!(matches!(viewer.phase(), LoadPhase::Failed(_)));
        assert!(viewer.primitive().is_some());
        assert_eq!(viewer.stats().map(|s| s.mesh_count()), Some(3));
    }
}
