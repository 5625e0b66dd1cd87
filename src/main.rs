//! meshview - mesh statistics, merging and display framing
//!
//! Loads a model (or builds a demo scene), reports its statistics, prepares
//! the display primitive for every view mode and animates the model root.

mod args;
mod settings;
mod state;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use meshview_assets::ModelLoader;
use meshview_core::{GameTime, Oscillator, Sway};
use meshview_geometry::shapes;
use meshview_render::ViewMode;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::args::Args;
use crate::settings::{AnimationSettings, ViewerSettings};
use crate::state::{LoadPhase, Viewer};

const FRAME_DELTA: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let args = Args::parse();
    let mut settings = ViewerSettings::load();
    if let Some(mode) = args.mode {
        settings.display.initial_mode = mode.into();
    }
    if args.weld {
        settings.display.options.weld_edges = true;
        settings.display.options.dedup_points = true;
    }
    if args.bake {
        settings.display.bake_world_transforms = true;
    }

    if args.save_settings {
        return settings.save();
    }

    info!("Starting meshview...");
    let mut viewer = Viewer::new(&settings.display);

    match &args.model {
        Some(path) => {
            let base = std::env::current_dir().context("Failed to read working directory")?;
            let loader = ModelLoader::new(base, settings.loader.worker_threads)?;
            let id = loader.request(path);
            viewer.begin_load(id, path.display().to_string());

            let timeout = Duration::from_secs(settings.loader.timeout_secs);
            let outcome = loader
                .wait_latest(timeout)
                .with_context(|| format!("No result for {} within {:?}", path.display(), timeout))?;
            viewer.apply(outcome);
        }
        None => {
            info!("No model given, showing demo scene");
            viewer.show_scene(shapes::demo_scene());
        }
    }

    if let LoadPhase::Failed(message) = viewer.phase() {
        bail!("{}", message);
    }

    if let Some(model) = viewer.processed() {
        info!("{}", model.stats);
        info!(
            "Bounding sphere: center ({:.4}, {:.4}, {:.4}), radius {:.4}",
            model.sphere.center.x, model.sphere.center.y, model.sphere.center.z, model.sphere.radius
        );
    }

    for _ in ViewMode::ALL {
        if let Some(primitive) = viewer.primitive() {
            info!(
                "{}: {} surface vertices, {} overlay elements",
                primitive.mode(),
                primitive.surface().len(),
                primitive.overlay_len()
            );
        }
        viewer.cycle_mode();
    }

    animate(&mut viewer, &settings.animation, args.frames);
    info!("{}", viewer.overlay_text());
    Ok(())
}

/// Run the root transform animations for `frames` fixed steps.
fn animate(viewer: &mut Viewer, settings: &AnimationSettings, frames: u32) {
    if !settings.enabled {
        return;
    }
    let Some(scene) = viewer.scene_mut() else {
        return;
    };

    let root = scene.root();
    let transform = &mut scene.node_mut(root).transform;
    let mut time = GameTime::new(settings.time.clone());
    let mut oscillator = Oscillator::new(settings.oscillator.clone(), transform);
    let mut sway = Sway::new(settings.sway.clone(), transform);
    if settings.sway_enabled {
        sway.toggle();
    }
    let mut rng = rand::thread_rng();

    for _ in 0..frames {
        time.update(FRAME_DELTA);
        oscillator.tick(transform, time.delta_time, time.elapsed(), &mut rng);
        sway.tick(transform, time.elapsed());
    }

    info!(
        "After {} frames ({:.2}s): position {:?}, scale {:?}",
        time.frame_count,
        time.elapsed(),
        transform.position,
        transform.scale
    );
}
