use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use meshview_geometry::SceneGraph;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::AssetError;
use crate::handle::LoadId;
use crate::model::load_model;

/// A finished load request.
#[derive(Debug)]
pub struct LoadOutcome {
    pub id: LoadId,
    pub label: String,
    pub result: Result<SceneGraph, AssetError>,
}

/// Loads models off the caller's thread.
///
/// Owns a background tokio runtime; parsing runs on its blocking pool and
/// results come back over a channel. Only the most recent request counts:
/// results of superseded requests are dropped, whichever order they finish in.
pub struct ModelLoader {
    runtime: tokio::runtime::Runtime,
    base_path: PathBuf,
    latest: Arc<AtomicU64>,
    sender: mpsc::Sender<LoadOutcome>,
    receiver: Mutex<mpsc::Receiver<LoadOutcome>>,
}

impl ModelLoader {
    /// Create a loader rooted at `base_path` with `worker_threads` runtime threads.
    pub fn new(base_path: impl Into<PathBuf>, worker_threads: usize) -> Result<Self, AssetError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("meshview-loader")
            .enable_all()
            .build()
            .map_err(|e| AssetError::LoaderUnavailable(format!("failed to create runtime: {}", e)))?;

        let base_path = base_path.into();
        info!("ModelLoader created with base path: {}", base_path.display());

        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            runtime,
            base_path,
            latest: Arc::new(AtomicU64::new(0)),
            sender,
            receiver: Mutex::new(receiver),
        })
    }

    /// Resolve a relative model path against the base path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Start loading a model file. Supersedes every earlier request.
    pub fn request(&self, path: &Path) -> LoadId {
        let full_path = self.resolve(path);
        let label = full_path.display().to_string();
        self.request_with(label, move || load_model(&full_path))
    }

    /// Run an arbitrary scene-producing job as a load request.
    pub fn request_with<F>(&self, label: impl Into<String>, work: F) -> LoadId
    where
        F: FnOnce() -> Result<SceneGraph, AssetError> + Send + 'static,
    {
        let id = LoadId::new(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        let label = label.into();
        debug!("{} requested: {}", id, label);

        let latest = Arc::clone(&self.latest);
        let sender = self.sender.clone();
        self.runtime.spawn_blocking(move || {
            if latest.load(Ordering::SeqCst) != id.raw() {
                debug!("{} superseded before start: {}", id, label);
                return;
            }
            let result = work();
            let _ = sender.send(LoadOutcome { id, label, result });
        });

        id
    }

    /// Id of the most recent request, if any was made.
    pub fn latest(&self) -> Option<LoadId> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            raw => Some(LoadId::new(raw)),
        }
    }

    pub fn is_current(&self, id: LoadId) -> bool {
        self.latest() == Some(id)
    }

    /// Non-blocking check for the latest request's result.
    pub fn poll(&self) -> Option<LoadOutcome> {
        let receiver = self.receiver.lock();
        let mut current = None;
        while let Ok(outcome) = receiver.try_recv() {
            if let Some(outcome) = self.keep_if_current(outcome) {
                current = Some(outcome);
            }
        }
        current
    }

    /// Block until the latest request finishes or `timeout` elapses.
    pub fn wait_latest(&self, timeout: Duration) -> Option<LoadOutcome> {
        let deadline = Instant::now() + timeout;
        let receiver = self.receiver.lock();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match receiver.recv_timeout(remaining) {
                Ok(outcome) => {
                    if let Some(outcome) = self.keep_if_current(outcome) {
                        return Some(outcome);
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    warn!("Timed out waiting for {:?}", self.latest());
                    return None;
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn keep_if_current(&self, outcome: LoadOutcome) -> Option<LoadOutcome> {
        if self.is_current(outcome.id) {
            Some(outcome)
        } else {
            debug!("Discarding stale result {} ({})", outcome.id, outcome.label);
            None
        }
    }

    /// The base path this loader resolves relative paths against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
