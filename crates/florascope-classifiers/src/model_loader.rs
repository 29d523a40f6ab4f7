//! Model loading with a process-wide, path-keyed cache

use crate::classifier::Classifier;
use crate::models::LoadedModel;
use florascope_core::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Outcome of one load attempt, shared by everyone asking for the same path
type Slot = Arc<OnceLock<Result<Arc<dyn Classifier>>>>;

/// Loads serialized classifiers and caches them by path
///
/// Each path is deserialized at most once. Concurrent callers asking for the
/// same uncached path block on the first load and reuse its outcome. Failed
/// loads are cached too: a path that failed keeps failing until it is
/// invalidated. A missing path is reported without creating an entry, so it
/// loads normally once the file appears.
///
/// Cache keys are absolute paths with `.` and `..` resolved lexically, so
/// `models/iris.json` and `./models/iris.json` share one entry. Symlinks are
/// not followed; two links to one file are cached separately.
pub struct ModelLoader {
    slots: Mutex<HashMap<PathBuf, Slot>>,
    loads: AtomicUsize,
}

impl ModelLoader {
    /// Create a new loader with an empty cache
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Process-wide loader, created empty on first use
    pub fn global() -> &'static ModelLoader {
        static GLOBAL: OnceLock<ModelLoader> = OnceLock::new();
        GLOBAL.get_or_init(ModelLoader::new)
    }

    /// Load a classifier, reusing the cached handle when there is one
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the path does not exist
    /// - [`Error::Load`] if the file cannot be decoded or validated
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<dyn Classifier>> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "Model file not found");
            return Err(Error::not_found(path));
        }

        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(cache_key(path)).or_default().clone()
        };

        if let Some(outcome) = slot.get() {
            debug!(path = %path.display(), "Model cache hit");
            return outcome.clone();
        }

        slot.get_or_init(|| self.load_uncached(path)).clone()
    }

    fn load_uncached(&self, path: &Path) -> Result<Arc<dyn Classifier>> {
        self.loads.fetch_add(1, Ordering::Relaxed);

        match LoadedModel::from_file(path) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    model = %model.name(),
                    kind = %model.kind(),
                    features = model.n_features(),
                    classes = model.classes().len(),
                    "Model loaded"
                );
                let handle: Arc<dyn Classifier> = Arc::new(model);
                Ok(handle)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load model");
                Err(Error::load(path, e))
            }
        }
    }

    /// Drop the cached outcome for `path`; returns whether one existed
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        let removed = self.slots.lock().remove(&cache_key(path.as_ref())).is_some();
        if removed {
            debug!(path = %path.as_ref().display(), "Model cache entry invalidated");
        }
        removed
    }

    /// Drop every cached outcome
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    /// Check if a successfully loaded handle is cached for `path`
    pub fn is_cached(&self, path: impl AsRef<Path>) -> bool {
        self.slots
            .lock()
            .get(&cache_key(path.as_ref()))
            .and_then(|slot| slot.get())
            .map_or(false, |outcome| outcome.is_ok())
    }

    /// Number of cached paths, including cached failures
    pub fn cached_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Number of deserializations performed so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn cache_key(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut key = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                key.pop();
            }
            other => key.push(other.as_os_str()),
        }
    }
    key
}
