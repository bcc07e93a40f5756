//! Global loading coordinator
//!
//! Independent subsystems register named loaders while they do async work.
//! The coordinator aggregates them into one "is anything loading" signal and
//! exposes the most recent loader's message and progress for the overlay.
//! Every operation is total: unknown ids are no-ops, never errors.

pub mod indicator;

pub use indicator::LoadingIndicator;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// One active loader
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingEntry {
    pub id: String,
    pub message: String,
    pub progress: Option<f64>,
    generation: u64,
}

impl LoadingEntry {
    /// Progress clamped to 0..=100 for display
    pub fn percent(&self) -> Option<u8> {
        self.progress.map(|p| {
            if p.is_nan() {
                0
            } else {
                p.clamp(0.0, 100.0).round() as u8
            }
        })
    }
}

struct Shared {
    entries: Mutex<Registry>,
    busy: watch::Sender<bool>,
}

#[derive(Default)]
struct Registry {
    /// Registration order; the last entry is the current one
    entries: Vec<LoadingEntry>,
    next_generation: u64,
}

/// Cloneable handle to one loader registry
#[derive(Clone)]
pub struct LoadingCoordinator {
    shared: Arc<Shared>,
}

impl LoadingCoordinator {
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(Registry::default()),
                busy,
            }),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // The registry holds plain data, so a poisoned lock is still consistent
        self.shared.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, registry: &Registry) {
        let busy = !registry.entries.is_empty();
        self.shared.busy.send_if_modified(|current| {
            if *current == busy {
                false
            } else {
                *current = busy;
                true
            }
        });
    }

    /// Register a loader
    ///
    /// Showing an id that is already active updates it and moves it to the
    /// end, so its message becomes the current one.
    pub fn show_loading(&self, id: &str, message: &str, progress: Option<f64>) {
        self.register(id, message, progress);
    }

    fn register(&self, id: &str, message: &str, progress: Option<f64>) -> u64 {
        let mut registry = self.registry();

        let generation = match registry.entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                let mut entry = registry.entries.remove(pos);
                entry.message = message.to_string();
                entry.progress = progress;
                let generation = entry.generation;
                registry.entries.push(entry);
                generation
            }
            None => {
                registry.next_generation += 1;
                let generation = registry.next_generation;
                registry.entries.push(LoadingEntry {
                    id: id.to_string(),
                    message: message.to_string(),
                    progress,
                    generation,
                });
                log::debug!("Loader '{}' started: {}", id, message);
                generation
            }
        };

        self.publish(&registry);
        generation
    }

    /// Remove a loader; returns whether it was active
    pub fn hide_loading(&self, id: &str) -> bool {
        self.remove_where(|entry| entry.id == id)
    }

    fn hide_generation(&self, id: &str, generation: u64) -> bool {
        self.remove_where(|entry| entry.id == id && entry.generation == generation)
    }

    fn remove_where(&self, matches: impl Fn(&LoadingEntry) -> bool) -> bool {
        let mut registry = self.registry();
        let Some(pos) = registry.entries.iter().position(|e| matches(e)) else {
            return false;
        };

        let entry = registry.entries.remove(pos);
        log::debug!("Loader '{}' finished", entry.id);
        self.publish(&registry);
        true
    }

    /// Update the progress of an active loader; absent ids are left absent
    pub fn update_progress(&self, id: &str, progress: f64) -> bool {
        self.set_progress_where(|entry| entry.id == id, progress)
    }

    fn set_progress_where(&self, matches: impl Fn(&LoadingEntry) -> bool, progress: f64) -> bool {
        let mut registry = self.registry();
        match registry.entries.iter_mut().find(|e| matches(e)) {
            Some(entry) => {
                entry.progress = Some(progress);
                true
            }
            None => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.registry().entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<LoadingEntry> {
        self.registry().entries.iter().find(|e| e.id == id).cloned()
    }

    /// The most recently registered active loader
    pub fn current(&self) -> Option<LoadingEntry> {
        self.registry().entries.last().cloned()
    }

    /// Active loader ids in registration order
    pub fn active_ids(&self) -> Vec<String> {
        self.registry().entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Drop every active loader
    pub fn clear_all(&self) {
        let mut registry = self.registry();
        if !registry.entries.is_empty() {
            log::debug!("Clearing {} active loaders", registry.entries.len());
            registry.entries.clear();
        }
        self.publish(&registry);
    }

    /// Watch the aggregate `is_loading` signal
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shared.busy.subscribe()
    }

    /// Register a loader that is hidden again when the guard drops
    pub fn begin(&self, id: &str, message: &str) -> LoadingGuard {
        let generation = self.register(id, message, None);
        LoadingGuard {
            coordinator: self.clone(),
            id: id.to_string(),
            generation,
        }
    }

    /// Run a future with a loader registered for its duration
    pub async fn with_loading<F, T>(&self, id: &str, message: &str, future: F) -> T
    where
        F: Future<Output = T>,
    {
        let _guard = self.begin(id, message);
        future.await
    }
}

impl Default for LoadingCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII registration of one loader
///
/// Dropping the guard hides the loader, but only the registration it created:
/// if the id was hidden and registered again by someone else meanwhile, the
/// newer loader stays.
pub struct LoadingGuard {
    coordinator: LoadingCoordinator,
    id: String,
    generation: u64,
}

impl LoadingGuard {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Update progress; returns `false` once the loader is no longer ours
    pub fn progress(&self, progress: f64) -> bool {
        self.coordinator
            .set_progress_where(|entry| entry.id == self.id && entry.generation == self.generation, progress)
    }

    pub fn is_active(&self) -> bool {
        self.coordinator
            .get(&self.id)
            .is_some_and(|entry| entry.generation == self.generation)
    }

    /// Hide the loader now
    pub fn finish(self) {}
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.coordinator.hide_generation(&self.id, self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_loaders_aggregate() {
        let loading = LoadingCoordinator::new();
        loading.show_loading("a", "msg", None);
        loading.show_loading("b", "msg2", Some(10.0));

        assert!(loading.is_loading());
        assert_eq!(loading.get("a").unwrap().message, "msg");
        assert_eq!(loading.get("b").unwrap().progress, Some(10.0));

        loading.hide_loading("a");
        assert!(loading.is_loading());
        loading.hide_loading("b");
        assert!(!loading.is_loading());
    }

    #[test]
    fn test_show_again_becomes_current() {
        let loading = LoadingCoordinator::new();
        loading.show_loading("a", "first", None);
        loading.show_loading("b", "other", None);
        loading.show_loading("a", "second", Some(30.0));

        // Still one entry per id
        assert_eq!(loading.active_ids(), vec!["b", "a"]);
        let current = loading.current().unwrap();
        assert_eq!(current.id, "a");
        assert_eq!(current.message, "second");
        assert_eq!(current.progress, Some(30.0));
    }

    #[test]
    fn test_guard_survives_show_again() {
        let loading = LoadingCoordinator::new();
        let guard = loading.begin("sync", "Syncing");
        loading.show_loading("other", "Other", None);
        loading.show_loading("sync", "Syncing again", None);

        assert!(guard.is_active());
        assert!(guard.progress(60.0));
        drop(guard);
        assert_eq!(loading.active_ids(), vec!["other"]);
    }

    #[test]
    fn test_stale_guard_progress_never_reaches_newer_loader() {
        let loading = LoadingCoordinator::new();
        let stale = loading.begin("config", "first run");
        loading.hide_loading("config");
        let fresh = loading.begin("config", "second run");

        assert!(!stale.progress(90.0));
        assert_eq!(loading.get("config").unwrap().progress, None);
        assert!(fresh.progress(20.0));
        assert_eq!(loading.get("config").unwrap().percent(), Some(20));
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let loading = LoadingCoordinator::new();
        assert!(!loading.hide_loading("missing"));
        assert!(!loading.update_progress("missing-id", 50.0));
        assert!(!loading.is_loading());
        assert!(loading.get("missing-id").is_none());
    }

    #[test]
    fn test_update_progress_does_not_resurrect() {
        let loading = LoadingCoordinator::new();
        loading.show_loading("a", "msg", None);
        loading.hide_loading("a");
        loading.update_progress("a", 80.0);
        assert!(loading.get("a").is_none());
    }

    #[test]
    fn test_percent_is_clamped() {
        let loading = LoadingCoordinator::new();
        loading.show_loading("a", "msg", Some(140.0));
        assert_eq!(loading.get("a").unwrap().percent(), Some(100));
        loading.update_progress("a", -5.0);
        assert_eq!(loading.get("a").unwrap().percent(), Some(0));
        loading.update_progress("a", 49.6);
        assert_eq!(loading.get("a").unwrap().percent(), Some(50));
    }

    #[test]
    fn test_guard_hides_on_drop() {
        let loading = LoadingCoordinator::new();
        {
            let guard = loading.begin("config", "Loading");
            assert!(guard.progress(40.0));
            assert_eq!(loading.get("config").unwrap().percent(), Some(40));
        }
        assert!(!loading.is_loading());
    }

    #[test]
    fn test_guard_leaves_newer_registration_alone() {
        let loading = LoadingCoordinator::new();
        let guard = loading.begin("config", "first run");

        loading.hide_loading("config");
        loading.show_loading("config", "second run", None);
        assert!(!guard.is_active());
        assert!(!guard.progress(90.0));

        drop(guard);
        assert_eq!(loading.get("config").unwrap().message, "second run");
    }

    #[test]
    fn test_clear_all() {
        let loading = LoadingCoordinator::new();
        loading.show_loading("a", "msg", None);
        loading.show_loading("b", "msg", None);
        loading.clear_all();
        assert!(!loading.is_loading());
        assert!(loading.current().is_none());
    }

    #[tokio::test]
    async fn test_subscribe_tracks_aggregate() {
        let loading = LoadingCoordinator::new();
        let mut busy = loading.subscribe();
        assert!(!*busy.borrow_and_update());

        loading.show_loading("a", "msg", None);
        loading.show_loading("b", "msg", None);
        busy.changed().await.unwrap();
        assert!(*busy.borrow_and_update());

        loading.hide_loading("a");
        assert!(!busy.has_changed().unwrap());

        loading.hide_loading("b");
        busy.changed().await.unwrap();
        assert!(!*busy.borrow());
    }

    #[tokio::test]
    async fn test_with_loading_wraps_future() {
        let loading = LoadingCoordinator::new();
        let observer = loading.clone();

        let value = loading
            .with_loading("fetch", "Fetching", async move {
                assert!(observer.is_loading());
                7
            })
            .await;

        assert_eq!(value, 7);
        assert!(!loading.is_loading());
    }
}
