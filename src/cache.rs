//! Compiled-template cache and invalidation
//!
//! The registry is an explicit cache service scoped to one adapter, not
//! ambient global state. Entries are keyed either by a view's handle or by
//! its root-relative path; a view loaded both ways occupies both keys, and
//! invalidation clears both. Compiled templates are immutable `Arc`s:
//! eviction drops registry entries and never touches a template an in-flight
//! render may still hold.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use crate::engine::CompiledTemplate;
use crate::library::{ComponentLibrary, ChangeEvent, Subscription, ViewRef};

/// Cache mapping template keys to compiled templates.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    entries: Arc<Mutex<HashMap<String, Arc<dyn CompiledTemplate>>>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn CompiledTemplate>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: String, template: Arc<dyn CompiledTemplate>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, template);
    }

    /// Remove the entry under `key`. A missing key is a no-op: invalidation
    /// may legitimately race ahead of compilation.
    pub fn evict(&self, key: &str) {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if removed.is_some() {
            tracing::debug!(key, "evicted compiled template");
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The cache key for a view path: the path relative to the library root,
/// with forward slashes.
pub(crate) fn path_key(library_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(library_root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

/// Reacts to library change events by evicting matching registry entries.
pub struct CacheInvalidator;

impl CacheInvalidator {
    /// Subscribe `registry` to `library`'s change events. All four event
    /// kinds (view/wrapper, updated/removed) invalidate the same way; the
    /// handler is idempotent, so duplicate or out-of-order delivery at the
    /// collaborator boundary is harmless.
    pub fn attach(registry: &TemplateRegistry, library: &dyn ComponentLibrary) -> Subscription {
        let registry = registry.clone();
        let root = library.full_path().to_path_buf();
        library.subscribe(Arc::new(move |event: &ChangeEvent| {
            match event.view_ref() {
                ViewRef::View(view) => {
                    registry.evict(&path_key(&root, &view.path));
                    if let Some(handle) = &view.handle {
                        registry.evict(handle);
                    }
                }
                ViewRef::Path(path) => {
                    registry.evict(&path_key(&root, path));
                }
            }
        }))
    }
}
