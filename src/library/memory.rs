//! In-memory component library
//!
//! A `ComponentLibrary` implementation backed by plain vectors, used by hosts
//! that load their library up front and by tests. View enumeration preserves
//! registration order, which makes duplicate-path lookups deterministic.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{
    ChangeEvent, ChangeHandler, Component, ComponentLibrary, Entity, EventBus, Subscription,
    View, ViewRef,
};

#[derive(Default)]
struct LibraryState {
    views: Vec<View>,
    components: Vec<Component>,
}

pub struct InMemoryLibrary {
    root: PathBuf,
    state: Mutex<LibraryState>,
    bus: EventBus,
}

impl InMemoryLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            state: Mutex::new(LibraryState::default()),
            bus: EventBus::new(),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LibraryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_view(&self, view: View) {
        self.state().views.push(view);
    }

    pub fn insert_component(&self, component: Component) {
        self.state().components.push(component);
    }

    /// Replace the view at the same path (or register it) and notify
    /// subscribers.
    pub fn update_view(&self, view: View) {
        {
            let mut state = self.state();
            match state.views.iter_mut().find(|v| v.path == view.path) {
                Some(existing) => *existing = view.clone(),
                None => state.views.push(view.clone()),
            }
        }
        // Emit outside the lock; handlers may call back into the library
        self.bus.emit(&ChangeEvent::ViewUpdated(ViewRef::View(view)));
    }

    /// Remove the view at `path` and notify subscribers.
    pub fn remove_view(&self, path: &Path) {
        let removed = {
            let mut state = self.state();
            let index = state.views.iter().position(|v| v.path == path);
            index.map(|i| state.views.remove(i))
        };
        let view_ref = match removed {
            Some(view) => ViewRef::View(view),
            None => ViewRef::Path(path.to_path_buf()),
        };
        self.bus.emit(&ChangeEvent::ViewRemoved(view_ref));
    }

    /// Forward an arbitrary change event, e.g. wrapper updates from the
    /// host's file watcher.
    pub fn emit(&self, event: ChangeEvent) {
        self.bus.emit(&event);
    }
}

impl ComponentLibrary for InMemoryLibrary {
    fn find(&self, identifier: &str) -> Option<Entity> {
        let state = self.state();
        for component in &state.components {
            if component.handle == identifier {
                return Some(Entity::Component(component.clone()));
            }
            for variant in &component.variants {
                if variant.handle == identifier {
                    return Some(Entity::Variant(variant.clone()));
                }
            }
        }
        None
    }

    fn views(&self) -> Vec<View> {
        self.state().views.clone()
    }

    fn full_path(&self) -> &Path {
        &self.root
    }

    fn subscribe(&self, handler: ChangeHandler) -> Subscription {
        self.bus.subscribe(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ContextMap;
    use crate::library::Variant;
    use pretty_assertions::assert_eq;

    fn library() -> InMemoryLibrary {
        let library = InMemoryLibrary::new("/lib");
        library.insert_view(View::new(
            "atoms/button/button.html",
            Some("@button"),
            "<button/>",
        ));
        library.insert_component(
            Component::new("@button", "Button")
                .with_variant(Variant::new("@button--default", "default", ContextMap::new())
                    .with_default(true))
                .with_variant(Variant::new("@button--primary", "primary", ContextMap::new())),
        );
        library
    }

    #[test]
    fn test_find_component_by_handle() {
        let library = library();
        let entity = library.find("@button").expect("Should find");
        let variant = entity.into_variant().expect("Should have a variant");
        assert_eq!(variant.name, "default");
    }

    #[test]
    fn test_find_specific_variant() {
        let library = library();
        let entity = library.find("@button--primary").expect("Should find");
        let variant = entity.into_variant().expect("Should be a variant");
        assert_eq!(variant.name, "primary");
    }

    #[test]
    fn test_find_unknown_handle() {
        assert!(library().find("@missing").is_none());
    }

    #[test]
    fn test_update_view_replaces_in_place() {
        let library = library();
        library.update_view(View::new(
            "atoms/button/button.html",
            Some("@button"),
            "<button>v2</button>",
        ));
        let views = library.views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].content, "<button>v2</button>");
    }

    #[test]
    fn test_views_preserve_registration_order() {
        let library = library();
        library.insert_view(View::new("atoms/button/button.html", None, "shadowed"));
        let views = library.views();
        // First registration stays first; duplicate-path lookups are stable
        assert_eq!(views[0].content, "<button/>");
        assert_eq!(views[1].content, "shadowed");
    }
}
