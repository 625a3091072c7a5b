//! The component-library boundary
//!
//! The library collaborator owns views (template entries), components and
//! their variants; this core only observes and reacts. Hosts implement
//! [`ComponentLibrary`], or use the provided [`InMemoryLibrary`].

mod events;
mod memory;

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::engine::ContextMap;

pub use events::{EventBus, Subscription};
pub use memory::InMemoryLibrary;

/// One template entry in the component library.
#[derive(Debug, Clone)]
pub struct View {
    /// Location relative to the library root.
    pub path: PathBuf,
    /// Stable logical identifier, marker-prefixed, unique within the library.
    /// Views without an owning component (e.g. plain pages) carry none.
    pub handle: Option<String>,
    /// Raw template source.
    pub content: String,
}

impl View {
    pub fn new(
        path: impl Into<PathBuf>,
        handle: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            handle: handle.map(str::to_string),
            content: content.into(),
        }
    }
}

/// An alternate configured rendering of a component entity.
#[derive(Debug, Clone)]
pub struct Variant {
    /// Marker-prefixed identifier, e.g. `@button--primary`.
    pub handle: String,
    pub name: String,
    pub label: String,
    pub is_default: bool,
    /// The variant's own context data, merged into include renders when
    /// context import is enabled.
    pub context: ContextMap,
}

impl Variant {
    pub fn new(handle: impl Into<String>, name: impl Into<String>, context: ContextMap) -> Self {
        let name = name.into();
        Self {
            handle: handle.into(),
            label: name.clone(),
            name,
            is_default: false,
            context,
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Serialized representation injected under `_self`.
    pub fn serialize(&self) -> Value {
        let mut map = ContextMap::new();
        map.insert("handle".to_string(), Value::String(self.handle.clone()));
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert("label".to_string(), Value::String(self.label.clone()));
        map.insert("context".to_string(), Value::Object(self.context.clone()));
        Value::Object(map)
    }
}

/// A component entity: an ordered collection of variants, one default.
#[derive(Debug, Clone)]
pub struct Component {
    /// Marker-prefixed identifier, e.g. `@button`.
    pub handle: String,
    pub label: String,
    pub variants: Vec<Variant>,
}

impl Component {
    pub fn new(handle: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            label: label.into(),
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    /// The variant marked default, falling back to the first.
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.is_default)
            .or_else(|| self.variants.first())
    }
}

/// Result of a `find` lookup: either a whole component or a specific variant.
#[derive(Debug, Clone)]
pub enum Entity {
    Component(Component),
    Variant(Variant),
}

impl Entity {
    /// The concrete variant to render: a specific variant as-is, a
    /// component's default otherwise.
    pub fn into_variant(self) -> Option<Variant> {
        match self {
            Entity::Variant(variant) => Some(variant),
            Entity::Component(component) => component.default_variant().cloned(),
        }
    }
}

/// The view a change event refers to, or just its path when that is all the
/// collaborator can provide.
#[derive(Debug, Clone)]
pub enum ViewRef {
    View(View),
    Path(PathBuf),
}

/// Change events delivered by the library collaborator.
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    ViewUpdated(ViewRef),
    ViewRemoved(ViewRef),
    WrapperUpdated(ViewRef),
    WrapperRemoved(ViewRef),
}

impl ChangeEvent {
    pub fn view_ref(&self) -> &ViewRef {
        match self {
            ChangeEvent::ViewUpdated(view_ref)
            | ChangeEvent::ViewRemoved(view_ref)
            | ChangeEvent::WrapperUpdated(view_ref)
            | ChangeEvent::WrapperRemoved(view_ref) => view_ref,
        }
    }
}

/// Handler invoked for every change event, in delivery order.
pub type ChangeHandler = std::sync::Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// The component-library abstraction this core consumes.
pub trait ComponentLibrary: Send + Sync {
    /// Look up an entity by its marker-prefixed identifier.
    fn find(&self, identifier: &str) -> Option<Entity>;

    /// All views, in registration order. Lookup ambiguity (duplicate paths)
    /// resolves first-match against this ordering.
    fn views(&self) -> Vec<View>;

    /// The library's root filesystem location, used only as a join base.
    fn full_path(&self) -> &Path;

    /// Subscribe to change events. Dropping the subscription (or calling
    /// `unsubscribe`) detaches the handler.
    fn subscribe(&self, handler: ChangeHandler) -> Subscription;
}
