//! Context patching
//!
//! Every render call passes through here so the `_self` reference matches
//! the component actually being rendered, not whatever entity kicked off the
//! top-level render. The patcher also keeps the derived `_keys` index in
//! step with the context: an ordered list of non-private keys, recomputed
//! recursively into nested plain mappings.
//!
//! `_keys` reflects the key set at the moment of the last patch; mutation
//! outside the patcher leaves it stale. Known limitation, not a bug.

use std::sync::Arc;

use serde_json::Value;

use crate::config::AdapterConfig;
use crate::engine::ContextMap;
use crate::library::ComponentLibrary;
use crate::resolve::{join_root, resolve_rooted};

/// Optional render metadata supplied by the host at the entry point.
#[derive(Debug, Clone, Default)]
pub struct RenderMeta {
    /// Identifies the entity the top-level render is for.
    pub self_entity: Option<Value>,
    /// Output destination identifier.
    pub target: Option<Value>,
    /// Environment descriptor.
    pub env: Option<Value>,
}

/// Inject reserved keys from render metadata, never overwriting keys the
/// caller already supplied.
pub fn inject_reserved(context: &mut ContextMap, meta: &RenderMeta, config: Value) {
    if let Some(self_entity) = &meta.self_entity {
        context
            .entry("_self".to_string())
            .or_insert_with(|| self_entity.clone());
    }
    if let Some(target) = &meta.target {
        context
            .entry("_target".to_string())
            .or_insert_with(|| target.clone());
    }
    if let Some(env) = &meta.env {
        context
            .entry("_env".to_string())
            .or_insert_with(|| env.clone());
    }
    context.entry("_config".to_string()).or_insert(config);
}

/// Corrects `_self` and merges component context for every render call.
pub struct ContextPatcher {
    library: Arc<dyn ComponentLibrary>,
    config: AdapterConfig,
}

impl ContextPatcher {
    pub fn new(library: Arc<dyn ComponentLibrary>, config: AdapterConfig) -> Self {
        Self { library, config }
    }

    /// Produce the context to render `identity` with.
    ///
    /// The caller's map is never mutated; when patching applies, the result
    /// is a deep-merged copy. In `pristine` mode, or when no owning
    /// component can be resolved, or when context import is disabled, the
    /// context comes back unchanged.
    pub fn patch(&self, identity: &str, context: &ContextMap) -> ContextMap {
        if self.config.pristine {
            return context.clone();
        }

        let Some(handle) = self.owning_handle(identity) else {
            return context.clone();
        };

        let stripped = handle
            .strip_prefix(&self.config.handle_prefix)
            .unwrap_or(&handle);
        let identifier = format!("{}{}", self.config.entity_marker, stripped);

        let Some(variant) = self
            .library
            .find(&identifier)
            .and_then(|entity| entity.into_variant())
        else {
            return context.clone();
        };

        if !self.config.import_context {
            return context.clone();
        }

        tracing::trace!(identity, variant = %variant.handle, "importing component context");

        let mut patched = context.clone();
        merge_defaults(&mut patched, &variant.context);
        patched.insert("_self".to_string(), variant.serialize());
        regenerate_keys(&mut patched);
        patched
    }

    /// Resolve the rendering template's identity back to its owning
    /// component's handle. An identity that is already a handle is used
    /// directly; a rooted identity goes through category-anchor resolution,
    /// so a depth-prefixed include reference still finds its view; anything
    /// else is joined onto the library root and matched against the view
    /// collection.
    fn owning_handle(&self, identity: &str) -> Option<String> {
        if !self.config.handle_prefix.is_empty()
            && identity.starts_with(&self.config.handle_prefix)
        {
            return Some(identity.to_string());
        }
        let root = self.library.full_path();
        let target = if identity.starts_with('/') {
            resolve_rooted(identity, root, &self.config.categories)
                .unwrap_or_else(|_| join_root(root, identity))
        } else {
            join_root(root, identity)
        };
        self.library
            .views()
            .into_iter()
            .find(|view| join_root(root, &view.path.to_string_lossy()) == target)
            .and_then(|view| view.handle)
    }
}

/// Deep-merge `defaults` into `target`: existing values win, missing keys
/// are filled in, nested plain mappings merge recursively.
pub fn merge_defaults(target: &mut ContextMap, defaults: &ContextMap) {
    for (key, default_value) in defaults {
        match target.get_mut(key) {
            Some(Value::Object(nested)) => {
                if let Value::Object(default_nested) = default_value {
                    merge_defaults(nested, default_nested);
                }
            }
            Some(_) => {}
            None => {
                target.insert(key.clone(), default_value.clone());
            }
        }
    }
}

/// Recompute the `_keys` index over `map` and recursively over every nested
/// plain mapping reachable through a non-private key.
///
/// Private keys (leading underscore) are excluded from the index and never
/// descended into, which also makes the operation idempotent: `_keys` itself
/// is private, so a second pass sees the same key set.
pub fn regenerate_keys(map: &mut ContextMap) {
    let keys: Vec<String> = map
        .keys()
        .filter(|key| !key.starts_with('_'))
        .cloned()
        .collect();

    map.insert(
        "_keys".to_string(),
        Value::Array(keys.iter().cloned().map(Value::String).collect()),
    );

    for key in keys {
        if let Some(Value::Object(nested)) = map.get_mut(&key) {
            regenerate_keys(nested);
        }
    }
}
