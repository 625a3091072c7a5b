//! Composition root
//!
//! Wires the loader, context patcher, registry, and cache invalidation
//! around a host-supplied engine and library. Composed once at setup; the
//! patcher wraps every render as an explicit decorator, never by mutating
//! engine internals, and the registry is owned here rather than reached
//! through ambient global state.

use std::sync::Arc;

use serde_json::Value;

use crate::cache::{path_key, CacheInvalidator, TemplateRegistry};
use crate::config::AdapterConfig;
use crate::context::{inject_reserved, ContextPatcher, RenderMeta};
use crate::engine::{
    CompiledTemplate, ContextMap, EngineError, IncludeResolver, TemplateEngine,
};
use crate::error::AdapterError;
use crate::library::ComponentLibrary;
use crate::loader::{LoadParams, TemplateLoader};
use crate::resolve::resolve_rooted;

pub struct Adapter {
    engine: Arc<dyn TemplateEngine>,
    library: Arc<dyn ComponentLibrary>,
    config: AdapterConfig,
    registry: TemplateRegistry,
    loader: TemplateLoader,
    patcher: ContextPatcher,
    // Held for its lifetime; dropping the adapter detaches invalidation
    _invalidation: crate::library::Subscription,
}

impl Adapter {
    pub fn new(
        engine: Arc<dyn TemplateEngine>,
        library: Arc<dyn ComponentLibrary>,
        config: AdapterConfig,
    ) -> Self {
        // This core owns caching; the engine's must stay off
        engine.set_caching(false);

        let registry = TemplateRegistry::new();
        let invalidation = CacheInvalidator::attach(&registry, library.as_ref());
        let loader = TemplateLoader::new(library.clone(), config.clone());
        let patcher = ContextPatcher::new(library.clone(), config.clone());

        Self {
            engine,
            library,
            config,
            registry,
            loader,
            patcher,
            _invalidation: invalidation,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Render the entry-point template at `path` with the given raw source.
    ///
    /// Reserved keys from `meta` (and `_config`) are injected only if the
    /// caller did not already supply them. Rendering is synchronous and runs
    /// to completion or failure; nothing is retried.
    pub fn render(
        &self,
        path: &str,
        source: &str,
        context: ContextMap,
        meta: RenderMeta,
    ) -> Result<String, AdapterError> {
        let mut context = context;
        let config = serde_json::to_value(&self.config).unwrap_or(Value::Null);
        inject_reserved(&mut context, &meta, config);

        let params = LoadParams {
            source: Some(source.to_string()),
        };
        let compiled = self.compiled_for(path, &params)?;
        self.render_compiled(&compiled, &context)
    }

    /// Cache lookup, then load + compile + store on a miss.
    ///
    /// Raw-source renders bypass the registry: the caller owns that source
    /// and may pass different text for the same path next time.
    fn compiled_for(
        &self,
        location: &str,
        params: &LoadParams,
    ) -> Result<Arc<dyn CompiledTemplate>, AdapterError> {
        if params.source.is_some() {
            let loaded = self.loader.load(location, params)?;
            return self
                .engine
                .compile(location, &loaded.content)
                .map_err(|source| AdapterError::Render {
                    location: location.to_string(),
                    source,
                });
        }

        let key = self.cache_key(location);
        if let Some(hit) = self.registry.get(&key) {
            tracing::trace!(location, key = %key, "compiled template cache hit");
            return Ok(hit);
        }

        let loaded = self.loader.load(location, params)?;
        let compiled = self
            .engine
            .compile(location, &loaded.content)
            .map_err(|source| AdapterError::Render {
                location: location.to_string(),
                source,
            })?;
        self.registry.insert(key, compiled.clone());
        Ok(compiled)
    }

    /// Patch context for the template's identity, then delegate to the
    /// engine. Transparent to output and error propagation.
    fn render_compiled(
        &self,
        compiled: &Arc<dyn CompiledTemplate>,
        context: &ContextMap,
    ) -> Result<String, AdapterError> {
        let identity = compiled.identity();
        let patched = self.patcher.patch(identity, context);
        compiled
            .render(&patched, self)
            .map_err(|source| AdapterError::Render {
                location: identity.to_string(),
                source,
            })
    }

    /// Handle references cache under the handle itself; path references
    /// cache under the root-relative path.
    fn cache_key(&self, location: &str) -> String {
        if !self.config.handle_prefix.is_empty()
            && location.starts_with(&self.config.handle_prefix)
        {
            return location.to_string();
        }
        let root = self.library.full_path();
        if location.starts_with('/') {
            if let Ok(resolved) = resolve_rooted(location, root, &self.config.categories) {
                return path_key(root, &resolved);
            }
        }
        location.trim_start_matches('/').to_string()
    }
}

impl IncludeResolver for Adapter {
    fn render_include(&self, location: &str, context: &ContextMap) -> Result<String, EngineError> {
        let compiled = self
            .compiled_for(location, &LoadParams::default())
            .map_err(|err| EngineError::new(err.to_string()))?;
        self.render_compiled(&compiled, context)
            .map_err(|err| EngineError::new(err.to_string()))
    }
}
