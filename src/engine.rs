//! The evaluator boundary
//!
//! The adapter does not parse or evaluate template text itself; the host
//! supplies an engine implementing [`TemplateEngine`]. The engine hands back
//! opaque [`CompiledTemplate`] objects, and during evaluation routes every
//! include it encounters through an [`IncludeResolver`] so the adapter can
//! load, patch, and cache on its behalf.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

/// Render context: an ordered mapping from string keys to JSON values.
pub type ContextMap = Map<String, Value>;

/// Failure raised by the evaluator during compilation or evaluation.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Resolves include references encountered mid-evaluation.
///
/// Implemented by the adapter: a nested include goes through the same
/// load → patch → render path as the top-level call, so the context patcher
/// intercepts every render without touching engine internals.
pub trait IncludeResolver {
    fn render_include(&self, location: &str, context: &ContextMap) -> Result<String, EngineError>;
}

/// A compiled template produced by the engine.
///
/// Compiled templates are immutable once produced; cache invalidation only
/// ever drops registry entries, so an in-flight render holding one of these
/// is never affected by a concurrent eviction.
pub trait CompiledTemplate: Send + Sync {
    /// The location string this template was compiled from (handle or path).
    fn identity(&self) -> &str;

    /// Evaluate the template against `context`, resolving includes through
    /// `includes`.
    fn render(&self, context: &ContextMap, includes: &dyn IncludeResolver)
        -> Result<String, EngineError>;
}

/// The template evaluator supplied by the host.
pub trait TemplateEngine: Send + Sync {
    fn compile(&self, identity: &str, source: &str)
        -> Result<Arc<dyn CompiledTemplate>, EngineError>;

    /// Toggle the engine's own template caching. The adapter forces this off
    /// at setup time because it owns caching (see `TemplateRegistry`).
    fn set_caching(&self, _enabled: bool) {}
}
