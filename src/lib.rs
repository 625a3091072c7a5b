//! Componentry - template resolution for hierarchical component libraries
//!
//! This library resolves logical template references (handles, rooted paths,
//! relative paths) within a component library into concrete template source,
//! caches compiled templates, and patches per-component render context so
//! nested inclusion behaves consistently at any depth. The templating
//! grammar/evaluator and the component library itself are external
//! collaborators, consumed through the traits in [`engine`] and [`library`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use componentry::{AdapterConfig, InMemoryLibrary, LoadParams, TemplateLoader, View};
//!
//! let library = Arc::new(InMemoryLibrary::new("/site/library"));
//! library.insert_view(View::new("atoms/button/button.html", Some("@button"), "<button/>"));
//!
//! let loader = TemplateLoader::new(library, AdapterConfig::default());
//! let loaded = loader.load("@button", &LoadParams::default()).unwrap();
//! assert_eq!(loaded.content, "<button/>");
//! ```

pub mod adapter;
pub mod cache;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod library;
pub mod loader;
pub mod resolve;

pub use adapter::Adapter;
pub use cache::{CacheInvalidator, TemplateRegistry};
pub use config::{AdapterConfig, ConfigError};
pub use context::{inject_reserved, merge_defaults, regenerate_keys, ContextPatcher, RenderMeta};
pub use engine::{CompiledTemplate, ContextMap, EngineError, IncludeResolver, TemplateEngine};
pub use error::AdapterError;
pub use library::{
    ChangeEvent, ChangeHandler, Component, ComponentLibrary, Entity, EventBus, InMemoryLibrary,
    Subscription, Variant, View, ViewRef,
};
pub use loader::{LoadParams, LoadedSource, TemplateLoader};
pub use resolve::{join_root, resolve_rooted};
