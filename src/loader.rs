//! Template loading
//!
//! Turns a logical location (handle, rooted path, or relative path) into
//! concrete template source from the library's view collection. Compilation
//! is the evaluator's responsibility; the loader only finds source text.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::library::ComponentLibrary;
use crate::resolve::{join_root, resolve_rooted};

/// Parameters accompanying a load request.
#[derive(Debug, Clone, Default)]
pub struct LoadParams {
    /// Precompiled source supplied by the caller. Used for top-level
    /// entry-point renders; when present no library lookup is performed.
    pub source: Option<String>,
}

/// Source text resolved for a location, plus the backing view's identity
/// when the source came from the library.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub content: String,
    pub handle: Option<String>,
    /// Library-relative path of the backing view.
    pub path: Option<PathBuf>,
}

pub struct TemplateLoader {
    library: Arc<dyn ComponentLibrary>,
    config: AdapterConfig,
}

impl TemplateLoader {
    pub fn new(library: Arc<dyn ComponentLibrary>, config: AdapterConfig) -> Self {
        Self { library, config }
    }

    /// Resolve `location` to template source.
    ///
    /// Lookup branches, in order: pass-through source from `params`, handle
    /// lookup, rooted path resolution, relative join onto the library root.
    /// Any branch that finds no view fails with `NotFound`; a rooted
    /// reference with no category anchor is converted to `NotFound` too, so
    /// the caller always gets the remediation hint.
    pub fn load(&self, location: &str, params: &LoadParams) -> Result<LoadedSource, AdapterError> {
        if let Some(source) = &params.source {
            return Ok(LoadedSource {
                content: source.clone(),
                handle: None,
                path: None,
            });
        }

        if !self.config.handle_prefix.is_empty()
            && location.starts_with(&self.config.handle_prefix)
        {
            return self.load_by_handle(location);
        }

        let root = self.library.full_path();
        let target = if location.starts_with('/') {
            resolve_rooted(location, root, &self.config.categories).map_err(|_| {
                AdapterError::NotFound {
                    location: location.to_string(),
                }
            })?
        } else {
            join_root(root, location)
        };

        tracing::trace!(location, resolved = %target.display(), "loading view by path");

        self.library
            .views()
            .into_iter()
            .find(|view| join_root(root, &view.path.to_string_lossy()) == target)
            .map(|view| LoadedSource {
                content: view.content,
                handle: view.handle,
                path: Some(view.path),
            })
            .ok_or_else(|| AdapterError::NotFound {
                location: location.to_string(),
            })
    }

    fn load_by_handle(&self, location: &str) -> Result<LoadedSource, AdapterError> {
        tracing::trace!(location, "loading view by handle");
        self.library
            .views()
            .into_iter()
            .find(|view| view.handle.as_deref() == Some(location))
            .map(|view| LoadedSource {
                content: view.content,
                handle: view.handle,
                path: Some(view.path),
            })
            .ok_or_else(|| AdapterError::NotFound {
                location: location.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{InMemoryLibrary, View};
    use pretty_assertions::assert_eq;

    fn loader() -> TemplateLoader {
        let library = InMemoryLibrary::new("/lib");
        library.insert_view(View::new(
            "atoms/button/button.html",
            Some("@button"),
            "<button/>",
        ));
        library.insert_view(View::new(
            "molecules/card/card.html",
            Some("@card"),
            "<card/>",
        ));
        TemplateLoader::new(Arc::new(library), AdapterConfig::default())
    }

    #[test]
    fn test_load_precompiled_source_skips_lookup() {
        let params = LoadParams {
            source: Some("raw".to_string()),
        };
        let loaded = loader().load("anything", &params).expect("Should load");
        assert_eq!(loaded.content, "raw");
        assert!(loaded.handle.is_none());
    }

    #[test]
    fn test_load_by_handle_returns_registered_content() {
        let loaded = loader()
            .load("@button", &LoadParams::default())
            .expect("Should load");
        assert_eq!(loaded.content, "<button/>");
        assert_eq!(loaded.path, Some(PathBuf::from("atoms/button/button.html")));
    }

    #[test]
    fn test_load_rooted_reference_from_any_depth() {
        let loader = loader();
        for location in [
            "/atoms/button/button.html",
            "/molecules/card/atoms/button/button.html",
        ] {
            let loaded = loader
                .load(location, &LoadParams::default())
                .expect("Should load");
            assert_eq!(loaded.content, "<button/>");
        }
    }

    #[test]
    fn test_load_relative_reference_joins_library_root() {
        let loaded = loader()
            .load("molecules/card/card.html", &LoadParams::default())
            .expect("Should load");
        assert_eq!(loaded.content, "<card/>");
    }

    #[test]
    fn test_load_unknown_handle_fails() {
        let result = loader().load("@missing", &LoadParams::default());
        assert!(matches!(result, Err(AdapterError::NotFound { .. })));
    }

    #[test]
    fn test_not_found_hints_at_rooted_reference() {
        let err = loader()
            .load("button.html", &LoadParams::default())
            .expect_err("Should fail");
        assert!(err.to_string().contains("rooted at the library"));
    }

    #[test]
    fn test_rooted_without_anchor_becomes_not_found() {
        let result = loader().load("/pages/home.html", &LoadParams::default());
        assert!(matches!(result, Err(AdapterError::NotFound { .. })));
    }
}
