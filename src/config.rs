//! Adapter configuration
//!
//! Controls the handle marker, category anchors for rooted path resolution,
//! and the two behavioral switches: `pristine` (disable all patching) and
//! `import_context` (merge component context into the render context).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Default configuration document. `AdapterConfig::default()` mirrors this.
const DEFAULT_CONFIG: &str = r#"
# Pass-through mode: no context patching, no handle rewriting.
pristine = false

# Marker identifying handle references, e.g. "@button".
handle_prefix = "@"

# Marker the component library expects on entity identifiers.
entity_marker = "@"

# Merge a component's own context into the render context of its includes.
import_context = true

# Top-level library folders recognized as anchors for rooted references.
categories = ["atoms", "molecules", "organisms"]
"#;

/// Configuration recognized by the adapter core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Disable all patching; every render passes through untouched.
    pub pristine: bool,
    /// Marker character(s) identifying handle references.
    pub handle_prefix: String,
    /// Marker the library collaborator uses on entity identifiers.
    pub entity_marker: String,
    /// Merge the owning component's context data into include renders.
    pub import_context: bool,
    /// Ordered set of top-level folder names used as resolution anchors.
    pub categories: Vec<String>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            pristine: false,
            handle_prefix: "@".to_string(),
            entity_marker: "@".to_string(),
            import_context: true,
            categories: vec![
                "atoms".to_string(),
                "molecules".to_string(),
                "organisms".to_string(),
            ],
        }
    }
}

impl AdapterConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string. Missing keys fall back to
    /// their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_document_matches_default_impl() {
        let parsed = AdapterConfig::from_toml(DEFAULT_CONFIG).expect("Should parse");
        assert_eq!(parsed, AdapterConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let parsed = AdapterConfig::from_toml("pristine = true").expect("Should parse");
        assert!(parsed.pristine);
        assert_eq!(parsed.handle_prefix, "@");
        assert_eq!(parsed.categories.len(), 3);
    }

    #[test]
    fn test_custom_categories() {
        let parsed = AdapterConfig::from_toml(r#"categories = ["components", "docs"]"#)
            .expect("Should parse");
        assert_eq!(parsed.categories, vec!["components", "docs"]);
    }
}
