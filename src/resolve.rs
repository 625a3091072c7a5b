//! Path resolution for rooted template references
//!
//! A rooted reference (`/atoms/button/button.html`) must resolve to the same
//! library path no matter how deeply the including template is nested. The
//! resolver scans the reference from its last segment backward for the first
//! segment naming a configured category, then rebuilds the path from that
//! anchor onto the library root. Rightmost match wins by construction: it
//! recovers the shortest meaningful suffix, collapsing any nesting prefix the
//! include accumulated.
//!
//! Relative (unmarked) references are deliberately NOT resolved against the
//! including template's directory; they join directly onto the library root.
//! That is only correct when the relative reference is itself root-anchored
//! in practice, which is exactly why rooted references exist as the escape
//! hatch. Preserve the asymmetry.

use std::path::{Path, PathBuf};

use crate::error::AdapterError;

/// Resolve a rooted location to an absolute path under `library_root`.
///
/// Fails explicitly when no segment of `location` matches any category name;
/// silently producing an undefined path is not an option.
pub fn resolve_rooted(
    location: &str,
    library_root: &Path,
    categories: &[String],
) -> Result<PathBuf, AdapterError> {
    let segments: Vec<&str> = location.split('/').filter(|s| !s.is_empty()).collect();

    let anchor = segments
        .iter()
        .rposition(|segment| categories.iter().any(|c| c == segment));

    match anchor {
        Some(index) => {
            let mut path = library_root.to_path_buf();
            for segment in &segments[index..] {
                path.push(segment);
            }
            Ok(path)
        }
        None => Err(AdapterError::Resolution {
            location: location.to_string(),
        }),
    }
}

/// Join a location onto the library root, segment by segment.
///
/// Unlike `Path::join`, a leading `/` does not replace the root; the location
/// is always treated as relative to it.
pub fn join_root(library_root: &Path, location: &str) -> PathBuf {
    let mut path = library_root.to_path_buf();
    for segment in location.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn categories() -> Vec<String> {
        vec![
            "atoms".to_string(),
            "molecules".to_string(),
            "organisms".to_string(),
        ]
    }

    #[test]
    fn test_resolve_simple_rooted_reference() {
        let resolved = resolve_rooted("/atoms/button/button.html", Path::new("/lib"), &categories())
            .expect("Should resolve");
        assert_eq!(resolved, PathBuf::from("/lib/atoms/button/button.html"));
    }

    #[test]
    fn test_resolve_collapses_nesting_prefix() {
        // An include accumulated from depth 3 still resolves to the same path
        let resolved = resolve_rooted(
            "/organisms/header/molecules/nav/atoms/button/button.html",
            Path::new("/lib"),
            &categories(),
        )
        .expect("Should resolve");
        assert_eq!(resolved, PathBuf::from("/lib/atoms/button/button.html"));
    }

    #[test]
    fn test_resolve_rightmost_anchor_wins() {
        let resolved = resolve_rooted(
            "/atoms/molecules/card/card.html",
            Path::new("/lib"),
            &categories(),
        )
        .expect("Should resolve");
        assert_eq!(resolved, PathBuf::from("/lib/molecules/card/card.html"));
    }

    #[test]
    fn test_resolve_fails_without_category_anchor() {
        let result = resolve_rooted("/pages/home/home.html", Path::new("/lib"), &categories());
        assert!(matches!(result, Err(AdapterError::Resolution { .. })));
    }

    #[test]
    fn test_resolve_depth_independent() {
        // The same reference resolves identically regardless of caller depth
        let expected = PathBuf::from("/lib/atoms/button/button.html");
        for prefix in ["", "/molecules/card", "/organisms/page/molecules/card/molecules/list"] {
            let location = format!("{prefix}/atoms/button/button.html");
            let resolved = resolve_rooted(&location, Path::new("/lib"), &categories())
                .expect("Should resolve");
            assert_eq!(resolved, expected);
        }
    }

    #[test]
    fn test_join_root_strips_leading_slash() {
        assert_eq!(
            join_root(Path::new("/lib"), "/atoms/button/button.html"),
            PathBuf::from("/lib/atoms/button/button.html")
        );
        assert_eq!(
            join_root(Path::new("/lib"), "atoms/button/button.html"),
            PathBuf::from("/lib/atoms/button/button.html")
        );
    }
}
