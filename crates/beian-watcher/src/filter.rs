//! File filtering for watch events.
//!
//! Filtering happens in the blocking watcher thread, before events cross
//! the channel, so uninteresting filesystem noise never reaches the
//! coordinator.

use camino::{Utf8Path, Utf8PathBuf};

/// A predicate deciding which file events to process.
///
/// Filters run on the blocking watcher thread, so they must be
/// [`Send`] + [`Sync`] + `'static`.
///
/// # Examples
///
/// ```
/// use beian_watcher::FileFilter;
/// use camino::Utf8Path;
///
/// struct NoTests;
///
/// impl FileFilter for NoTests {
///     fn should_process(&self, path: &Utf8Path) -> bool {
///         !path.as_str().ends_with(".spec.ts")
///     }
/// }
/// ```
pub trait FileFilter: Send + Sync + 'static {
    /// Returns `true` if an event for `path` should be forwarded.
    fn should_process(&self, path: &Utf8Path) -> bool;
}

/// A filter that accepts all files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFilter;

impl FileFilter for AcceptAllFilter {
    #[inline]
    fn should_process(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// The watch-mode filter: source files plus the registry file itself.
///
/// A source-file change invalidates that document's findings; a registry
/// change invalidates everything. Both must pass, everything else is
/// noise.
///
/// # Examples
///
/// ```
/// use beian_watcher::{FileFilter, GuardFileFilter};
/// use camino::Utf8Path;
///
/// let filter = GuardFileFilter::new(&[".ts".to_owned()], ".vscode/beian.json");
///
/// assert!(filter.should_process(Utf8Path::new("/ws/src/app.ts")));
/// assert!(filter.should_process(Utf8Path::new("/ws/.vscode/beian.json")));
/// assert!(!filter.should_process(Utf8Path::new("/ws/styles.css")));
/// ```
#[derive(Debug, Clone)]
pub struct GuardFileFilter {
    /// Extensions to accept, without the leading dot.
    extensions: Vec<String>,

    /// Configured relative registry path, matched as a whole-component
    /// suffix.
    registry_suffix: Utf8PathBuf,
}

impl GuardFileFilter {
    /// Creates a filter from configured extensions and the relative
    /// registry path.
    #[must_use]
    pub fn new(extensions: &[String], registry_relative_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_owned())
                .collect(),
            registry_suffix: registry_relative_path.into(),
        }
    }

    /// Returns `true` if `path` is the registry file.
    ///
    /// The match is anchored on path-component boundaries, so a configured
    /// `beian.json` matches `/ws/beian.json` but not `/ws/my-beian.json`.
    #[must_use]
    pub fn is_registry_path(&self, path: &Utf8Path) -> bool {
        !self.registry_suffix.as_str().is_empty() && path.ends_with(&self.registry_suffix)
    }
}

impl FileFilter for GuardFileFilter {
    fn should_process(&self, path: &Utf8Path) -> bool {
        if self.is_registry_path(path) {
            return true;
        }
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> GuardFileFilter {
        GuardFileFilter::new(&[".ts".to_owned(), ".tsx".to_owned()], ".vscode/beian.json")
    }

    #[test]
    fn test_accepts_source_extensions() {
        let f = filter();
        assert!(f.should_process(Utf8Path::new("/ws/src/app.ts")));
        assert!(f.should_process(Utf8Path::new("/ws/src/App.tsx")));
    }

    #[test]
    fn test_accepts_registry_file() {
        let f = filter();
        assert!(f.should_process(Utf8Path::new("/ws/.vscode/beian.json")));
        assert!(f.is_registry_path(Utf8Path::new("/ws/.vscode/beian.json")));
    }

    #[test]
    fn test_rejects_other_files() {
        let f = filter();
        assert!(!f.should_process(Utf8Path::new("/ws/readme.md")));
        assert!(!f.should_process(Utf8Path::new("/ws/other.json")));
        assert!(!f.is_registry_path(Utf8Path::new("/ws/other.json")));
    }

    #[test]
    fn test_registry_match_is_component_anchored() {
        let f = GuardFileFilter::new(&[".ts".to_owned()], "beian.json");
        assert!(f.is_registry_path(Utf8Path::new("/ws/beian.json")));
        assert!(!f.is_registry_path(Utf8Path::new("/ws/my-beian.json")));
        assert!(!f.is_registry_path(Utf8Path::new("/ws/sub-beian.json")));
    }

    #[test]
    fn test_accept_all_filter() {
        assert!(AcceptAllFilter.should_process(Utf8Path::new("anything.bin")));
    }

    #[test]
    fn test_extension_normalization() {
        // Leading dots in configuration are tolerated.
        let f = GuardFileFilter::new(&["ts".to_owned()], "beian.json");
        assert!(f.should_process(Utf8Path::new("a.ts")));
    }
}
