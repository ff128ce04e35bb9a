//! Directory traversal that builds the document set.
//!
//! The CLI has no notion of "open editors"; its equivalent of the open
//! document set is every matching source file under the root. This module
//! provides [`FileWalker`], which uses the `ignore` crate to walk the tree
//! while respecting `.gitignore` patterns.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;

use beian_core::ScanConfig;

use crate::error::ScanError;

/// Directories that never contain documents worth verifying.
const SKIP_DIRECTORIES: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".git",
    "coverage",
    "target",
    "__pycache__",
];

/// A file walker that discovers source files to verify.
///
/// Uses the `ignore` crate for efficient traversal with gitignore support.
/// Extensions and extra skip directories come from [`ScanConfig`].
///
/// # Examples
///
/// ```no_run
/// use beian_core::ScanConfig;
/// use beian_scanner::FileWalker;
/// use camino::Utf8Path;
///
/// # fn example() -> Result<(), beian_scanner::ScanError> {
/// let config = ScanConfig::default();
/// let walker = FileWalker::new(Utf8Path::new("./src"), &config)?;
/// let paths = walker.collect_paths()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Extensions to include, without the leading dot.
    extensions: Vec<String>,
    /// Directories to skip, beyond the standard list.
    skip_dirs: Vec<String>,
    /// Whether to follow symbolic links.
    follow_links: bool,
}

impl FileWalker {
    /// Creates a new file walker for the given root directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root path doesn't exist or
    /// isn't a directory.
    pub fn new(root: &Utf8Path, config: &ScanConfig) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::config(format!(
                "root path does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(ScanError::config(format!(
                "root path is not a directory: {root}"
            )));
        }

        let extensions = config
            .file_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_owned())
            .collect();

        Ok(Self {
            root: root.to_owned(),
            extensions,
            skip_dirs: config.skip_dirs.clone(),
            follow_links: config.follow_links,
        })
    }

    /// Collects all matching file paths in the directory tree.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] if directory traversal fails and
    /// [`ScanError::NonUtf8Path`] if a non-UTF-8 path is encountered.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let utf8_path =
                Utf8Path::from_path(path).ok_or_else(|| ScanError::NonUtf8Path(path.to_owned()))?;

            if !self.matches_extension(utf8_path) {
                continue;
            }
            if self.should_skip_path(utf8_path) {
                continue;
            }

            paths.push(utf8_path.to_owned());
        }

        Ok(paths)
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            .standard_filters(true)
            .follow_links(self.follow_links)
            .threads(1)
            .require_git(false)
            .build()
    }

    /// Checks if a path matches one of the configured extensions.
    fn matches_extension(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Checks if a path should be skipped based on directory name.
    fn should_skip_path(&self, path: &Utf8Path) -> bool {
        for component in path.components() {
            let component_str = component.as_str();
            if SKIP_DIRECTORIES.contains(&component_str) {
                return true;
            }
            if self.skip_dirs.iter().any(|d| d == component_str) {
                return true;
            }
        }
        false
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_walker_rejects_missing_root() {
        let err = FileWalker::new(Utf8Path::new("/no/such/dir"), &ScanConfig::default());
        assert!(matches!(err, Err(ScanError::Config(_))));
    }

    #[test]
    fn test_walker_collects_matching_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(&dir);
        std::fs::write(root.join("a.ts"), "class A {}").unwrap();
        std::fs::write(root.join("b.tsx"), "class B {}").unwrap();
        std::fs::write(root.join("c.css"), "body {}").unwrap();

        let walker = FileWalker::new(&root, &ScanConfig::default()).unwrap();
        let mut paths = walker.collect_paths().unwrap();
        paths.sort();

        let names: Vec<_> = paths.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, vec!["a.ts", "b.tsx"]);
    }

    #[test]
    fn test_walker_skips_configured_directories() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(&dir);
        std::fs::create_dir_all(root.join("node_modules")).unwrap();
        std::fs::create_dir_all(root.join("vendor")).unwrap();
        std::fs::write(root.join("node_modules/x.ts"), "X").unwrap();
        std::fs::write(root.join("vendor/y.ts"), "Y").unwrap();
        std::fs::write(root.join("keep.ts"), "Z").unwrap();

        let config = ScanConfig {
            skip_dirs: vec!["vendor".to_owned()],
            ..ScanConfig::default()
        };
        let walker = FileWalker::new(&root, &config).unwrap();
        let paths = walker.collect_paths().unwrap();

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].file_name(), Some("keep.ts"));
    }
}
