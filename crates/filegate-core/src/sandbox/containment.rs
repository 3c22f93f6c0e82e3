//! Sandbox containment — the single trust boundary for path handling
//!
//! Every path-taking operation goes through [`Sandbox::contain`] before any
//! filesystem access. Containment is decided on normalized, canonical forms
//! with path-segment boundaries, so `/workers` is never treated as inside
//! `/work`.

use crate::error::{Error, Result, SandboxError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Immutable sandbox root all operations are validated against
#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `root`. The root must exist; it is
    /// canonicalized eagerly so later checks compare canonical forms.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = Self::normalize_path(root)?;

        if !canonical.is_dir() {
            return Err(Error::Sandbox(SandboxError::DirectoryNotFound(
                root.to_string_lossy().to_string(),
            )));
        }

        debug!("Sandbox root: {:?}", canonical);
        Ok(Self { root: canonical })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `candidate` and verify it is the sandbox root or a
    /// path-segment descendant of it. Returns the resolved absolute path.
    pub fn contain(&self, candidate: impl AsRef<Path>) -> Result<PathBuf> {
        let resolved = Self::normalize_path(candidate.as_ref())?;

        // starts_with compares whole path components, so a sibling sharing
        // a textual prefix does not pass.
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(Error::Sandbox(SandboxError::PathOutsideSandbox(
                candidate.as_ref().to_string_lossy().to_string(),
            )))
        }
    }

    /// Reject filenames that could steer a joined path out of its
    /// directory. This runs on the raw string before any joining, and is
    /// independent of the containment check on the joined result; both must
    /// pass.
    pub fn validate_filename(filename: &str) -> Result<()> {
        if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
            return Err(Error::Sandbox(SandboxError::InvalidFilename(
                filename.to_string(),
            )));
        }
        Ok(())
    }

    /// Normalize and canonicalize a path without requiring the full path to
    /// exist. Malformed input yields an error, never a panic.
    fn normalize_path(path: &Path) -> Result<PathBuf> {
        // Expand home directory
        let expanded = if path.starts_with("~") {
            if let Some(home) = dirs::home_dir() {
                home.join(path.strip_prefix("~").unwrap())
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        };

        let absolute = if expanded.is_absolute() {
            expanded
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    Error::Sandbox(SandboxError::InvalidPath(format!(
                        "Failed to resolve working directory: {}",
                        e
                    )))
                })?
                .join(expanded)
        };

        // Canonicalize if the path exists
        if absolute.exists() {
            absolute.canonicalize().map_err(|e| {
                Error::Sandbox(SandboxError::InvalidPath(format!(
                    "Failed to canonicalize path {:?}: {}",
                    absolute, e
                )))
            })
        } else {
            // For non-existent paths, canonicalize the deepest existing
            // ancestor and append the rest, so symlinked ancestors (e.g.
            // /tmp on macOS) still resolve.
            let mut current = absolute.clone();
            let mut remaining = Vec::new();

            while !current.exists() && current.parent().is_some() {
                if let Some(name) = current.file_name() {
                    remaining.push(name.to_owned());
                }
                current = current.parent().unwrap().to_path_buf();
            }

            let base = if current.exists() {
                current.canonicalize().unwrap_or(current)
            } else {
                current
            };

            let mut result = base;
            for part in remaining.into_iter().rev() {
                result = result.join(part);
            }

            Ok(Self::clean_path(&result))
        }
    }

    /// Lexically resolve `.` and `..` components
    fn clean_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();

        for component in path.components() {
            match component {
                std::path::Component::ParentDir => {
                    components.pop();
                }
                std::path::Component::CurDir => {}
                c => components.push(c),
            }
        }

        components.iter().collect()
    }
}
