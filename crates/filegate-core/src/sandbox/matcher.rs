//! Glob expansion against a single directory
//!
//! Non-recursive shell glob semantics (`*`, `?`, character classes) over the
//! entries directly inside one directory. Directories and unreadable entries
//! are never returned, so nothing downstream can delete them.

use crate::error::{Error, RequestError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct PatternMatcher;

impl PatternMatcher {
    /// Expand `pattern` against the entries directly inside `directory`.
    ///
    /// Returns full paths of matching regular files, sorted by file name so
    /// batch ordering is deterministic. An unparseable pattern is an error
    /// for this pattern only; the caller decides whether to continue.
    pub async fn expand(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        let compiled = Pattern::new(pattern).map_err(|e| {
            Error::Request(RequestError::BadPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        })?;

        debug!("Expanding pattern '{}' in {:?}", pattern, directory);

        let mut matches = Vec::new();
        let mut read_dir = tokio::fs::read_dir(directory).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if !compiled.matches(&name) {
                continue;
            }

            // Stat follows symlinks, so a link to a directory is excluded
            // the same way a directory is.
            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Failed to stat {:?}, skipping: {}", entry.path(), e);
                    continue;
                }
            };

            if metadata.is_dir() {
                debug!("Skipping directory match: {:?}", entry.path());
                continue;
            }

            matches.push(entry.path());
        }

        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[tokio::test]
    async fn matches_files_but_never_directories() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.tar.gz"), "a").unwrap();
        std::fs::write(dir.path().join("b.tar.gz"), "b").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "n").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let matches = PatternMatcher::expand(dir.path(), "*.tar.gz").await.unwrap();
        assert_eq!(names(&matches), vec!["a.tar.gz", "b.tar.gz"]);

        // A bare-star pattern matches the subdirectory name, but the
        // directory itself is excluded from the result.
        let matches = PatternMatcher::expand(dir.path(), "*").await.unwrap();
        assert_eq!(names(&matches), vec!["a.tar.gz", "b.tar.gz", "notes.txt"]);
    }

    #[tokio::test]
    async fn question_mark_and_classes() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("v1.log"), "").unwrap();
        std::fs::write(dir.path().join("v2.log"), "").unwrap();
        std::fs::write(dir.path().join("v10.log"), "").unwrap();

        let matches = PatternMatcher::expand(dir.path(), "v?.log").await.unwrap();
        assert_eq!(names(&matches), vec!["v1.log", "v2.log"]);

        let matches = PatternMatcher::expand(dir.path(), "v[12].log").await.unwrap();
        assert_eq!(names(&matches), vec!["v1.log", "v2.log"]);
    }

    #[tokio::test]
    async fn invalid_pattern_is_an_error() {
        let dir = tempdir().unwrap();
        let result = PatternMatcher::expand(dir.path(), "[").await;
        assert!(matches!(
            result,
            Err(Error::Request(RequestError::BadPattern { .. }))
        ));
    }

    #[tokio::test]
    async fn no_matches_is_empty_not_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("keep.txt"), "").unwrap();

        let matches = PatternMatcher::expand(dir.path(), "*.missing").await.unwrap();
        assert!(matches.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_to_directory_is_excluded() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real-dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real-dir"), dir.path().join("dir-link"))
            .unwrap();
        std::fs::write(dir.path().join("dir-file"), "").unwrap();

        let matches = PatternMatcher::expand(dir.path(), "dir-*").await.unwrap();
        assert_eq!(names(&matches), vec!["dir-file"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_is_skipped() {
        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling"))
            .unwrap();

        let matches = PatternMatcher::expand(dir.path(), "dangling").await.unwrap();
        assert!(matches.is_empty());
    }
}
