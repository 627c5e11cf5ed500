//! Path validation against the trusted log root.
//!
//! Every user-supplied path goes through [`PathGuard`] before any filesystem
//! call that could escape the root. Raw input is normalized segment by
//! segment (empty and `.` segments are dropped, `..` segments and backslashes
//! are rejected), then the joined path is canonicalized and must still be a
//! descendant of the canonical root. Symlinks pointing outside the root are
//! caught by that second check.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// Label of the first breadcrumb, which points at the log root itself.
pub const ROOT_BREADCRUMB: &str = "Log Viewer";

/// A normalized path relative to the log root.
///
/// Contains no `..` segment, no backslash and no leading or trailing slash.
/// The empty path denotes the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// The root path.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Normalize raw user input into a relative path.
    ///
    /// Empty and `.` segments are dropped. A `..` segment, a backslash or a
    /// NUL byte anywhere in the input is rejected outright.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();

        for segment in raw.split('/') {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(ViewerError::InvalidPath(format!(
                        "parent directory segment in {raw:?}"
                    )))
                }
                s if s.contains('\\') || s.contains('\0') => {
                    return Err(ViewerError::InvalidPath(format!(
                        "illegal character in {raw:?}"
                    )))
                }
                s => segments.push(s),
            }
        }

        Ok(Self(segments.join("/")))
    }

    /// Whether this path denotes the log root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Append a single entry name to this path.
    pub fn join(&self, name: &str) -> Self {
        if self.is_root() {
            Self(name.to_string())
        } else {
            Self(format!("{}/{}", self.0, name))
        }
    }

    /// Final segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Navigation trail from the root down to this path.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            name: ROOT_BREADCRUMB.to_string(),
            path: None,
        }];

        let mut current = RelativePath::root();
        for segment in self.segments() {
            current = current.join(segment);
            crumbs.push(Breadcrumb {
                name: segment.to_string(),
                path: Some(current.clone()),
            });
        }

        crumbs
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One step of a breadcrumb trail. The root crumb has no path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub name: String,
    pub path: Option<RelativePath>,
}

/// A validated path: its form relative to the root and its absolute location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Normalized path relative to the log root.
    pub relative: RelativePath,
    /// Absolute location on disk (canonical when the target exists).
    pub full: PathBuf,
}

/// Confines user-supplied paths to a trusted log root.
#[derive(Debug, Clone)]
pub struct PathGuard {
    /// Canonical form of the log root.
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for the given root directory.
    ///
    /// The root is canonicalized once; it must exist.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let canonical = fs::canonicalize(root).map_err(|source| ViewerError::RootUnavailable {
            path: root.to_path_buf(),
            source,
        })?;

        if !canonical.is_dir() {
            return Err(ViewerError::NotADirectory(canonical));
        }

        Ok(Self { root: canonical })
    }

    /// Canonical log root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a path that targets a directory.
    ///
    /// `None` and the empty string denote the root. Existence is not required
    /// here; the caller performs its own existence check. When the target does
    /// exist it is canonicalized and must stay under the root.
    pub fn resolve_dir(&self, raw: Option<&str>) -> Result<ResolvedPath> {
        let relative = RelativePath::parse(raw.unwrap_or_default())?;
        let joined = self.join(&relative);

        let full = match fs::canonicalize(&joined) {
            Ok(canonical) => self.ensure_contained(canonical, &relative)?,
            Err(e) if e.kind() == ErrorKind::NotFound => joined,
            Err(e) => {
                tracing::debug!("Cannot canonicalize {:?}: {}", joined, e);
                joined
            }
        };

        Ok(ResolvedPath { relative, full })
    }

    /// Validate a path that targets a file.
    ///
    /// The normalized path must be non-empty and must canonicalize to a
    /// descendant of the root; a target that cannot be canonicalized (for
    /// example because it does not exist) is an invalid path.
    pub fn resolve_file(&self, raw: &str) -> Result<ResolvedPath> {
        let relative = RelativePath::parse(raw)?;
        if relative.is_root() {
            return Err(ViewerError::InvalidPath("empty file path".to_string()));
        }

        let joined = self.join(&relative);
        let canonical = fs::canonicalize(&joined).map_err(|e| {
            tracing::debug!("Cannot canonicalize {:?}: {}", joined, e);
            ViewerError::InvalidPath(relative.to_string())
        })?;

        let full = self.ensure_contained(canonical, &relative)?;
        Ok(ResolvedPath { relative, full })
    }

    fn join(&self, relative: &RelativePath) -> PathBuf {
        if relative.is_root() {
            self.root.clone()
        } else {
            self.root.join(relative.as_str())
        }
    }

    fn ensure_contained(&self, canonical: PathBuf, relative: &RelativePath) -> Result<PathBuf> {
        if canonical.starts_with(&self.root) {
            Ok(canonical)
        } else {
            tracing::warn!(
                "Rejected path {:?}: resolves to {:?} outside {:?}",
                relative.as_str(),
                canonical,
                self.root
            );
            Err(ViewerError::InvalidPath(relative.to_string()))
        }
    }
}
