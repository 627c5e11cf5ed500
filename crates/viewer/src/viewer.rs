//! Request-level entry points over a single trusted log root.
//!
//! [`LogViewer`] validates the raw path first and only then touches the
//! filesystem; path failures are returned as errors, while read failures on a
//! validated path come back as empty content.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunk::{ChunkReader, PageWindow, DEFAULT_CHUNK_SIZE, MAX_LINE_EXTENSION};
use crate::error::{Result, ViewerError};
use crate::listing::{
    paginate_entries, DirectoryLister, FileType, ListingPage, DEFAULT_ITEMS_PER_PAGE,
};
use crate::path::{Breadcrumb, PathGuard, RelativePath};
use crate::query::{ContextDirection, ListQuery, ViewQuery};
use crate::search::{ContextSearcher, SearchResult};

/// Tunables for a [`LogViewer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Page size for byte-windowed file pages.
    pub chunk_size: u64,
    /// Cap on bytes read past a page end to complete a line.
    pub max_line_extension: u64,
    /// Entries per directory listing page.
    pub items_per_page: usize,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_line_extension: MAX_LINE_EXTENSION,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// A rendered directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryView {
    pub path: RelativePath,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub search: Option<String>,
    pub listing: ListingPage,
}

/// The body of a file view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FileBody {
    /// A byte-windowed page, or the whole file for HTML dumps.
    Page(PageWindow),
    /// A first-match search.
    Search {
        needle: String,
        context: usize,
        direction: ContextDirection,
        result: Option<SearchResult>,
    },
}

/// A rendered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileView {
    pub name: String,
    pub path: RelativePath,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub file_type: FileType,
    /// Size from stat, taken after the body was read.
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    pub body: FileBody,
}

/// Browses and searches the files under one log root.
#[derive(Debug, Clone)]
pub struct LogViewer {
    guard: PathGuard,
    reader: ChunkReader,
    searcher: ContextSearcher,
    lister: DirectoryLister,
    items_per_page: usize,
}

impl LogViewer {
    /// Create a viewer confined to `root`.
    pub fn new<P: AsRef<Path>>(root: P, options: ViewerOptions) -> Result<Self> {
        let guard = PathGuard::new(root)?;
        debug!("Log viewer rooted at {:?}", guard.root());

        Ok(Self {
            guard,
            reader: ChunkReader::new(options.chunk_size)
                .with_max_extension(options.max_line_extension),
            searcher: ContextSearcher::new(),
            lister: DirectoryLister::new(),
            items_per_page: options.items_per_page.max(1),
        })
    }

    /// Canonical log root.
    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    /// List a directory under the root.
    ///
    /// `None` or an empty path lists the root itself.
    pub fn browse(&self, path: Option<&str>, query: &ListQuery) -> Result<DirectoryView> {
        let resolved = self.guard.resolve_dir(path)?;

        match fs::metadata(&resolved.full) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(ViewerError::NotADirectory(resolved.full)),
            Err(_) => return Err(ViewerError::NotFound(resolved.full)),
        }

        let entries = self.lister.list(&resolved.full, &resolved.relative);
        let listing = paginate_entries(
            entries,
            query.search.as_deref(),
            query.page,
            self.items_per_page,
        );

        Ok(DirectoryView {
            breadcrumbs: resolved.relative.breadcrumbs(),
            path: resolved.relative,
            search: query.search.clone(),
            listing,
        })
    }

    /// Render a file: a page of it, a search within it, or all of it for
    /// HTML dumps.
    pub fn view(&self, file: &str, query: &ViewQuery) -> Result<FileView> {
        let (relative, full) = self.locate_with_relative(file)?;
        let file_type = FileType::from_name(relative.file_name().unwrap_or_default());

        let needle = query.search.as_deref().filter(|s| !s.is_empty());
        let body = match (file_type, needle) {
            (FileType::Html, _) => FileBody::Page(self.reader.read_whole(&full)),
            (_, Some(needle)) => FileBody::Search {
                needle: needle.to_string(),
                context: query.context,
                direction: query.direction,
                result: self
                    .searcher
                    .search(&full, needle, query.context, query.direction),
            },
            (_, None) => FileBody::Page(self.reader.read_page(&full, query.page)),
        };

        let metadata = fs::metadata(&full).ok();

        Ok(FileView {
            name: relative.file_name().unwrap_or_default().to_string(),
            breadcrumbs: relative.breadcrumbs(),
            path: relative,
            file_type,
            size: metadata.as_ref().map(|m| m.len()),
            modified: metadata.as_ref().and_then(|m| m.modified().ok()),
            body,
        })
    }

    /// Absolute path of a regular file under the root, for handing off to a
    /// download layer.
    pub fn locate(&self, file: &str) -> Result<PathBuf> {
        self.locate_with_relative(file).map(|(_, full)| full)
    }

    fn locate_with_relative(&self, file: &str) -> Result<(RelativePath, PathBuf)> {
        let resolved = self.guard.resolve_file(file)?;
        if !resolved.full.is_file() {
            return Err(ViewerError::NotAFile(resolved.full));
        }
        Ok((resolved.relative, resolved.full))
    }
}
