//! Directory listing and item-count pagination.
//!
//! Listing is deliberately shallow: only the immediate children of one
//! directory are read, hidden entries are skipped, and a failed stat of one
//! entry only blanks that entry's metadata.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::path::RelativePath;

/// Default number of entries per listing page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 100;

/// Display type of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Directory,
    Log,
    Html,
    Json,
    Text,
    File,
}

impl FileType {
    /// Classify a file by its extension.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("log") => FileType::Log,
            Some("html") => FileType::Html,
            Some("json") => FileType::Json,
            Some("txt") => FileType::Text,
            _ => FileType::File,
        }
    }

    /// Classify a file by its name.
    pub fn from_name(name: &str) -> Self {
        Self::from_extension(Path::new(name).extension().and_then(|e| e.to_str()))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Directory => "directory",
            FileType::Log => "log",
            FileType::Html => "html",
            FileType::Json => "json",
            FileType::Text => "text",
            FileType::File => "file",
        }
    }
}

/// A child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Path relative to the log root.
    pub path: RelativePath,
    pub is_dir: bool,
    /// Size in bytes; `None` for directories or when stat failed.
    pub size: Option<u64>,
    /// Last modified time; `None` when stat failed.
    pub modified: Option<SystemTime>,
    pub file_type: FileType,
}

impl DirectoryEntry {
    /// Modification time as Unix epoch seconds.
    pub fn modified_secs(&self) -> Option<u64> {
        self.modified
            .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
    }
}

/// Lists the immediate children of a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryLister;

impl DirectoryLister {
    pub fn new() -> Self {
        Self
    }

    /// List `directory`, whose path relative to the root is `prefix`.
    ///
    /// Entries whose name starts with `.` are skipped. Directories come
    /// first, then files, each group ordered by name. An unreadable directory
    /// yields an empty listing.
    pub fn list(&self, directory: &Path, prefix: &RelativePath) -> Vec<DirectoryEntry> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read directory {:?}: {}", directory, e);
                return Vec::new();
            }
        };

        let mut results = Vec::new();

        for entry_result in entries {
            let entry = match entry_result {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry in {:?}: {}", directory, e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }

            // Follows symlinks so a link to a directory lists as a directory.
            let metadata = fs::metadata(entry.path()).ok();
            let is_dir = metadata.as_ref().map(|m| m.is_dir()).unwrap_or(false);
            let modified = metadata.as_ref().and_then(|m| m.modified().ok());

            let (size, file_type) = if is_dir {
                (None, FileType::Directory)
            } else {
                (metadata.as_ref().map(|m| m.len()), FileType::from_name(&name))
            };

            results.push(DirectoryEntry {
                path: prefix.join(&name),
                name,
                is_dir,
                size,
                modified,
                file_type,
            });
        }

        results.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

        results
    }
}

/// One page of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingPage {
    pub items: Vec<DirectoryEntry>,
    pub current_page: u64,
    pub total_pages: u64,
    /// Entries remaining after the name filter.
    pub total_items: usize,
    pub items_per_page: usize,
}

/// Filter entries by name and cut out one page of them.
///
/// The filter is a case-insensitive substring match on the entry name. The
/// page is clamped into `[1, total_pages]` when there is at least one page.
pub fn paginate_entries(
    entries: Vec<DirectoryEntry>,
    search: Option<&str>,
    page: u64,
    items_per_page: usize,
) -> ListingPage {
    let items_per_page = items_per_page.max(1);

    let filtered: Vec<DirectoryEntry> = match search.filter(|s| !s.is_empty()) {
        Some(needle) => {
            let needle = needle.to_lowercase();
            entries
                .into_iter()
                .filter(|e| e.name.to_lowercase().contains(&needle))
                .collect()
        }
        None => entries,
    };

    let total_items = filtered.len();
    let total_pages = total_items.div_ceil(items_per_page) as u64;
    let current_page = page.clamp(1, total_pages.max(1));

    let offset = (current_page - 1) as usize * items_per_page;
    let items = filtered
        .into_iter()
        .skip(offset)
        .take(items_per_page)
        .collect();

    ListingPage {
        items,
        current_page,
        total_pages,
        total_items,
        items_per_page,
    }
}
