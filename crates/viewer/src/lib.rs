//! # Log Viewer Core
//!
//! Bounded-memory browsing, paging and searching of large append-only log
//! files confined to a single trusted directory.
//!
//! ## Overview
//!
//! - **Path validation**: raw paths are normalized and must resolve under the
//!   log root ([`PathGuard`])
//! - **Paging**: fixed-size byte windows that never split a line across two
//!   pages ([`ChunkReader`])
//! - **Search**: first case-insensitive match with a bounded window of
//!   surrounding lines ([`ContextSearcher`])
//! - **Listing**: immediate children of a directory with metadata and
//!   item-count pagination ([`DirectoryLister`])
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  LogViewer                   │  browse / view / locate
//! ├──────────────────────────────────────────────┤
//! │                  PathGuard                   │  normalize + containment
//! ├───────────────┬───────────────┬──────────────┤
//! │  ChunkReader  │ContextSearcher│DirectoryLister│
//! └───────────────┴───────────────┴──────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use viewer::{LogViewer, ViewerOptions, ViewQuery, FileBody};
//!
//! let viewer = LogViewer::new("/var/log/myapp", ViewerOptions::default())?;
//! let view = viewer.view("error.log", &ViewQuery::default())?;
//! if let FileBody::Page(page) = view.body {
//!     println!("page {}/{}", page.current_page, page.total_pages);
//!     print!("{}", page.content);
//! }
//! # Ok::<(), viewer::ViewerError>(())
//! ```
//!
//! ## Modules
//!
//! - [`path`]: path normalization, containment checks and breadcrumbs
//! - [`chunk`]: byte-windowed pagination
//! - [`search`]: first-match context search
//! - [`listing`]: directory listing and pagination by item count
//! - [`query`]: normalization of page and search parameters
//! - [`viewer`]: the request-level facade
//! - [`error`]: error types

pub mod chunk;
pub mod error;
pub mod listing;
pub mod path;
pub mod query;
pub mod search;
pub mod viewer;

pub use chunk::{ChunkReader, PageWindow, DEFAULT_CHUNK_SIZE, MAX_LINE_EXTENSION};
pub use error::{Result, ViewerError};
pub use listing::{
    paginate_entries, DirectoryEntry, DirectoryLister, FileType, ListingPage,
    DEFAULT_ITEMS_PER_PAGE,
};
pub use path::{Breadcrumb, PathGuard, RelativePath, ResolvedPath};
pub use query::{
    ContextDirection, ListQuery, Normalized, RawListQuery, RawViewQuery, ViewQuery,
    DEFAULT_CONTEXT_LINES, MAX_CONTEXT_LINES, MIN_CONTEXT_LINES,
};
pub use search::{ContextSearcher, SearchResult};
pub use viewer::{DirectoryView, FileBody, FileView, LogViewer, ViewerOptions};
