//! Byte-windowed pagination of large log files.
//!
//! A page is a fixed-size byte range of the file, extended forward to the
//! next newline (bounded by [`MAX_LINE_EXTENSION`]) and trimmed at the front
//! when it starts in the middle of a line that the previous page already
//! finished. Only one page is ever held in memory.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default page size (100KB).
pub const DEFAULT_CHUNK_SIZE: u64 = 100 * 1024;

/// Maximum number of bytes read past the page end to complete a line.
pub const MAX_LINE_EXTENSION: u64 = 10_000;

/// One rendered page of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Page text.
    pub content: String,
    /// 1-based page number actually served, after clamping.
    pub current_page: u64,
    /// Number of pages in the file (0 for an empty file).
    pub total_pages: u64,
    /// Page size in bytes, or `None` when the file was read whole.
    pub chunk_size: Option<u64>,
    /// Number of file bytes in `content`.
    pub displayed_size: u64,
    /// File size in bytes as reported by stat.
    pub total_size: u64,
}

impl PageWindow {
    /// An empty window for a file that could not be read.
    fn unreadable(current_page: u64, total_pages: u64, chunk_size: Option<u64>, total_size: u64) -> Self {
        Self {
            content: String::new(),
            current_page,
            total_pages,
            chunk_size,
            displayed_size: 0,
            total_size,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Number of `chunk_size` pages needed for `total_size` bytes.
pub fn page_count(total_size: u64, chunk_size: u64) -> u64 {
    total_size.div_ceil(chunk_size.max(1))
}

/// Clamp a requested page into `[1, max(total_pages, 1)]`.
pub fn clamp_page(page: u64, total_pages: u64) -> u64 {
    page.clamp(1, total_pages.max(1))
}

/// Reads line-aligned pages out of a file.
#[derive(Debug, Clone, Copy)]
pub struct ChunkReader {
    chunk_size: u64,
    max_extension: u64,
}

impl Default for ChunkReader {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkReader {
    /// Create a reader with the given page size. A zero size is raised to 1.
    pub fn new(chunk_size: u64) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            max_extension: MAX_LINE_EXTENSION,
        }
    }

    /// Set the cap on bytes read past the page end to complete a line.
    pub fn with_max_extension(mut self, max_extension: u64) -> Self {
        self.max_extension = max_extension;
        self
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Read one page of `path`.
    ///
    /// The page number is clamped into the valid range. Read failures yield
    /// an empty window; `total_size` still reflects the stat result.
    pub fn read_page(&self, path: &Path, page: u64) -> PageWindow {
        let total_size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Failed to stat {:?}: {}", path, e);
                0
            }
        };

        let total_pages = page_count(total_size, self.chunk_size);
        let current_page = clamp_page(page, total_pages);
        if current_page != page {
            debug!("Clamped page {} to {} for {:?}", page, current_page, path);
        }

        match self.read_window(path, current_page) {
            Ok(bytes) => PageWindow {
                displayed_size: bytes.len() as u64,
                content: String::from_utf8_lossy(&bytes).into_owned(),
                current_page,
                total_pages,
                chunk_size: Some(self.chunk_size),
                total_size,
            },
            Err(e) => {
                warn!("Failed to read page {} of {:?}: {}", current_page, path, e);
                PageWindow::unreadable(current_page, total_pages, Some(self.chunk_size), total_size)
            }
        }
    }

    fn read_window(&self, path: &Path, page: u64) -> io::Result<Vec<u8>> {
        let mut reader = BufReader::new(File::open(path)?);
        let offset = (page - 1) * self.chunk_size;

        // The page starts mid-line unless the byte before it is a newline.
        let starts_mid_line = if offset > 0 {
            reader.seek(SeekFrom::Start(offset - 1))?;
            let mut previous = [0u8; 1];
            let n = reader.read(&mut previous)?;
            n == 1 && previous[0] != b'\n'
        } else {
            reader.seek(SeekFrom::Start(0))?;
            false
        };

        let mut buffer = Vec::with_capacity(self.chunk_size.min(DEFAULT_CHUNK_SIZE) as usize);
        let read = reader.by_ref().take(self.chunk_size).read_to_end(&mut buffer)? as u64;

        if read == self.chunk_size && buffer.last() != Some(&b'\n') {
            reader
                .by_ref()
                .take(self.max_extension)
                .read_until(b'\n', &mut buffer)?;
        }

        if starts_mid_line {
            match buffer.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    buffer.drain(..=newline);
                }
                None => buffer.clear(),
            }
        }

        Ok(buffer)
    }

    /// Read a whole file as a single page, bypassing chunking.
    pub fn read_whole(&self, path: &Path) -> PageWindow {
        let total_size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Failed to stat {:?}: {}", path, e);
                0
            }
        };

        match fs::read(path) {
            Ok(bytes) => PageWindow {
                displayed_size: bytes.len() as u64,
                content: String::from_utf8_lossy(&bytes).into_owned(),
                current_page: 1,
                total_pages: 1,
                chunk_size: None,
                total_size,
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                PageWindow::unreadable(1, 1, None, total_size)
            }
        }
    }
}
