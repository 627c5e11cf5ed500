//! First-match search with a bounded context window.
//!
//! The file is scanned once, line by line. Before the match only a sliding
//! window of recent lines is kept, so memory is bounded by the context size
//! no matter how large the file is.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::query::ContextDirection;

/// The first match of a search together with its context lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Context lines in file order, line terminators included.
    pub content: String,
    /// 1-based line number of the match.
    pub match_line: u64,
    /// 1-based line number of the first line in `content`.
    pub first_line: u64,
    /// Number of lines in `content`.
    pub line_count: usize,
}

/// Finds the first case-insensitive occurrence of a needle in a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextSearcher;

impl ContextSearcher {
    pub fn new() -> Self {
        Self
    }

    /// Search `path` for `needle` and return the surrounding lines.
    ///
    /// `before` keeps up to `context_lines` lines preceding the match, `after`
    /// keeps up to `context_lines` lines following it, `both` keeps both. The
    /// match line is always part of the result. Returns `None` when there is
    /// no match or the file cannot be opened.
    pub fn search(
        &self,
        path: &Path,
        needle: &str,
        context_lines: usize,
        direction: ContextDirection,
    ) -> Option<SearchResult> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Failed to open {:?} for search: {}", path, e);
                return None;
            }
        };

        let result = scan(BufReader::new(file), needle, context_lines, direction);
        match &result {
            Some(found) => debug!("Found {:?} in {:?} at line {}", needle, path, found.match_line),
            None => debug!("No match for {:?} in {:?}", needle, path),
        }
        result
    }
}

/// Run the single-pass scan over any line source.
fn scan<R: BufRead>(
    mut reader: R,
    needle: &str,
    context_lines: usize,
    direction: ContextDirection,
) -> Option<SearchResult> {
    let needle = needle.to_lowercase();
    let keep_before = direction.includes_before();
    let keep_after = direction.includes_after();

    // Holds the preceding lines plus the line under test.
    let mut window: VecDeque<String> = VecDeque::with_capacity(context_lines + 1);
    let mut line_number: u64 = 0;
    let mut match_line: Option<u64> = None;
    let mut lines_after = 0usize;
    let mut raw = Vec::new();

    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Search stopped after line {}: {}", line_number, e);
                break;
            }
        }

        line_number += 1;
        let line = String::from_utf8_lossy(&raw).into_owned();

        if match_line.is_some() {
            window.push_back(line);
            lines_after += 1;
            if lines_after >= context_lines {
                break;
            }
            continue;
        }

        let is_match = line.to_lowercase().contains(&needle);

        if keep_before {
            window.push_back(line);
            if window.len() > context_lines + 1 {
                window.pop_front();
            }
        } else if is_match {
            window.clear();
            window.push_back(line);
        }

        if is_match {
            match_line = Some(line_number);
            if !keep_after || context_lines == 0 {
                break;
            }
        }
    }

    let match_line = match_line?;
    let lines_before = window.len() - 1 - lines_after;

    Some(SearchResult {
        line_count: window.len(),
        content: window.into_iter().collect(),
        match_line,
        first_line: match_line - lines_before as u64,
    })
}
