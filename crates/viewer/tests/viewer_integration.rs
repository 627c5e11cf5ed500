//! Integration tests for the log viewer core.
//!
//! These tests exercise the public API end to end:
//! - Page reconstruction across chunk boundaries
//! - First-match search windows
//! - Directory browsing and traversal rejection

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use viewer::{
    ChunkReader, ContextDirection, ContextSearcher, FileBody, ListQuery, LogViewer, RawViewQuery,
    ViewQuery, ViewerError, ViewerOptions,
};

/// Build a log with lines of varying length and one line longer than `chunk`.
fn varied_log(chunk: usize) -> String {
    let mut contents = String::new();
    for i in 0..120 {
        if i == 57 {
            contents.push_str(&"L".repeat(chunk * 3 + 7));
        } else {
            contents.push_str(&format!("{i:03} {}", "abcdefghij".repeat(i % 7)));
        }
        contents.push('\n');
    }
    contents
}

fn all_pages(reader: &ChunkReader, path: &Path) -> Vec<String> {
    let total_pages = reader.read_page(path, 1).total_pages;
    (1..=total_pages)
        .map(|page| reader.read_page(path, page).content)
        .collect()
}

// =============================================================================
// Paging
// =============================================================================

#[test]
fn test_pages_reconstruct_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let contents = varied_log(64);
    fs::write(&path, &contents).unwrap();

    let reader = ChunkReader::new(64);
    let pages = all_pages(&reader, &path);

    assert_eq!(pages.len() as u64, (contents.len() as u64).div_ceil(64));
    assert_eq!(pages.concat(), contents);

    // Every non-empty page ends on a line boundary.
    for page in pages.iter().filter(|p| !p.is_empty()) {
        assert!(page.ends_with('\n'));
    }
}

#[test]
fn test_pages_never_repeat_a_line() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let contents = varied_log(50);
    fs::write(&path, &contents).unwrap();

    let reader = ChunkReader::new(50);
    let shown: Vec<String> = all_pages(&reader, &path)
        .iter()
        .flat_map(|page| page.lines().map(str::to_string).collect::<Vec<_>>())
        .collect();
    let original: Vec<&str> = contents.lines().collect();

    assert_eq!(shown, original);
}

#[test]
fn test_file_without_trailing_newline() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tail.log");
    let contents = "alpha\nbeta\ngamma\ndelta";
    fs::write(&path, contents).unwrap();

    let reader = ChunkReader::new(8);
    assert_eq!(all_pages(&reader, &path).concat(), contents);
}

#[test]
fn test_chunk_boundary_inside_single_line() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("one.log");
    fs::write(&path, "0123456789ABCDEFGHIJ\n").unwrap();

    let reader = ChunkReader::new(10);
    let first = reader.read_page(&path, 1);
    let second = reader.read_page(&path, 2);

    assert_eq!(first.content, "0123456789ABCDEFGHIJ\n");
    assert!(!second.content.contains('9'));
    assert_eq!(second.content, "");
}

#[test]
fn test_appended_file_keeps_earlier_pages_stable() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("growing.log");
    fs::write(&path, "one\ntwo\nthree\n").unwrap();

    let reader = ChunkReader::new(8);
    let before = reader.read_page(&path, 1).content;

    let mut contents = fs::read_to_string(&path).unwrap();
    contents.push_str("four\nfive\n");
    fs::write(&path, &contents).unwrap();

    let after = reader.read_page(&path, 1);
    assert_eq!(after.content, before);
    assert_eq!(after.total_size, contents.len() as u64);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_both_directions_on_twenty_lines() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let contents: String = (1..=20)
        .map(|i| {
            if i == 10 {
                "request failed: Timeout\n".to_string()
            } else {
                format!("request {i} ok\n")
            }
        })
        .collect();
    fs::write(&path, contents).unwrap();

    let result = ContextSearcher::new()
        .search(&path, "timeout", 5, ContextDirection::Both)
        .unwrap();

    assert_eq!(result.match_line, 10);
    assert_eq!(result.first_line, 5);
    let lines: Vec<&str> = result.content.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "request 5 ok");
    assert_eq!(lines[10], "request 15 ok");
}

#[test]
fn test_search_after_example() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    fs::write(&path, "a\nNEEDLE\nb\nc\nd\ne\nf\n").unwrap();

    let result = ContextSearcher::new()
        .search(&path, "needle", 2, ContextDirection::After)
        .unwrap();

    assert_eq!(result.match_line, 2);
    let lines: Vec<&str> = result.content.lines().collect();
    assert_eq!(lines, vec!["NEEDLE", "b", "c"]);
}

#[test]
fn test_search_absent() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    fs::write(&path, "a\nb\nc\n").unwrap();

    for direction in [ContextDirection::Before, ContextDirection::After, ContextDirection::Both] {
        assert!(ContextSearcher::new()
            .search(&path, "missing", 3, direction)
            .is_none());
    }
}

// =============================================================================
// Viewer
// =============================================================================

fn create_log_root() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("cron/2024")).unwrap();
    fs::create_dir_all(root.join(".git")).unwrap();
    fs::write(root.join(".env"), "DB_PASSWORD=hunter2").unwrap();
    fs::write(root.join("error.log"), varied_log(64)).unwrap();
    fs::write(root.join("cron/2024/jan.log"), "job started\njob FAILED\njob done\n").unwrap();
    temp_dir
}

#[test]
fn test_browse_skips_dotfiles() {
    let temp_dir = create_log_root();
    let viewer = LogViewer::new(temp_dir.path(), ViewerOptions::default()).unwrap();

    let view = viewer.browse(Some(""), &ListQuery::default()).unwrap();
    let names: Vec<&str> = view.listing.items.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["cron", "error.log"]);

    let nested = viewer.browse(Some("/cron/2024/"), &ListQuery::default()).unwrap();
    assert_eq!(nested.path.as_str(), "cron/2024");
    assert_eq!(nested.breadcrumbs.len(), 3);
    assert_eq!(nested.listing.items[0].path.as_str(), "cron/2024/jan.log");
}

#[test]
fn test_browse_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let viewer = LogViewer::new(temp_dir.path(), ViewerOptions::default()).unwrap();

    let view = viewer.browse(None, &ListQuery::default()).unwrap();
    assert!(view.listing.items.is_empty());
    assert_eq!(view.listing.total_pages, 0);
}

#[test]
fn test_traversal_attempts_are_rejected() {
    let outer = TempDir::new().unwrap();
    let root = outer.path().join("log");
    fs::create_dir_all(root.join("app")).unwrap();
    fs::write(outer.path().join("passwd"), "root:x:0:0").unwrap();
    let viewer = LogViewer::new(&root, ViewerOptions::default()).unwrap();

    for attempt in [
        "../passwd",
        "app/../../passwd",
        "..\\passwd",
        "app\\..\\..\\passwd",
        "/../passwd",
        "./../passwd",
    ] {
        let err = viewer.view(attempt, &ViewQuery::default()).unwrap_err();
        assert!(err.is_not_found(), "{attempt}: {err}");
        assert!(viewer.locate(attempt).is_err());
    }
}

#[test]
fn test_view_with_normalized_query() {
    let temp_dir = create_log_root();
    let viewer = LogViewer::new(temp_dir.path(), ViewerOptions::default()).unwrap();

    let normalized = RawViewQuery {
        page: 1,
        search: Some("failed".to_string()),
        context: 9000,
        direction: "upwards".to_string(),
    }
    .normalize();
    assert!(normalized.corrected);

    let view = viewer.view("cron/2024/jan.log", &normalized.value).unwrap();
    match view.body {
        FileBody::Search {
            context,
            direction,
            result,
            ..
        } => {
            assert_eq!(context, 300);
            assert_eq!(direction, ContextDirection::Both);
            let result = result.unwrap();
            assert_eq!(result.match_line, 2);
            assert_eq!(result.content, "job started\njob FAILED\njob done\n");
        }
        other => panic!("Expected search body, got {other:?}"),
    }
}

#[test]
fn test_view_pages_through_viewer() {
    let temp_dir = create_log_root();
    let options = ViewerOptions {
        chunk_size: 64,
        ..ViewerOptions::default()
    };
    let viewer = LogViewer::new(temp_dir.path(), options).unwrap();

    let query = ViewQuery {
        page: 10_000,
        ..ViewQuery::default()
    };
    let view = viewer.view("error.log", &query).unwrap();
    match view.body {
        FileBody::Page(window) => {
            assert_eq!(window.current_page, window.total_pages);
            assert_eq!(window.chunk_size, Some(64));
            assert!(window.displayed_size <= window.total_size);
        }
        other => panic!("Expected page body, got {other:?}"),
    }
}

#[test]
fn test_missing_root() {
    let temp_dir = TempDir::new().unwrap();
    let result = LogViewer::new(temp_dir.path().join("nope"), ViewerOptions::default());
    assert!(matches!(result, Err(ViewerError::RootUnavailable { .. })));
}
