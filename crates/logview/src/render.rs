//! Plain-text rendering of directory and file views.
//!
//! JSON output goes straight through `serde_json`; this module only covers
//! the human-readable form.

use std::io::{self, Write};
use std::time::SystemTime;

use viewer::{Breadcrumb, DirectoryEntry, DirectoryView, FileBody, FileView, PageWindow};

/// Format a byte count with a binary unit suffix (e.g., "1.5 KB").
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Format a modification time relative to `now` (e.g., "5m ago").
pub fn format_age(modified: Option<SystemTime>, now: SystemTime) -> String {
    let Some(modified) = modified else {
        return "-".to_string();
    };

    let elapsed = now
        .duration_since(modified)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    if elapsed < 60 {
        format!("{}s ago", elapsed)
    } else if elapsed < 3600 {
        format!("{}m ago", elapsed / 60)
    } else if elapsed < 86400 {
        format!("{}h ago", elapsed / 3600)
    } else {
        format!("{}d ago", elapsed / 86400)
    }
}

fn format_breadcrumbs(breadcrumbs: &[Breadcrumb]) -> String {
    breadcrumbs
        .iter()
        .map(|b| b.name.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

fn entry_size(entry: &DirectoryEntry) -> String {
    if entry.is_dir {
        "-".to_string()
    } else {
        entry.size.map(format_size).unwrap_or_else(|| "?".to_string())
    }
}

/// Write a directory listing as an aligned table.
pub fn write_directory<W: Write>(out: &mut W, view: &DirectoryView, now: SystemTime) -> io::Result<()> {
    writeln!(out, "{}", format_breadcrumbs(&view.breadcrumbs))?;
    if let Some(search) = &view.search {
        writeln!(out, "Filter: {}", search)?;
    }
    writeln!(out)?;

    let listing = &view.listing;
    if listing.items.is_empty() {
        writeln!(out, "No entries.")?;
        return Ok(());
    }

    let name_width = listing
        .items
        .iter()
        .map(|e| e.name.len() + usize::from(e.is_dir))
        .max()
        .unwrap_or(4)
        .max(4);

    writeln!(
        out,
        "{:<name_width$}  {:<9}  {:>10}  {:>10}",
        "NAME", "TYPE", "SIZE", "MODIFIED",
    )?;
    writeln!(out, "{}", "-".repeat(name_width + 37))?;

    for entry in &listing.items {
        let name = if entry.is_dir {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        writeln!(
            out,
            "{:<name_width$}  {:<9}  {:>10}  {:>10}",
            name,
            entry.file_type.as_str(),
            entry_size(entry),
            format_age(entry.modified, now),
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Page {}/{} ({} item(s))",
        listing.current_page, listing.total_pages, listing.total_items
    )
}

fn write_page<W: Write>(out: &mut W, window: &PageWindow) -> io::Result<()> {
    out.write_all(window.content.as_bytes())?;
    if !window.content.is_empty() && !window.content.ends_with('\n') {
        writeln!(out)?;
    }

    if window.chunk_size.is_some() {
        writeln!(out)?;
        writeln!(
            out,
            "Page {}/{} ({} of {} shown)",
            window.current_page,
            window.total_pages,
            format_size(window.displayed_size),
            format_size(window.total_size),
        )?;
    }
    Ok(())
}

/// Write a file view: header, then the page or search window.
pub fn write_file<W: Write>(out: &mut W, view: &FileView) -> io::Result<()> {
    writeln!(out, "{}", format_breadcrumbs(&view.breadcrumbs))?;
    writeln!(
        out,
        "{} ({}, {})",
        view.name,
        view.file_type.as_str(),
        view.size.map(format_size).unwrap_or_else(|| "?".to_string()),
    )?;
    writeln!(out)?;

    match &view.body {
        FileBody::Page(window) => write_page(out, window),
        FileBody::Search {
            needle,
            context,
            direction,
            result,
        } => match result {
            Some(result) => {
                writeln!(
                    out,
                    "Match for \"{}\" at line {} (lines {}-{}, context {} {})",
                    needle,
                    result.match_line,
                    result.first_line,
                    result.first_line + result.line_count.saturating_sub(1) as u64,
                    context,
                    direction,
                )?;
                writeln!(out)?;
                out.write_all(result.content.as_bytes())?;
                if !result.content.ends_with('\n') {
                    writeln!(out)?;
                }
                Ok(())
            }
            None => writeln!(out, "No match for \"{}\".", needle),
        },
    }
}
