//! Title resolution from adjacent note files

use std::fs;
use std::path::{Path, PathBuf};

use crate::pdf::locate::PdfEntry;

/// Maximum title length; longer first lines are truncated with a marker
pub const TITLE_MAX_LEN: usize = 150;

const ELLIPSIS: &str = "...";

/// Resolve a human-readable title for a located PDF.
///
/// Looks in the PDF's directory for a note file and takes its first
/// meaningful line, stripping leading heading markers. Falls back to
/// `Ticket <number>` when no note file is found or it cannot be read.
pub fn resolve_title(entry: &PdfEntry) -> String {
    find_note_file(entry)
        .and_then(|note| title_from_note(&note))
        .unwrap_or_else(|| format!("Ticket {}", entry.number))
}

/// Find the note file for a PDF: an exactly-matching name first, then any
/// markdown file, then any text file. Merge/combine artifacts are skipped.
fn find_note_file(entry: &PdfEntry) -> Option<PathBuf> {
    let stem = entry.path.file_stem()?.to_str()?;

    for name in [
        format!("{}.md", stem),
        format!("{}.md", entry.number),
        "README.md".to_string(),
    ] {
        let candidate = entry.parent.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    for ext in ["md", "txt"] {
        if let Some(found) = first_file_with_extension(&entry.parent, ext) {
            return Some(found);
        }
    }

    None
}

/// First file in `dir` with the given extension, by file name, skipping
/// names that look like merge output
fn first_file_with_extension(dir: &Path, ext: &str) -> Option<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case(ext))
                    .unwrap_or(false)
        })
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| {
                    let lower = n.to_lowercase();
                    !lower.contains("merge") && !lower.contains("combine")
                })
                .unwrap_or(false)
        })
        .collect();

    found.sort();
    found.into_iter().next()
}

/// Extract a title from the first non-trivial line of a note file,
/// scanning at most the first five lines
fn title_from_note(path: &Path) -> Option<String> {
    let body = fs::read_to_string(path).ok()?;

    for line in body.lines().take(5) {
        let line = line.trim();
        if line.chars().count() > 3 {
            let line = line.trim_start_matches('#').trim_start();
            return Some(truncate_title(line));
        }
    }

    None
}

/// Clip to `TITLE_MAX_LEN` chars, ending in an ellipsis marker when
/// anything was cut
fn truncate_title(title: &str) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= TITLE_MAX_LEN {
        return title.to_string();
    }

    let keep = TITLE_MAX_LEN - ELLIPSIS.chars().count();
    let mut clipped: String = chars[..keep].iter().collect();
    clipped.push_str(ELLIPSIS);
    clipped
}
