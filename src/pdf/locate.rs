//! PDF discovery
//!
//! Walks a directory tree for `.pdf` files carrying a leading numeric key
//! in their file name (or, failing that, in their parent directory name)
//! and returns them sorted by that key.

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Output file names excluded from discovery so re-runs don't swallow
/// their own output
pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &["bound.pdf", "merged.pdf", "combined.pdf"];

/// One discovered per-ticket PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfEntry {
    /// Leading integer extracted from the file stem or parent directory
    pub number: u32,
    /// Path to the PDF file
    pub path: PathBuf,
    /// Directory the PDF lives in (searched later for note files)
    pub parent: PathBuf,
}

/// Options for PDF discovery
#[derive(Debug, Clone)]
pub struct LocateOptions {
    /// Root directory to walk
    pub root: PathBuf,
    /// File names (case-insensitive) skipped during the walk
    pub excluded_names: Vec<String>,
    /// Glob patterns matched against file names; matches are skipped
    pub exclude_patterns: Vec<Pattern>,
}

impl LocateOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_names: DEFAULT_EXCLUDED_NAMES.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Add a user-supplied exclusion pattern (e.g. `"draft-*.pdf"`)
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        let pattern =
            Pattern::new(pattern).map_err(|e| Error::InvalidPattern(format!("{}: {}", pattern, e)))?;
        self.exclude_patterns.push(pattern);
        Ok(self)
    }
}

/// Find all numbered PDFs under the root, sorted by `(number, path)`.
///
/// The path tiebreaker makes ordering deterministic where several files
/// share a number; raw traversal order is OS-dependent.
pub fn locate_pdfs(options: &LocateOptions) -> Result<Vec<PdfEntry>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(&options.root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if !has_pdf_extension(path) || is_excluded(path, options) {
            continue;
        }

        let number = match extract_number(path) {
            Some(n) => n,
            None => continue,
        };

        let parent = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        entries.push(PdfEntry {
            number,
            path: path.to_path_buf(),
            parent,
        });
    }

    entries.sort_by(|a, b| (a.number, &a.path).cmp(&(b.number, &b.path)));
    Ok(entries)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

fn is_excluded(path: &Path, options: &LocateOptions) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };

    options
        .excluded_names
        .iter()
        .any(|excl| name.eq_ignore_ascii_case(excl))
        || options.exclude_patterns.iter().any(|p| p.matches(name))
}

/// Extract the numeric key: leading digits of the file stem, falling back
/// to leading digits of the immediate parent directory's name
fn extract_number(path: &Path) -> Option<u32> {
    let from_stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(leading_number);
    if from_stem.is_some() {
        return from_stem;
    }

    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .and_then(leading_number)
}

/// Parse a leading run of ASCII digits, if any
pub fn leading_number(s: &str) -> Option<u32> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
