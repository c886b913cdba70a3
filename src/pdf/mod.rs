//! PDF assembly module

pub mod contents;
pub mod locate;
pub mod merge;
pub mod metadata;
pub mod title;
pub mod toc;

// Re-export commonly used items
pub use contents::render_contents_pages;
pub use locate::{locate_pdfs, LocateOptions, PdfEntry};
pub use merge::{merge_documents, MergeOutcome, MergedInput, SkippedInput};
pub use metadata::count_pages;
pub use title::resolve_title;
pub use toc::{add_bookmarks, write_text_index, TocEntry};
