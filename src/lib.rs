//! Ticket Binder Library
//!
//! Two small pipelines for working with numbered "ticket" material:
//! - Parse a freeform numbered list into records and materialize one
//!   folder + one note file per record
//! - Discover per-ticket PDFs scattered under a directory, merge them in
//!   numeric order and build a table of contents (clickable bookmarks, an
//!   optional rendered contents page, and a plain-text index)
//!
//! # Example
//!
//! ```no_run
//! use ticket_binder::ticket::{parse_tickets, build_structure, StructureOptions};
//!
//! let records = parse_tickets("1. First ticket\n2. Second ticket");
//! let report = build_structure(&records, &StructureOptions::default())
//!     .expect("Failed to build structure");
//! println!("created {} tickets", report.created.len());
//! ```

pub mod error;
pub mod pdf;
pub mod ticket;

// Re-export commonly used items
pub use error::{Error, Result};
