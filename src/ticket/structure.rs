//! Materializing ticket records as a folder/note tree

use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::ticket::parse::TicketRecord;
use crate::ticket::sanitize::sanitize_name;

/// Options for building the ticket directory tree
#[derive(Debug, Clone)]
pub struct StructureOptions {
    /// Root directory the per-ticket folders are created under
    pub root: PathBuf,
    /// Maximum length (in chars) for folder and file names
    pub max_name_len: usize,
    /// Note file extension, without the dot
    pub note_extension: String,
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("tickets"),
            max_name_len: 150,
            note_extension: "md".to_string(),
        }
    }
}

/// One successfully materialized ticket
#[derive(Debug, Clone)]
pub struct BuiltTicket {
    pub number: u32,
    pub folder: PathBuf,
    pub note: PathBuf,
}

/// A per-record failure; the offending names are kept for reporting
#[derive(Debug, Clone)]
pub struct BuildFailure {
    pub number: u32,
    pub folder_name: String,
    pub file_name: String,
    pub reason: String,
}

/// Outcome of a structure build: partial success is normal, a failed
/// record never aborts the remaining ones
#[derive(Debug, Default)]
pub struct BuildReport {
    pub created: Vec<BuiltTicket>,
    pub failures: Vec<BuildFailure>,
}

/// Create one folder and one note file per record, in parser order.
///
/// Folder and file names embed the record number and the sanitized text;
/// the note body keeps the unsanitized original text. Pre-existing
/// directories are reused. Only failure to create the root itself is
/// returned as an error; per-record failures land in the report.
pub fn build_structure(records: &[TicketRecord], options: &StructureOptions) -> Result<BuildReport> {
    fs::create_dir_all(&options.root)?;

    let mut report = BuildReport::default();

    for record in records {
        let folder_name = format!(
            "{}. {}",
            record.number,
            sanitize_name(&record.text, record.number, options.max_name_len, None)
        );
        let file_name = format!(
            "{}. {}",
            record.number,
            sanitize_name(
                &record.text,
                record.number,
                options.max_name_len,
                Some(&options.note_extension)
            )
        );

        let folder = options.root.join(&folder_name);
        let note = folder.join(&file_name);
        let body = format!("## {}. {}\n\n", record.number, record.text);

        let outcome = fs::create_dir_all(&folder).and_then(|_| fs::write(&note, body));
        match outcome {
            Ok(()) => report.created.push(BuiltTicket {
                number: record.number,
                folder,
                note,
            }),
            Err(e) => report.failures.push(BuildFailure {
                number: record.number,
                folder_name,
                file_name,
                reason: e.to_string(),
            }),
        }
    }

    Ok(report)
}
