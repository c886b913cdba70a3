//! Table of contents: in-document bookmarks and the plain-text index

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::error::{Error, Result};
use crate::pdf::metadata::catalog_id;

/// One entry of the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub number: u32,
    pub title: String,
    /// 0-based page index of the entry's first page in the merged body
    /// (not counting any prepended contents pages)
    pub start_page: usize,
    pub page_count: usize,
}

impl TocEntry {
    /// 1-based first/last page as shown to the reader, shifted past any
    /// prepended contents pages
    pub fn page_range(&self, page_shift: usize) -> (usize, usize) {
        let first = page_shift + self.start_page + 1;
        (first, first + self.page_count.saturating_sub(1))
    }
}

/// Add a flat bookmark outline, one item per entry, each pointing at the
/// entry's first page with a /Fit destination.
///
/// `page_shift` is the number of pages prepended ahead of the merged body
/// (contents pages), so targets keep pointing at the right page.
pub fn add_bookmarks(doc: &mut Document, entries: &[TocEntry], page_shift: usize) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let outlines_id = doc.new_object_id();

    // First pass: create the items with Title/Parent/Dest
    let mut item_ids = Vec::with_capacity(entries.len());
    for entry in entries {
        let page_index = page_shift + entry.start_page;
        let page_id = *page_ids.get(page_index).ok_or_else(|| {
            Error::General(format!(
                "Bookmark target page {} out of range ({} pages)",
                page_index,
                page_ids.len()
            ))
        })?;

        let mut item = Dictionary::new();
        item.set("Title", pdf_text_string(&entry.title));
        item.set("Parent", Object::Reference(outlines_id));
        item.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(page_id),
                Object::Name(b"Fit".to_vec()),
            ]),
        );
        item_ids.push(doc.add_object(Object::Dictionary(item)));
    }

    // Second pass: link siblings
    for (i, &item_id) in item_ids.iter().enumerate() {
        if let Ok(Object::Dictionary(ref mut dict)) = doc.get_object_mut(item_id) {
            if i > 0 {
                dict.set("Prev", Object::Reference(item_ids[i - 1]));
            }
            if i + 1 < item_ids.len() {
                dict.set("Next", Object::Reference(item_ids[i + 1]));
            }
        }
    }

    let mut outlines = Dictionary::new();
    outlines.set("Type", Object::Name(b"Outlines".to_vec()));
    outlines.set("First", Object::Reference(item_ids[0]));
    outlines.set("Last", Object::Reference(*item_ids.last().unwrap()));
    outlines.set("Count", Object::Integer(item_ids.len() as i64));
    doc.objects.insert(outlines_id, Object::Dictionary(outlines));

    let catalog_id = catalog_id(doc)?;
    if let Ok(Object::Dictionary(ref mut catalog)) = doc.get_object_mut(catalog_id) {
        catalog.set("Outlines", Object::Reference(outlines_id));
        catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));
    }

    Ok(())
}

/// Encode a PDF text string: plain literal for ASCII, UTF-16BE with BOM
/// otherwise
pub fn pdf_text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::String(s.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Write the standalone plain-text index: number, title and 1-based page
/// range per entry, in merge order
pub fn write_text_index(path: &Path, entries: &[TocEntry], page_shift: usize) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "CONTENTS")?;
    writeln!(out, "Generated on {}", Local::now().format("%Y-%m-%d"))?;
    writeln!(out)?;

    for entry in entries {
        let (first, last) = entry.page_range(page_shift);
        let pages = if first == last {
            format!("page {}", first)
        } else {
            format!("pages {}-{}", first, last)
        };
        writeln!(out, "{}. {} ({})", entry.number, entry.title, pages)?;
    }

    out.flush()?;
    Ok(())
}
