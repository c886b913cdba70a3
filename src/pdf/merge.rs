//! PDF merging using lopdf
//!
//! Object-renumbering merge in the style of the lopdf merge example:
//! each source document's objects are renumbered past the running max id,
//! then all pages are collected under a freshly built Pages/Catalog pair.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Page span of one surviving input inside the merged document
#[derive(Debug, Clone)]
pub struct MergedInput {
    /// Index of this input in the original input list
    pub index: usize,
    pub path: PathBuf,
    /// 0-based page index of this input's first page in the merged body
    pub start_page: usize,
    pub page_count: usize,
}

/// An input that could not be merged; the merge continues without it
#[derive(Debug, Clone)]
pub struct SkippedInput {
    pub index: usize,
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a merge: the document is in memory, not yet saved, so a
/// contents page and bookmarks can still be added
#[derive(Debug)]
pub struct MergeOutcome {
    pub document: Document,
    pub merged: Vec<MergedInput>,
    pub skipped: Vec<SkippedInput>,
}

/// Merge PDF files, in the given order, into one in-memory document.
///
/// Unreadable or empty inputs are skipped and reported in the outcome.
/// Fails only when no input survives.
pub fn merge_documents(inputs: &[&Path]) -> Result<MergeOutcome> {
    if inputs.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    let mut merged = Vec::new();
    let mut skipped = Vec::new();

    let mut max_id = 1;
    let mut start_page = 0usize;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for (index, path) in inputs.iter().enumerate() {
        let mut doc = match Document::load(path) {
            Ok(doc) => doc,
            Err(e) => {
                skipped.push(SkippedInput {
                    index,
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        // Renumber objects in this document to avoid id conflicts
        doc.renumber_objects_with(max_id);

        let pages = doc.get_pages();
        if pages.is_empty() {
            skipped.push(SkippedInput {
                index,
                path: path.to_path_buf(),
                reason: "PDF has no pages".to_string(),
            });
            continue;
        }

        max_id = doc.max_id + 1;

        let page_count = pages.len();
        page_ids.extend(pages.into_values());
        objects.extend(doc.objects);

        merged.push(MergedInput {
            index,
            path: path.to_path_buf(),
            start_page,
            page_count,
        });
        start_page += page_count;
    }

    if merged.is_empty() {
        return Err(Error::General(
            "None of the input PDFs could be merged".to_string(),
        ));
    }

    let mut document = Document::with_version("1.5");
    document.objects.extend(objects);

    // max_id must cover the objects just added, or new_object_id() would
    // hand out colliding ids
    document.max_id = max_id - 1;

    let pages_id = document.new_object_id();

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = document.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    document.objects.insert(catalog_id, Object::Dictionary(catalog));
    document.objects.insert(pages_id, Object::Dictionary(pages_object));
    document.trailer.set("Root", Object::Reference(catalog_id));

    // Reparent every collected page under the new Pages node
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(ref mut dict)) = document.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    Ok(MergeOutcome {
        document,
        merged,
        skipped,
    })
}
