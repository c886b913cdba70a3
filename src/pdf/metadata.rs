//! PDF catalog traversal and page counting

use std::path::Path;

use lopdf::{Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Object id of the document catalog (the trailer's Root)
pub fn catalog_id(doc: &Document) -> Result<ObjectId> {
    let root = doc
        .trailer
        .get(b"Root")
        .map_err(|_| Error::General("No Root in trailer".to_string()))?;

    match root {
        Object::Reference(id) => Ok(*id),
        _ => Err(Error::General("Root is not a reference".to_string())),
    }
}

/// Object id of the root Pages node
pub fn pages_root_id(doc: &Document) -> Result<ObjectId> {
    let catalog = doc.get_object(catalog_id(doc)?)?;
    let pages = catalog
        .as_dict()
        .map_err(|_| Error::General("Catalog is not a dictionary".to_string()))?
        .get(b"Pages")
        .map_err(|_| Error::General("No Pages in catalog".to_string()))?;

    match pages {
        Object::Reference(id) => Ok(*id),
        _ => Err(Error::General("Pages is not a reference".to_string())),
    }
}

/// Count pages by reading Count from the root Pages dictionary.
/// More reliable than get_pages() for nested page trees.
pub fn count_pages_in(doc: &Document) -> Result<usize> {
    let pages = doc.get_object(pages_root_id(doc)?)?;
    let count = pages
        .as_dict()
        .map_err(|_| Error::General("Pages is not a dictionary".to_string()))?
        .get(b"Count")
        .map_err(|_| Error::General("No Count in Pages".to_string()))?;

    match count {
        Object::Integer(n) => Ok(*n as usize),
        _ => Err(Error::General("Count is not an integer".to_string())),
    }
}

/// Count the number of pages in a PDF file
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = count_pages_in(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}
