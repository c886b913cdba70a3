//! Integration tests for the ticket-binder library
//!
//! PDF fixtures are generated on the fly with lopdf, so the tests carry
//! no binary files.

use std::fs;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, Stream};
use tempfile::TempDir;

use ticket_binder::pdf::{
    add_bookmarks, count_pages, locate_pdfs, merge_documents, render_contents_pages,
    resolve_title, write_text_index, LocateOptions, TocEntry,
};
use ticket_binder::ticket::{build_structure, parse_tickets, StructureOptions};

/// Write a minimal valid PDF with the given number of (blank) pages
fn write_test_pdf(path: &Path, pages: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"BT ET".to_vec()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        );
        page.set("Contents", Object::Reference(content_id));
        kids.push(Object::Reference(doc.add_object(Object::Dictionary(page))));
    }

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(pages as i64));
    pages_dict.set("Kids", Object::Array(kids));
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).expect("Failed to save test PDF");
}

#[test]
fn test_structure_end_to_end() {
    let dir = TempDir::new().unwrap();
    let options = StructureOptions {
        root: dir.path().join("tickets"),
        ..StructureOptions::default()
    };

    let records = parse_tickets("Intro prose\n1. Limits and continuity\nwrapped line\n2) Derivatives");
    assert_eq!(records.len(), 2);

    let report = build_structure(&records, &options).unwrap();
    assert_eq!(report.created.len(), 2);
    assert!(report.failures.is_empty());

    let note = options
        .root
        .join("1. Limits and continuity wrapped line")
        .join("1. Limits and continuity wrapped line.md");
    assert_eq!(
        fs::read_to_string(note).unwrap(),
        "## 1. Limits and continuity wrapped line\n\n"
    );
}

#[test]
fn test_locator_orders_numerically() {
    let dir = TempDir::new().unwrap();
    for name in ["2.pdf", "10.pdf", "1.pdf"] {
        write_test_pdf(&dir.path().join(name), 1);
    }

    let entries = locate_pdfs(&LocateOptions::new(dir.path())).unwrap();
    let names: Vec<_> = entries
        .iter()
        .map(|e| e.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["1.pdf", "2.pdf", "10.pdf"]);
}

#[test]
fn test_merge_page_spans() {
    // Three documents of 3, 1, 2 pages yield start pages 0, 3, 4
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("1.pdf");
    let b = dir.path().join("2.pdf");
    let c = dir.path().join("3.pdf");
    write_test_pdf(&a, 3);
    write_test_pdf(&b, 1);
    write_test_pdf(&c, 2);

    let outcome = merge_documents(&[&a, &b, &c]).unwrap();
    assert!(outcome.skipped.is_empty());

    let starts: Vec<usize> = outcome.merged.iter().map(|m| m.start_page).collect();
    assert_eq!(starts, vec![0, 3, 4]);
    assert_eq!(outcome.document.get_pages().len(), 6);
}

#[test]
fn test_merge_skips_broken_input_and_continues() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("1.pdf");
    let broken = dir.path().join("2.pdf");
    let also_good = dir.path().join("3.pdf");
    write_test_pdf(&good, 2);
    fs::write(&broken, b"this is not a pdf").unwrap();
    write_test_pdf(&also_good, 1);

    let outcome = merge_documents(&[&good, &broken, &also_good]).unwrap();

    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].index, 1);

    let starts: Vec<usize> = outcome.merged.iter().map(|m| m.start_page).collect();
    assert_eq!(starts, vec![0, 2]);
    assert_eq!(outcome.document.get_pages().len(), 3);
}

#[test]
fn test_merged_output_reloads_with_correct_page_count() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("1.pdf");
    let b = dir.path().join("2.pdf");
    write_test_pdf(&a, 2);
    write_test_pdf(&b, 3);

    let mut outcome = merge_documents(&[&a, &b]).unwrap();
    let output = dir.path().join("bound.pdf");
    outcome.document.compress();
    outcome.document.save(&output).unwrap();

    assert_eq!(count_pages(&output).unwrap(), 5);
}

#[test]
fn test_bookmarks_added_per_entry() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("1.pdf");
    let b = dir.path().join("2.pdf");
    write_test_pdf(&a, 3);
    write_test_pdf(&b, 1);

    let mut outcome = merge_documents(&[&a, &b]).unwrap();
    let toc: Vec<TocEntry> = outcome
        .merged
        .iter()
        .enumerate()
        .map(|(i, m)| TocEntry {
            number: (i + 1) as u32,
            title: format!("Ticket {}", i + 1),
            start_page: m.start_page,
            page_count: m.page_count,
        })
        .collect();

    add_bookmarks(&mut outcome.document, &toc, 0).unwrap();

    let doc = &outcome.document;
    let catalog_ref = doc.trailer.get(b"Root").unwrap();
    let catalog_id = match catalog_ref {
        Object::Reference(id) => *id,
        _ => panic!("Root is not a reference"),
    };
    let catalog = doc.get_object(catalog_id).unwrap().as_dict().unwrap();

    let outlines_id = match catalog.get(b"Outlines").unwrap() {
        Object::Reference(id) => *id,
        _ => panic!("Outlines is not a reference"),
    };
    let outlines = doc.get_object(outlines_id).unwrap().as_dict().unwrap();
    assert_eq!(outlines.get(b"Count").unwrap(), &Object::Integer(2));

    // Walk the sibling chain and collect titles
    let mut titles = Vec::new();
    let mut next = outlines.get(b"First").ok().cloned();
    while let Some(Object::Reference(item_id)) = next {
        let item = doc.get_object(item_id).unwrap().as_dict().unwrap();
        if let Ok(Object::String(bytes, _)) = item.get(b"Title") {
            titles.push(String::from_utf8_lossy(bytes).to_string());
        }
        next = item.get(b"Next").ok().cloned();
    }
    assert_eq!(titles, vec!["Ticket 1", "Ticket 2"]);
}

#[test]
fn test_contents_page_prepended_and_shift_applied() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("1.pdf");
    let b = dir.path().join("2.pdf");
    write_test_pdf(&a, 2);
    write_test_pdf(&b, 2);

    let mut outcome = merge_documents(&[&a, &b]).unwrap();
    let toc: Vec<TocEntry> = outcome
        .merged
        .iter()
        .enumerate()
        .map(|(i, m)| TocEntry {
            number: (i + 1) as u32,
            title: format!("Ticket {}", i + 1),
            start_page: m.start_page,
            page_count: m.page_count,
        })
        .collect();

    let shift = render_contents_pages(&mut outcome.document, &toc).unwrap();
    assert_eq!(shift, 1);
    assert_eq!(outcome.document.get_pages().len(), 5);

    add_bookmarks(&mut outcome.document, &toc, shift).unwrap();

    // Saved output should round-trip with the extra page
    let output = dir.path().join("bound.pdf");
    outcome.document.compress();
    outcome.document.save(&output).unwrap();
    assert_eq!(count_pages(&output).unwrap(), 5);
}

#[test]
fn test_full_assemble_pipeline_with_titles_and_index() {
    let dir = TempDir::new().unwrap();

    // Layout mirroring what `structure` produces, plus scanned PDFs
    let t1 = dir.path().join("1. Limits");
    let t2 = dir.path().join("2. Series");
    write_test_pdf(&t1.join("1. Limits.pdf"), 2);
    write_test_pdf(&t2.join("scan.pdf"), 1); // number comes from the folder
    fs::write(t1.join("1. Limits.md"), "## 1. Limits\n\n").unwrap();
    fs::write(t2.join("2. Series.md"), "## 2. Series\n\n").unwrap();

    // Stale output from a previous run must not be rediscovered
    write_test_pdf(&dir.path().join("bound.pdf"), 9);

    let entries = locate_pdfs(&LocateOptions::new(dir.path())).unwrap();
    assert_eq!(entries.len(), 2);

    let titles: Vec<String> = entries.iter().map(resolve_title).collect();
    assert_eq!(titles, vec!["1. Limits", "2. Series"]);

    let paths: Vec<&Path> = entries.iter().map(|e| e.path.as_path()).collect();
    let outcome = merge_documents(&paths).unwrap();

    let toc: Vec<TocEntry> = outcome
        .merged
        .iter()
        .map(|m| TocEntry {
            number: entries[m.index].number,
            title: titles[m.index].clone(),
            start_page: m.start_page,
            page_count: m.page_count,
        })
        .collect();

    let index_path = dir.path().join("contents.txt");
    write_text_index(&index_path, &toc, 0).unwrap();

    let body = fs::read_to_string(&index_path).unwrap();
    assert!(body.contains("1. 1. Limits (pages 1-2)"));
    assert!(body.contains("2. 2. Series (page 3)"));
}
