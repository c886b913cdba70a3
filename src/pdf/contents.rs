//! Rendered contents page
//!
//! Draws "CONTENTS" page(s) with lopdf content streams and prepends them
//! to a merged document. Text is set in base-14 Helvetica with
//! WinAnsiEncoding; characters outside WinAnsi render as `?` (the
//! bookmarks and the text index carry the full title).

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::Result;
use crate::pdf::metadata::pages_root_id;
use crate::pdf::toc::TocEntry;

// A4 page geometry, in points
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 20.0;

const HEADING_FONT_SIZE: f32 = 16.0;
const ENTRY_FONT_SIZE: f32 = 12.0;

/// Titles longer than this are clipped on the rendered page (the full
/// title still goes into bookmarks and the text index)
const DISPLAY_TITLE_LEN: usize = 60;

/// Render the contents page(s) for `entries` and prepend them to the
/// document. Returns the number of pages added; page numbers shown on the
/// page are 1-based and count the contents pages themselves.
pub fn render_contents_pages(doc: &mut Document, entries: &[TocEntry]) -> Result<usize> {
    if entries.is_empty() {
        return Ok(0);
    }

    let slots = layout_entries(entries.len());
    let page_shift = slots.last().map(|(page, _)| page + 1).unwrap_or(1);

    let font_id = add_helvetica(doc);

    let mut page_ids = Vec::with_capacity(page_shift);
    for page_index in 0..page_shift {
        let content = page_content(page_index, entries, &slots, page_shift);
        let page_id = add_contents_page(doc, content, font_id)?;
        page_ids.push(page_id);
    }

    prepend_to_page_tree(doc, &page_ids)?;
    Ok(page_shift)
}

/// Assign each entry a (page index, baseline y) slot. The first page
/// carries the heading, continuation pages start at the top margin.
fn layout_entries(count: usize) -> Vec<(usize, f32)> {
    let mut slots = Vec::with_capacity(count);
    let mut page = 0usize;
    // First entry sits 30pt below the heading
    let mut y = PAGE_HEIGHT - MARGIN - 50.0 - 30.0;

    for _ in 0..count {
        if y < MARGIN + 50.0 {
            page += 1;
            y = PAGE_HEIGHT - MARGIN - 50.0;
        }
        slots.push((page, y));
        y -= LINE_HEIGHT;
    }

    slots
}

/// Content stream for one contents page
fn page_content(
    page_index: usize,
    entries: &[TocEntry],
    slots: &[(usize, f32)],
    page_shift: usize,
) -> String {
    let mut content = String::new();
    content.push_str("0 g\n");

    if page_index == 0 {
        let y = PAGE_HEIGHT - MARGIN - 50.0;
        push_text(&mut content, MARGIN, y, HEADING_FONT_SIZE, "CONTENTS");
    }

    for (entry, &(page, y)) in entries.iter().zip(slots) {
        if page != page_index {
            continue;
        }

        let label = display_title(entry);
        push_text(&mut content, MARGIN, y, ENTRY_FONT_SIZE, &label);

        let (first, last) = entry.page_range(page_shift);
        let range = if first == last {
            first.to_string()
        } else {
            format!("{}-{}", first, last)
        };
        let x = PAGE_WIDTH - MARGIN - estimate_text_width(&range, ENTRY_FONT_SIZE);
        push_text(&mut content, x, y, ENTRY_FONT_SIZE, &range);
    }

    content
}

fn display_title(entry: &TocEntry) -> String {
    let label = format!("{}. {}", entry.number, entry.title);
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= DISPLAY_TITLE_LEN {
        label
    } else {
        let mut clipped: String = chars[..DISPLAY_TITLE_LEN].iter().collect();
        clipped.push_str("...");
        clipped
    }
}

/// Append a BT/ET text block at (x, y)
fn push_text(content: &mut String, x: f32, y: f32, size: f32, text: &str) {
    content.push_str("BT\n");
    content.push_str(&format!("/F1 {} Tf\n", size));
    content.push_str(&format!("1 0 0 1 {:.2} {:.2} Tm\n", x, y));
    content.push_str(&format!("{} Tj\n", winansi_hex_string(text)));
    content.push_str("ET\n");
}

/// Encode text as a PDF hex string of WinAnsi bytes (no escaping needed)
fn winansi_hex_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2 + 2);
    out.push('<');
    for c in text.chars() {
        out.push_str(&format!("{:02X}", winansi_byte(c)));
    }
    out.push('>');
    out
}

/// Map a char to its WinAnsi (CP1252) byte, `?` when unmappable
fn winansi_byte(c: char) -> u8 {
    match c {
        c if (c as u32) < 0x80 => c as u8,
        '\u{00A0}'..='\u{00FF}' => (c as u32) as u8,
        '\u{20AC}' => 0x80, // euro
        '\u{2026}' => 0x85, // ellipsis
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96, // en dash
        '\u{2014}' => 0x97, // em dash
        '\u{2122}' => 0x99, // trademark
        _ => b'?',
    }
}

/// Rough text width: average Helvetica glyph is about half an em
fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

/// Base-14 Helvetica with WinAnsiEncoding; nothing to embed
fn add_helvetica(doc: &mut Document) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    doc.add_object(Object::Dictionary(font))
}

/// Create one A4 page object holding `content`, parented to the root
/// Pages node
fn add_contents_page(doc: &mut Document, content: String, font_id: ObjectId) -> Result<ObjectId> {
    let pages_id = pages_root_id(doc)?;

    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut fonts = Dictionary::new();
    fonts.set("F1", Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(PAGE_WIDTH),
            Object::Real(PAGE_HEIGHT),
        ]),
    );
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Reference(content_id));

    Ok(doc.add_object(Object::Dictionary(page)))
}

/// Splice the new pages at the front of the root Kids array and bump Count
fn prepend_to_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let pages_id = pages_root_id(doc)?;

    if let Ok(Object::Dictionary(ref mut pages)) = doc.get_object_mut(pages_id) {
        let mut kids: Vec<Object> = match pages.get(b"Kids") {
            Ok(Object::Array(existing)) => existing.clone(),
            _ => Vec::new(),
        };

        for &id in page_ids.iter().rev() {
            kids.insert(0, Object::Reference(id));
        }

        let count = kids.len() as i64;
        pages.set("Kids", Object::Array(kids));
        pages.set("Count", Object::Integer(count));
    }

    Ok(())
}
