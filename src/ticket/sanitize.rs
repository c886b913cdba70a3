//! Filesystem-safe name derivation
//!
//! The reserved-character set and trailing-dot stripping are a portability
//! policy applied on every platform, not host detection logic.

/// Characters stripped unconditionally (reserved on at least one common
/// filesystem)
pub const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Derive a filesystem-safe, length-bounded name from ticket text.
///
/// Steps: strip reserved characters, trim, strip trailing dots, truncate
/// to `max_len` characters preferring the last whitespace boundary so
/// words are not split, and substitute a `Ticket_<number>` placeholder if
/// nothing is left. When `extension` is given (without its dot), the
/// truncation budget is reduced by the extension plus one separator and
/// the extension is re-appended unchanged.
pub fn sanitize_name(text: &str, number: u32, max_len: usize, extension: Option<&str>) -> String {
    let budget = match extension {
        Some(ext) => max_len.saturating_sub(ext.chars().count() + 1),
        None => max_len,
    };

    let cleaned: String = text.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect();
    let cleaned = cleaned.trim().trim_end_matches('.').trim();

    let mut base = truncate_at_word(cleaned, budget);
    if base.is_empty() {
        base = format!("Ticket_{}", number);
    }

    match extension {
        Some(ext) => format!("{}.{}", base, ext),
        None => base,
    }
}

/// Truncate to at most `max_len` characters, cutting at the last
/// whitespace boundary within the limit when one exists
fn truncate_at_word(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }

    let head = &chars[..max_len];
    let cut = match head.iter().rposition(|c| c.is_whitespace()) {
        // A boundary at position 0 would leave nothing; hard-cut instead
        Some(0) | None => max_len,
        Some(pos) => pos,
    };

    head[..cut].iter().collect::<String>().trim_end().to_string()
}
