//! Ticket text parsing
//!
//! Segments a freeform blob of text into ordered (number, text) records.
//! A record opens on a line that starts with a digit run followed by `.`,
//! `)` or whitespace; lines that don't open a record continue the one
//! currently open, and are dropped when none is open yet.

use std::fmt;

/// One parsed ticket: a number and its (whitespace-collapsed) text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    /// Leading number of the record (not required unique or contiguous)
    pub number: u32,
    /// Record text with all whitespace runs collapsed to single spaces
    pub text: String,
}

impl fmt::Display for TicketRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number, self.text)
    }
}

/// Parser accumulator: either no record has opened yet, or one is open
/// and collecting continuation lines
enum Accumulator {
    Idle,
    Open { number: u32, chunks: Vec<String> },
}

impl Accumulator {
    /// Flush the open record (if any) into `out` and reset to Idle
    fn flush(&mut self, out: &mut Vec<TicketRecord>) {
        if let Accumulator::Open { number, chunks } = std::mem::replace(self, Accumulator::Idle) {
            out.push(TicketRecord {
                number,
                text: collapse_whitespace(&chunks.join(" ")),
            });
        }
    }
}

/// Input-terminating sentinel, matched case-insensitively on its own line
pub const SENTINEL: &str = "END";

/// Parse raw multi-line text into ticket records, in order of appearance.
/// A line consisting of the sentinel ends the input; it never becomes
/// part of a record's text.
///
/// Never fails: input with no record-start line yields an empty vector,
/// which callers must treat as a reportable "no records found" condition.
pub fn parse_tickets(raw: &str) -> Vec<TicketRecord> {
    let mut records = Vec::new();
    let mut acc = Accumulator::Idle;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case(SENTINEL) {
            break;
        }

        match split_record_start(line) {
            Some((number, rest)) => {
                acc.flush(&mut records);
                acc = Accumulator::Open {
                    number,
                    chunks: vec![rest.to_string()],
                };
            }
            None => {
                if let Accumulator::Open { chunks, .. } = &mut acc {
                    chunks.push(line.to_string());
                }
                // No record open yet: the line is dropped
            }
        }
    }

    acc.flush(&mut records);
    records
}

/// Check whether a (pre-trimmed) line opens a new record.
///
/// The pattern is: one or more digits, then one or more of `.`, `)` or
/// whitespace, then at least one more character. Returns the parsed
/// number and the remainder.
fn split_record_start(line: &str) -> Option<(u32, &str)> {
    let digits_end = line.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }

    let number: u32 = line[..digits_end].parse().ok()?;

    let rest = &line[digits_end..];
    let sep_len = rest
        .find(|c: char| c != '.' && c != ')' && !c.is_whitespace())
        .unwrap_or(rest.len());
    if sep_len == 0 {
        return None;
    }

    let rest = &rest[sep_len..];
    if rest.is_empty() {
        return None;
    }

    Some((number, rest))
}

/// Collapse all whitespace runs (spaces, tabs, newlines) to single spaces
/// and trim both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
