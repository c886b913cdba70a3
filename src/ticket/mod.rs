//! Ticket structuring module

pub mod parse;
pub mod sanitize;
pub mod structure;

// Re-export commonly used items
pub use parse::{parse_tickets, TicketRecord, SENTINEL};
pub use sanitize::sanitize_name;
pub use structure::{build_structure, BuildReport, BuiltTicket, StructureOptions};
