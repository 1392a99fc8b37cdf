//! File format handlers
//!
//! Only the Qt Linguist `.ts` XML format is supported.

pub mod ts;

// Re-export main document types
pub use ts::{Context, Message, ParsedCatalog, Status, parse_ts, read_ts, serialize_ts, write_ts};
