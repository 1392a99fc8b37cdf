//! TS (Qt Linguist XML) format module

mod document;
mod reader;
mod writer;

/// Root element name of a catalog document.
pub const TS_ROOT: &str = "TS";

/// Format version written when a catalog does not carry one.
pub const DEFAULT_VERSION: &str = "2.1";

pub use document::{
    CatalogNode, Context, ContextInfo, Location, Message, MessageKey, NumerusForm, OpaqueBlob,
    OpaqueContent, RawAttribute, RetainedContent, Status, Translation, TranslationText,
};
pub use reader::{ParsedCatalog, parse_ts, parse_ts_with_issues, read_ts, read_ts_with_issues};
pub use writer::{
    WriteOptions, serialize_ts, serialize_ts_with_options, write_ts, write_ts_with_options,
};
