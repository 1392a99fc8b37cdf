//! Error types for `TsCatalog`

use thiserror::Error;

use crate::formats::ts::Status;

/// Two active messages in one context share the same identity tuple.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("duplicate message in context '{context}': source {source_text:?}, comment {comment:?}")]
pub struct DuplicateKey {
    /// Context the collision happened in.
    pub context: String,
    /// Source text shared by both messages.
    pub source_text: String,
    /// Disambiguation comment shared by both messages, if any.
    pub comment: Option<String>,
}

/// Structural failures while reading a `.ts` catalog.
///
/// These are fatal: a catalog that produces one is rejected as a whole.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input is not well-formed XML, or violates the catalog structure.
    #[error("malformed catalog: {0}")]
    Malformed(String),

    /// The root element is not `<TS>`.
    #[error("unknown root element <{found}>: expected <TS>")]
    UnknownRoot {
        /// Name of the root element that was found.
        found: String,
    },

    /// Two active messages in one context share an identity tuple.
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKey),
}

impl ParseError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// The error type for `TsCatalog` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Catalog Format Errors ====================
    /// The catalog could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// XML writer error while serializing a catalog.
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// JSON serialization error while exporting a catalog.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== Message Store Errors ====================
    /// An active message with the same identity already exists.
    #[error(transparent)]
    DuplicateKey(#[from] DuplicateKey),

    /// The named context does not exist in the catalog.
    #[error("context not found: {0}")]
    ContextNotFound(String),

    /// No message with the given identity exists in the context.
    #[error("message not found in context '{context}': source {source_text:?}")]
    MessageNotFound {
        /// Context that was searched.
        context: String,
        /// Source text that was looked up.
        source_text: String,
    },

    /// The operation needs an unfinished or finished message.
    #[error("message {source_text:?} in context '{context}' is {status}, not active")]
    NotAnActiveMessage {
        /// Context of the message.
        context: String,
        /// Source text of the message.
        source_text: String,
        /// Current status of the message.
        status: Status,
    },

    // ==================== Lifecycle Errors ====================
    /// The requested status change is not allowed by the message lifecycle.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status the message currently has.
        from: Status,
        /// Status that was requested.
        to: Status,
    },
}

/// A specialized Result type for `TsCatalog` operations.
pub type Result<T> = std::result::Result<T, Error>;
