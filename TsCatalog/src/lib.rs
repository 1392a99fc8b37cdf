#![allow(non_snake_case)]
//! # TsCatalog
//!
//! A pure-Rust engine for Qt Linguist `.ts` message catalogs.
//!
//! ## Features
//!
//! - **Parsing and serialization** - lossless round trips, including
//!   attributes and elements the engine does not interpret
//! - **Message store** - contexts in document order, O(1) lookup by
//!   (context, source, comment)
//! - **Plural rules** - numerus-form slot selection for 15 rule families
//! - **Lookup** - comment fallback, plural fallback, unfinished handling
//! - **Lifecycle** - status transitions and integrity validation
//!
//! ## Quick Start
//!
//! ### Reading and Querying a Catalog
//!
//! ```
//! use tscatalog::prelude::*;
//!
//! let xml = r#"<?xml version="1.0" encoding="utf-8"?>
//! <!DOCTYPE TS>
//! <TS version="2.1" language="cs_CZ">
//! <context>
//!     <name>Editor</name>
//!     <message numerus="yes">
//!         <source>%n lines filtered</source>
//!         <translation>
//!             <numerusform>%n řádek odfiltrován</numerusform>
//!             <numerusform>%n řádky odfiltrovány</numerusform>
//!             <numerusform>%n řádků odfiltrováno</numerusform>
//!         </translation>
//!     </message>
//! </context>
//! </TS>"#;
//!
//! let catalog = parse_ts(xml.as_bytes())?;
//! let translator = catalog.translator();
//! assert_eq!(
//!     translator.translate("Editor", "%n lines filtered", None, Some(3)),
//!     LookupResult::Found("%n řádky odfiltrovány"),
//! );
//! # Ok::<(), tscatalog::Error>(())
//! ```
//!
//! ### Editing and Writing a Catalog
//!
//! ```no_run
//! use tscatalog::prelude::*;
//!
//! let mut catalog = read_ts("app_de.ts")?;
//! catalog
//!     .store_mut()
//!     .set_status("MainWindow", "Quit", None, Status::Finished)?;
//! for issue in catalog.validate() {
//!     println!("{issue}");
//! }
//! write_ts(&catalog, "app_de.ts")?;
//! # Ok::<(), tscatalog::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `tscatalog` command-line binary

pub mod batch;
pub mod catalog;
pub mod error;
pub mod formats;
pub mod lifecycle;
pub mod lookup;
pub mod plural;

// Re-exports for convenience
pub use catalog::{Catalog, CatalogStats};
pub use error::{Error, ParseError, Result};
pub use formats::ts::{Message, MessageKey, Status};
pub use lookup::{LookupResult, Translator, TranslatorOptions};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{DuplicateKey, Error, ParseError, Result};

    pub use crate::catalog::{
        Catalog, CatalogStats, ContextView, InsertOutcome, MessageStore, RetireSummary,
    };
    pub use crate::formats::ts::{
        Context, ContextInfo, Location, Message, MessageKey, NumerusForm, ParsedCatalog,
        RawAttribute, Status, Translation, TranslationText, WriteOptions, parse_ts,
        parse_ts_with_issues, read_ts, read_ts_with_issues, serialize_ts,
        serialize_ts_with_options, write_ts, write_ts_with_options,
    };

    pub use crate::lifecycle::{Issue, IssueKind, Severity, validate};
    pub use crate::lookup::{LookupResult, Translator, TranslatorOptions};
    pub use crate::plural::{PluralRule, category_count, select_category};

    // Batch checking
    pub use crate::batch::{BatchCheckResult, FileSummary, check_file, check_files, find_ts_files};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
