//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;
use std::str::FromStr;

use crate::formats::ts::Status;

/// Message status given on the command line
#[derive(Debug, Clone, Copy)]
pub struct StatusArg(pub Status);

impl FromStr for StatusArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::from_name(s).map(StatusArg).ok_or_else(|| {
            format!(
                "Invalid status '{s}'. Valid values: unfinished, finished, obsolete, vanished"
            )
        })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show message counts per status
    Stats {
        /// Catalog files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate catalogs (files or directories)
    Check {
        /// Catalog files or directories to search for .ts files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Fail on warnings as well as errors
        #[arg(long)]
        strict: bool,

        /// Only print issues, no progress or summary
        #[arg(short, long)]
        quiet: bool,
    },

    /// Look up a translation
    Lookup {
        /// Catalog file
        file: PathBuf,

        /// Context name
        context: String,

        /// Source text
        source: String,

        /// Disambiguation comment
        #[arg(short, long)]
        comment: Option<String>,

        /// Quantity for plural messages
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Do not serve translations of unfinished messages
        #[arg(long)]
        finished_only: bool,
    },

    /// Show the plural rule for a locale
    Plural {
        /// Locale tag, e.g. cs_CZ or pt-BR
        locale: String,

        /// Quantities to show the selected slot for
        quantities: Vec<u64>,
    },

    /// Re-serialize a catalog in canonical form
    Format {
        /// Source catalog
        source: PathBuf,

        /// Output file (defaults to rewriting the source)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 4)]
        indent: usize,

        /// Write a UTF-8 byte order mark
        #[arg(long)]
        bom: bool,

        /// Omit the <!DOCTYPE TS> line
        #[arg(long)]
        no_doctype: bool,
    },

    /// Remove vanished (and optionally obsolete) messages
    Compact {
        /// Source catalog
        source: PathBuf,

        /// Output file (defaults to rewriting the source)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also remove obsolete messages
        #[arg(long)]
        obsolete: bool,
    },

    /// Change the status of a message
    SetStatus {
        /// Catalog file
        file: PathBuf,

        /// Context name
        context: String,

        /// Source text
        source: String,

        /// New status: unfinished, finished, obsolete or vanished
        status: StatusArg,

        /// Disambiguation comment
        #[arg(short, long)]
        comment: Option<String>,

        /// Output file (defaults to rewriting the catalog)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print catalog contents
    Dump {
        /// Catalog file
        file: PathBuf,

        /// Only this context
        #[arg(long)]
        context: Option<String>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}
