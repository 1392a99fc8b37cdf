//! Command execution implementations

use super::definitions::Commands;
use super::{catalog, check, lookup};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Stats { files, json } => catalog::stats(files, *json),
            Commands::Check {
                paths,
                strict,
                quiet,
            } => check::execute(paths, *strict, *quiet),
            Commands::Lookup {
                file,
                context,
                source,
                comment,
                count,
                finished_only,
            } => lookup::lookup(
                file,
                context,
                source,
                comment.as_deref(),
                *count,
                *finished_only,
            ),
            Commands::Plural { locale, quantities } => lookup::plural(locale, quantities),
            Commands::Format {
                source,
                output,
                indent,
                bom,
                no_doctype,
            } => catalog::format(source, output.as_deref(), *indent, *bom, !*no_doctype),
            Commands::Compact {
                source,
                output,
                obsolete,
            } => catalog::compact(source, output.as_deref(), *obsolete),
            Commands::SetStatus {
                file,
                context,
                source,
                status,
                comment,
                output,
            } => catalog::set_status(
                file,
                context,
                source,
                comment.as_deref(),
                status.0,
                output.as_deref(),
            ),
            Commands::Dump {
                file,
                context,
                json,
            } => catalog::dump(file, context.as_deref(), *json),
        }
    }
}
