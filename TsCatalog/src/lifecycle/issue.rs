//! Validation issue types

use std::fmt;

use serde::Serialize;

use crate::formats::ts::MessageKey;

/// How serious an [`Issue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth knowing, nothing to fix.
    Info,
    /// Likely a problem for translators or lookups.
    Warning,
    /// The catalog breaks an integrity rule.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// What an [`Issue`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Two messages share an identity tuple.
    DuplicateKey,
    /// Plural variant count differs from the locale's category count.
    PluralMismatch,
    /// `numerus` flag and translation shape disagree.
    NumerusMismatch,
    /// Context without any unfinished or finished message.
    DeadContext,
    /// Finished message with empty translation text.
    EmptyFinished,
    /// Obsolete message in a dead context.
    OrphanedObsolete,
    /// A context name was declared more than once in the file.
    ContextMerged,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DuplicateKey => "duplicate-key",
            Self::PluralMismatch => "plural-mismatch",
            Self::NumerusMismatch => "numerus-mismatch",
            Self::DeadContext => "dead-context",
            Self::EmptyFinished => "empty-finished",
            Self::OrphanedObsolete => "orphaned-obsolete",
            Self::ContextMerged => "context-merged",
        })
    }
}

/// A problem found in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Severity.
    pub severity: Severity,
    /// Category.
    pub kind: IssueKind,
    /// Context the issue was found in.
    pub context: String,
    /// Message the issue is about, if it concerns a single message.
    pub identity: Option<MessageKey>,
    /// Human-readable explanation.
    pub description: String,
}

impl Issue {
    /// Create a new issue
    #[must_use]
    pub fn new(
        severity: Severity,
        kind: IssueKind,
        context: &str,
        identity: Option<MessageKey>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            context: context.to_string(),
            identity,
            description: description.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.kind, self.context)?;
        if let Some(identity) = &self.identity {
            write!(f, " {identity}")?;
        }
        write!(f, ": {}", self.description)
    }
}
