//! Message lifecycle and catalog validation
//!
//! Status changes follow a fixed state machine:
//!
//! ```text
//! Unfinished <-> Finished
//! Finished    -> Obsolete -> Vanished
//! Unfinished  -> Vanished
//! ```
//!
//! `Vanished` is terminal. [`validate`] reports integrity problems as
//! [`Issue`] values; it never fails.

mod issue;
mod transition;
mod validation;

pub use issue::{Issue, IssueKind, Severity};
pub use validation::validate;

pub(crate) use validation::numerus_issue;
