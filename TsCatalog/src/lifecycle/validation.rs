//! Catalog integrity checks

use std::collections::HashSet;

use super::issue::{Issue, IssueKind, Severity};
use crate::catalog::Catalog;
use crate::formats::ts::{Message, Status, TranslationText};
use crate::plural::PluralRule;

/// Check a catalog for integrity problems.
///
/// Reports duplicate active identities, plural slot mismatches, dead
/// contexts, finished messages without text and obsolete messages left in
/// dead contexts. Issues come out in document order.
#[must_use]
pub fn validate(catalog: &Catalog) -> Vec<Issue> {
    let rule = catalog.plural_rule();
    let mut issues = Vec::new();

    for context in catalog.store().contexts() {
        let name = context.name();
        let dead = context.active_count() == 0;
        if dead {
            issues.push(Issue::new(
                Severity::Warning,
                IssueKind::DeadContext,
                name,
                None,
                "context has no unfinished or finished messages",
            ));
        }

        let mut seen = HashSet::new();
        for message in context.messages() {
            if message.status.is_active() && !seen.insert(message.key()) {
                issues.push(Issue::new(
                    Severity::Error,
                    IssueKind::DuplicateKey,
                    name,
                    Some(message.key()),
                    "another active message has the same source and comment",
                ));
            }

            if let Some(issue) = numerus_issue(rule, name, message) {
                issues.push(issue);
            }

            if message.status == Status::Finished && message.translation.text.is_empty() {
                issues.push(Issue::new(
                    Severity::Warning,
                    IssueKind::EmptyFinished,
                    name,
                    Some(message.key()),
                    "message is marked finished but has no translation",
                ));
            }

            if dead && message.status == Status::Obsolete {
                issues.push(Issue::new(
                    Severity::Info,
                    IssueKind::OrphanedObsolete,
                    name,
                    Some(message.key()),
                    "obsolete message in a context with no active messages",
                ));
            }
        }
    }

    tracing::debug!("Validation found {} issues", issues.len());
    issues
}

/// Plural shape check for one active message.
pub(crate) fn numerus_issue(rule: PluralRule, context: &str, message: &Message) -> Option<Issue> {
    if !message.status.is_active() {
        return None;
    }
    let (kind, description) = match (&message.translation.text, message.numerus) {
        (TranslationText::Plural(forms), true) => {
            let expected = rule.category_count();
            if forms.len() == expected {
                return None;
            }
            (
                IssueKind::PluralMismatch,
                format!(
                    "{} plural forms, the {} rule needs {}",
                    forms.len(),
                    rule,
                    expected
                ),
            )
        }
        (TranslationText::Plural(_), false) => (
            IssueKind::NumerusMismatch,
            "plural forms on a message without numerus=\"yes\"".to_string(),
        ),
        (TranslationText::Singular(text), true) if !text.is_empty() => (
            IssueKind::NumerusMismatch,
            "numerus message translated without plural forms".to_string(),
        ),
        _ => return None,
    };
    Some(Issue::new(
        Severity::Warning,
        kind,
        context,
        Some(message.key()),
        description,
    ))
}
