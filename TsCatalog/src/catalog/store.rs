//! Indexed message storage
//!
//! Messages live in per-context slot vectors in document order. Two hash
//! indices sit on top: one for active messages (unique per identity) and one
//! for retired messages (obsolete/vanished, several per identity allowed).
//! Removal leaves a tombstone so slot numbers stay stable until
//! [`MessageStore::compact`] is called.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{DuplicateKey, Error, Result};
use crate::formats::ts::{Context, ContextInfo, Message, Status, TranslationText};

/// source -> comment -> T
type KeyIndex<T> = HashMap<String, HashMap<String, T>>;

/// What [`MessageStore::insert`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// New identity.
    Added,
    /// Active message added over retired ones with the same identity.
    /// The retired messages are kept as suggestions.
    Superseded,
    /// Retired message whose identity is already taken. Kept as a suggestion.
    RetainedDuplicate,
}

/// Counts from [`MessageStore::retire_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetireSummary {
    /// Finished messages moved to obsolete.
    pub obsoleted: usize,
    /// Unfinished messages moved to vanished.
    pub vanished: usize,
}

/// Messages grouped by context, indexed by identity.
///
/// Equality compares contexts and live messages in order. Tombstones and
/// slot numbers are ignored.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    contexts: IndexMap<String, ContextBucket>,
}

impl PartialEq for MessageStore {
    fn eq(&self, other: &Self) -> bool {
        self.contexts.len() == other.contexts.len()
            && self
                .contexts
                .values()
                .zip(other.contexts.values())
                .all(|(a, b)| a.info == b.info && a.messages().eq(b.messages()))
    }
}

impl Eq for MessageStore {}

#[derive(Debug, Clone)]
struct ContextBucket {
    info: ContextInfo,
    slots: Vec<Option<Message>>,
    active: KeyIndex<usize>,
    retired: KeyIndex<Vec<usize>>,
    live: usize,
}

impl ContextBucket {
    fn new(info: ContextInfo) -> Self {
        Self {
            info,
            slots: Vec::new(),
            active: HashMap::new(),
            retired: HashMap::new(),
            live: 0,
        }
    }

    fn active_slot(&self, source: &str, comment: &str) -> Option<usize> {
        self.active.get(source)?.get(comment).copied()
    }

    fn retired_slots(&self, source: &str, comment: &str) -> &[usize] {
        self.retired
            .get(source)
            .and_then(|by_comment| by_comment.get(comment))
            .map_or(&[], Vec::as_slice)
    }

    fn message(&self, slot: usize) -> Option<&Message> {
        self.slots.get(slot)?.as_ref()
    }

    fn messages(&self) -> impl Iterator<Item = &Message> {
        self.slots.iter().flatten()
    }

    fn push(&mut self, message: Message) {
        let slot = self.slots.len();
        let source = message.source.clone();
        let comment = message.comment_key().to_string();
        let active = message.status.is_active();
        self.slots.push(Some(message));
        self.live += 1;
        if active {
            self.active.entry(source).or_default().insert(comment, slot);
        } else {
            self.index_retired(source, comment, slot);
        }
    }

    fn index_retired(&mut self, source: String, comment: String, slot: usize) {
        let slots = self
            .retired
            .entry(source)
            .or_default()
            .entry(comment)
            .or_default();
        // Keep document order
        let at = slots.partition_point(|&s| s < slot);
        slots.insert(at, slot);
    }

    fn unindex(&mut self, message: &Message, slot: usize) {
        let comment = message.comment_key();
        if message.status.is_active() {
            if let Some(by_comment) = self.active.get_mut(&message.source) {
                by_comment.remove(comment);
                if by_comment.is_empty() {
                    self.active.remove(&message.source);
                }
            }
        } else if let Some(by_comment) = self.retired.get_mut(&message.source) {
            if let Some(slots) = by_comment.get_mut(comment) {
                slots.retain(|&s| s != slot);
                if slots.is_empty() {
                    by_comment.remove(comment);
                }
            }
            if by_comment.is_empty() {
                self.retired.remove(&message.source);
            }
        }
    }

    /// Change the status of the message in `slot`, keeping the indices in sync.
    fn transition(&mut self, slot: usize, next: Status) -> Result<Status> {
        let Some(message) = self.slots.get_mut(slot).and_then(Option::as_mut) else {
            return Err(Error::MessageNotFound {
                context: self.info.name.clone(),
                source_text: String::new(),
            });
        };
        let previous = message.status;
        if previous == next {
            return Ok(previous);
        }
        if !previous.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: previous,
                to: next,
            });
        }

        let retiring = previous.is_active() && !next.is_active();
        let snapshot = retiring.then(|| (message.source.clone(), message.comment_key().to_string()));
        message.apply_status(next);

        if let Some((source, comment)) = snapshot {
            if let Some(by_comment) = self.active.get_mut(&source) {
                by_comment.remove(&comment);
                if by_comment.is_empty() {
                    self.active.remove(&source);
                }
            }
            self.index_retired(source, comment, slot);
        }
        Ok(previous)
    }

    /// Tombstone every message matching `predicate`.
    fn remove_where(&mut self, predicate: impl Fn(&Message) -> bool) -> usize {
        let doomed: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, message)| message.as_ref().is_some_and(&predicate).then_some(slot))
            .collect();
        for &slot in &doomed {
            if let Some(message) = self.slots.get_mut(slot).and_then(Option::take) {
                self.unindex(&message, slot);
                self.live -= 1;
            }
        }
        doomed.len()
    }

    fn compact(&mut self) -> usize {
        let reclaimed = self.slots.len() - self.live;
        let messages: Vec<Message> = std::mem::take(&mut self.slots).into_iter().flatten().collect();
        self.active.clear();
        self.retired.clear();
        self.live = 0;
        for message in messages {
            self.push(message);
        }
        reclaimed
    }
}

/// Read-only view of one context.
#[derive(Debug, Clone, Copy)]
pub struct ContextView<'a> {
    bucket: &'a ContextBucket,
}

impl<'a> ContextView<'a> {
    /// Context name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.bucket.info.name
    }

    /// Context-level data (comment, unknown attributes and children).
    #[must_use]
    pub fn info(&self) -> &'a ContextInfo {
        &self.bucket.info
    }

    /// All stored messages in document order, retired ones included.
    pub fn messages(&self) -> impl Iterator<Item = &'a Message> + use<'a> {
        self.bucket.slots.iter().flatten()
    }

    /// Active message with the given identity.
    #[must_use]
    pub fn get(&self, source: &str, comment: Option<&str>) -> Option<&'a Message> {
        let slot = self.bucket.active_slot(source, comment.unwrap_or(""))?;
        self.bucket.message(slot)
    }

    /// Number of stored messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bucket.live
    }

    /// Whether the context holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bucket.live == 0
    }

    /// Number of unfinished and finished messages.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.bucket.active.values().map(HashMap::len).sum()
    }

    /// Owned copy of the context and its messages.
    #[must_use]
    pub fn to_context(&self) -> Context {
        Context {
            info: self.bucket.info.clone(),
            messages: self.messages().cloned().collect(),
        }
    }
}

impl MessageStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a context. Returns `false` if the name already exists; the
    /// existing context data is kept.
    pub fn insert_context(&mut self, info: ContextInfo) -> bool {
        if self.contexts.contains_key(&info.name) {
            return false;
        }
        self.contexts.insert(info.name.clone(), ContextBucket::new(info));
        true
    }

    /// Mutable context data. The name must not change; it keys the store.
    pub(crate) fn context_info_mut(&mut self, name: &str) -> Option<&mut ContextInfo> {
        self.contexts.get_mut(name).map(|bucket| &mut bucket.info)
    }

    /// Insert a message into a context, creating the context if needed.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateKey`] if the message is active and an active
    /// message with the same identity already exists in the context.
    pub fn insert(&mut self, context: &str, message: Message) -> Result<InsertOutcome> {
        if !self.contexts.contains_key(context) {
            self.insert_context(ContextInfo::new(context));
        }
        let bucket = self
            .contexts
            .get_mut(context)
            .ok_or_else(|| Error::ContextNotFound(context.to_string()))?;

        let comment = message.comment_key();
        let active_taken = bucket.active_slot(&message.source, comment).is_some();
        let retired_taken = !bucket.retired_slots(&message.source, comment).is_empty();

        let outcome = if message.status.is_active() {
            if active_taken {
                return Err(DuplicateKey {
                    context: context.to_string(),
                    source_text: message.source,
                    comment: message.comment.filter(|c| !c.is_empty()),
                }
                .into());
            }
            if retired_taken {
                InsertOutcome::Superseded
            } else {
                InsertOutcome::Added
            }
        } else if active_taken || retired_taken {
            InsertOutcome::RetainedDuplicate
        } else {
            InsertOutcome::Added
        };

        bucket.push(message);
        Ok(outcome)
    }

    /// Active message (unfinished or finished) with the given identity.
    #[must_use]
    pub fn get(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.context(context)?.get(source, comment)
    }

    /// Retired messages with the given identity, oldest first.
    #[must_use]
    pub fn suggestions(&self, context: &str, source: &str, comment: Option<&str>) -> Vec<&Message> {
        let Some(bucket) = self.contexts.get(context) else {
            return Vec::new();
        };
        bucket
            .retired_slots(source, comment.unwrap_or(""))
            .iter()
            .filter_map(|&slot| bucket.message(slot))
            .collect()
    }

    /// All messages of a context in document order. Empty if the context
    /// does not exist.
    pub fn iter_context<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Message> + use<'a> {
        self.contexts
            .get(name)
            .into_iter()
            .flat_map(|bucket| bucket.messages())
    }

    /// All contexts in document order.
    pub fn contexts(&self) -> impl Iterator<Item = ContextView<'_>> {
        self.contexts.values().map(|bucket| ContextView { bucket })
    }

    /// A single context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<ContextView<'_>> {
        self.contexts.get(name).map(|bucket| ContextView { bucket })
    }

    /// Number of contexts.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Number of stored messages across all contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.values().map(|bucket| bucket.live).sum()
    }

    /// Whether no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Change the lifecycle status of a message.
    ///
    /// The active message with the identity is used when there is one,
    /// otherwise the most recently stored retired one. Returns the previous
    /// status. Setting the current status again is a no-op.
    ///
    /// # Errors
    /// Returns an error if the context or message does not exist, or if the
    /// lifecycle does not allow the change.
    pub fn set_status(
        &mut self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        next: Status,
    ) -> Result<Status> {
        let bucket = self
            .contexts
            .get_mut(context)
            .ok_or_else(|| Error::ContextNotFound(context.to_string()))?;
        let comment = comment.unwrap_or("");
        let slot = bucket
            .active_slot(source, comment)
            .or_else(|| bucket.retired_slots(source, comment).last().copied())
            .ok_or_else(|| Error::MessageNotFound {
                context: context.to_string(),
                source_text: source.to_string(),
            })?;
        let previous = bucket.transition(slot, next)?;
        if previous != next {
            tracing::debug!("{}::{:?}: {} -> {}", context, source, previous, next);
        }
        Ok(previous)
    }

    /// Replace the translated text of an active message.
    ///
    /// The status is left alone; use [`MessageStore::set_status`] to mark
    /// the result finished.
    ///
    /// # Errors
    /// Returns an error if no active message with the identity exists.
    pub fn set_translation(
        &mut self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        text: TranslationText,
    ) -> Result<()> {
        let bucket = self
            .contexts
            .get_mut(context)
            .ok_or_else(|| Error::ContextNotFound(context.to_string()))?;
        let comment = comment.unwrap_or("");

        let Some(slot) = bucket.active_slot(source, comment) else {
            let retired = bucket
                .retired_slots(source, comment)
                .last()
                .and_then(|&slot| bucket.message(slot));
            return Err(match retired {
                Some(message) => Error::NotAnActiveMessage {
                    context: context.to_string(),
                    source_text: source.to_string(),
                    status: message.status,
                },
                None => Error::MessageNotFound {
                    context: context.to_string(),
                    source_text: source.to_string(),
                },
            });
        };

        if let Some(message) = bucket.slots.get_mut(slot).and_then(Option::as_mut) {
            message.translation.text = text;
        }
        Ok(())
    }

    /// Retire active messages the extraction tool no longer reports.
    ///
    /// `still_present` is called with the context name and each active
    /// message. Finished messages it rejects become obsolete; unfinished
    /// ones become vanished.
    pub fn retire_absent<F>(&mut self, mut still_present: F) -> RetireSummary
    where
        F: FnMut(&str, &Message) -> bool,
    {
        let mut summary = RetireSummary::default();
        for (name, bucket) in &mut self.contexts {
            let gone: Vec<(usize, Status)> = bucket
                .slots
                .iter()
                .enumerate()
                .filter_map(|(slot, message)| {
                    let message = message.as_ref()?;
                    (message.status.is_active() && !still_present(name.as_str(), message))
                        .then_some((slot, message.status))
                })
                .collect();

            for (slot, status) in gone {
                let next = if status == Status::Finished {
                    Status::Obsolete
                } else {
                    Status::Vanished
                };
                if bucket.transition(slot, next).is_ok() {
                    match next {
                        Status::Obsolete => summary.obsoleted += 1,
                        _ => summary.vanished += 1,
                    }
                }
            }
        }
        if summary.obsoleted + summary.vanished > 0 {
            tracing::info!(
                "Retired {} obsolete and {} vanished messages",
                summary.obsoleted,
                summary.vanished
            );
        }
        summary
    }

    /// Drop all vanished messages. Returns how many were removed.
    pub fn remove_vanished(&mut self) -> usize {
        self.contexts
            .values_mut()
            .map(|bucket| bucket.remove_where(|m| m.status == Status::Vanished))
            .sum()
    }

    /// Drop all obsolete messages. Returns how many were removed.
    pub fn remove_obsolete(&mut self) -> usize {
        self.contexts
            .values_mut()
            .map(|bucket| bucket.remove_where(|m| m.status == Status::Obsolete))
            .sum()
    }

    /// Reclaim tombstoned slots and drop contexts left without messages.
    /// Returns the number of slots reclaimed.
    pub fn compact(&mut self) -> usize {
        let reclaimed: usize = self.contexts.values_mut().map(ContextBucket::compact).sum();
        self.contexts.retain(|_, bucket| bucket.live > 0);
        reclaimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with(messages: Vec<Message>) -> MessageStore {
        let mut store = MessageStore::new();
        for message in messages {
            store.insert("Main", message).unwrap();
        }
        store
    }

    #[test]
    fn test_insert_and_get() {
        let store = store_with(vec![
            Message::new("Open").translated("Öffnen"),
            Message::new("Open").with_comment("verb").translated("Aufmachen"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Main", "Open", None).unwrap().comment, None);
        assert_eq!(
            store.get("Main", "Open", Some("verb")).unwrap().comment.as_deref(),
            Some("verb")
        );
        assert!(store.get("Main", "Open", Some("noun")).is_none());
        assert!(store.get("Other", "Open", None).is_none());
    }

    #[test]
    fn test_empty_comment_is_no_comment() {
        let store = store_with(vec![Message::new("Open").with_comment("").translated("x")]);
        assert!(store.get("Main", "Open", None).is_some());
        assert!(store.get("Main", "Open", Some("")).is_some());
    }

    #[test]
    fn test_active_duplicate_rejected() {
        let mut store = store_with(vec![Message::new("Open")]);
        let err = store.insert("Main", Message::new("Open").translated("x")).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref d) if d.source_text == "Open"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_retired_duplicates_are_suggestions() {
        let mut store = MessageStore::new();
        let old = Message::new("Open").translated("alt").with_status(Status::Obsolete);
        assert_eq!(store.insert("Main", old).unwrap(), InsertOutcome::Added);
        assert_eq!(
            store.insert("Main", Message::new("Open").translated("neu")).unwrap(),
            InsertOutcome::Superseded
        );
        let older = Message::new("Open").translated("uralt").with_status(Status::Vanished);
        assert_eq!(
            store.insert("Main", older).unwrap(),
            InsertOutcome::RetainedDuplicate
        );

        let active = store.get("Main", "Open", None).unwrap();
        assert_eq!(active.status, Status::Finished);
        let suggestions = store.suggestions("Main", "Open", None);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].status, Status::Obsolete);
        assert_eq!(suggestions[1].status, Status::Vanished);
    }

    #[test]
    fn test_iter_context_keeps_document_order() {
        let store = store_with(vec![
            Message::new("c"),
            Message::new("a").with_status(Status::Obsolete),
            Message::new("b"),
        ]);
        let sources: Vec<_> = store.iter_context("Main").map(|m| m.source.as_str()).collect();
        assert_eq!(sources, vec!["c", "a", "b"]);
        assert_eq!(store.iter_context("Missing").count(), 0);
    }

    #[test]
    fn test_set_status_moves_between_indices() {
        let mut store = store_with(vec![Message::new("Save").translated("Speichern")]);
        let previous = store.set_status("Main", "Save", None, Status::Obsolete).unwrap();
        assert_eq!(previous, Status::Finished);
        assert!(store.get("Main", "Save", None).is_none());
        assert_eq!(store.suggestions("Main", "Save", None).len(), 1);

        // A new active message may now take the identity
        store.insert("Main", Message::new("Save")).unwrap();
        assert!(store.get("Main", "Save", None).is_some());
    }

    #[test]
    fn test_set_status_rejects_invalid_transition() {
        let mut store = store_with(vec![Message::new("Save").with_status(Status::Vanished)]);
        let err = store
            .set_status("Main", "Save", None, Status::Finished)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: Status::Vanished,
                to: Status::Finished
            }
        ));
        // Same status is a no-op
        assert_eq!(
            store.set_status("Main", "Save", None, Status::Vanished).unwrap(),
            Status::Vanished
        );
    }

    #[test]
    fn test_set_status_missing() {
        let mut store = store_with(vec![]);
        assert!(matches!(
            store.set_status("Main", "x", None, Status::Finished),
            Err(Error::ContextNotFound(_))
        ));
        store.insert("Main", Message::new("y")).unwrap();
        assert!(matches!(
            store.set_status("Main", "x", None, Status::Finished),
            Err(Error::MessageNotFound { .. })
        ));
    }

    #[test]
    fn test_set_translation() {
        let mut store = store_with(vec![
            Message::new("Quit"),
            Message::new("Old").translated("Alt").with_status(Status::Obsolete),
        ]);
        store
            .set_translation("Main", "Quit", None, TranslationText::Singular("Beenden".into()))
            .unwrap();
        store.set_status("Main", "Quit", None, Status::Finished).unwrap();
        let quit = store.get("Main", "Quit", None).unwrap();
        assert_eq!(quit.translation.text, TranslationText::Singular("Beenden".into()));
        assert_eq!(quit.status, Status::Finished);

        let err = store
            .set_translation("Main", "Old", None, TranslationText::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NotAnActiveMessage {
                status: Status::Obsolete,
                ..
            }
        ));
    }

    #[test]
    fn test_retire_absent() {
        let mut store = store_with(vec![
            Message::new("kept").translated("a"),
            Message::new("gone finished").translated("b"),
            Message::new("gone unfinished"),
            Message::new("already").translated("c").with_status(Status::Obsolete),
        ]);
        let summary = store.retire_absent(|_, m| m.source == "kept");
        assert_eq!(
            summary,
            RetireSummary {
                obsoleted: 1,
                vanished: 1
            }
        );
        let statuses: Vec<_> = store.iter_context("Main").map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![
                Status::Finished,
                Status::Obsolete,
                Status::Vanished,
                Status::Obsolete
            ]
        );
    }

    #[test]
    fn test_remove_and_compact() {
        let mut store = store_with(vec![
            Message::new("a").translated("1"),
            Message::new("b").with_status(Status::Vanished),
            Message::new("c").translated("3").with_status(Status::Obsolete),
        ]);
        store.insert("Dead", Message::new("d").with_status(Status::Vanished)).unwrap();

        assert_eq!(store.remove_vanished(), 2);
        assert_eq!(store.remove_obsolete(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.context_count(), 2);

        assert_eq!(store.compact(), 3);
        assert_eq!(store.context_count(), 1);
        assert!(store.get("Main", "a", None).is_some());
        assert!(store.suggestions("Main", "c", None).is_empty());
    }

    #[test]
    fn test_context_view() {
        let mut store = MessageStore::new();
        let mut info = ContextInfo::new("Dialog");
        info.comment = Some("settings dialog".into());
        assert!(store.insert_context(info));
        assert!(!store.insert_context(ContextInfo::new("Dialog")));
        store.insert("Dialog", Message::new("OK").translated("OK")).unwrap();
        store
            .insert("Dialog", Message::new("Apply").with_status(Status::Obsolete))
            .unwrap();

        let view = store.context("Dialog").unwrap();
        assert_eq!(view.name(), "Dialog");
        assert_eq!(view.info().comment.as_deref(), Some("settings dialog"));
        assert_eq!(view.len(), 2);
        assert_eq!(view.active_count(), 1);
        assert_eq!(view.to_context().messages.len(), 2);
    }
}
