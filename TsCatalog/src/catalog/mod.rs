//! In-memory catalog
//!
//! A [`Catalog`] is the header data of a `.ts` document (format version,
//! target and source language, unknown root attributes) plus a
//! [`MessageStore`] holding the contexts and messages.

mod store;

pub use store::{ContextView, InsertOutcome, MessageStore, RetireSummary};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::formats::ts::{
    Context, DEFAULT_VERSION, Message, RawAttribute, RetainedContent, Status,
};
use crate::lifecycle::{Issue, validate};
use crate::lookup::{LookupResult, Translator, TranslatorOptions};
use crate::plural::PluralRule;

/// A message catalog for one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// `version` attribute of the root element.
    pub version: String,
    /// Target locale, e.g. `cs_CZ`.
    pub language: Option<String>,
    /// Source locale, e.g. `en`.
    pub source_language: Option<String>,
    /// Root attributes the engine does not interpret.
    pub extra_attributes: Vec<RawAttribute>,
    /// Unknown root children and comments.
    pub retained: Vec<RetainedContent>,
    store: MessageStore,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            language: None,
            source_language: None,
            extra_attributes: Vec::new(),
            retained: Vec::new(),
            store: MessageStore::new(),
        }
    }
}

/// Message counts by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CatalogStats {
    /// Number of contexts.
    pub contexts: usize,
    /// Finished messages.
    pub finished: usize,
    /// Unfinished messages.
    pub unfinished: usize,
    /// Obsolete messages.
    pub obsolete: usize,
    /// Vanished messages.
    pub vanished: usize,
}

impl CatalogStats {
    /// Messages that lookups may serve.
    #[must_use]
    pub fn active(&self) -> usize {
        self.finished + self.unfinished
    }

    /// All stored messages.
    #[must_use]
    pub fn total(&self) -> usize {
        self.active() + self.obsolete + self.vanished
    }

    /// Share of active messages that are finished, in `0.0..=1.0`.
    /// A catalog without active messages counts as complete.
    #[must_use]
    pub fn completion(&self) -> f64 {
        match self.active() {
            0 => 1.0,
            active => self.finished as f64 / active as f64,
        }
    }

    fn count(&mut self, status: Status) {
        match status {
            Status::Finished => self.finished += 1,
            Status::Unfinished => self.unfinished += 1,
            Status::Obsolete => self.obsolete += 1,
            Status::Vanished => self.vanished += 1,
        }
    }
}

impl Catalog {
    /// Create an empty catalog for a target language
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::default()
        }
    }

    /// The message store.
    #[must_use]
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Mutable access to the message store.
    pub fn store_mut(&mut self) -> &mut MessageStore {
        &mut self.store
    }

    /// Insert a message into a context.
    ///
    /// # Errors
    /// Returns [`crate::Error::DuplicateKey`] if an active message with the
    /// same identity already exists.
    pub fn insert(&mut self, context: &str, message: Message) -> Result<InsertOutcome> {
        self.store.insert(context, message)
    }

    /// Plural rule for the target language.
    ///
    /// Catalogs without a language, or with one no rule is known for, use
    /// the two-form Germanic rule. Unknown languages are reported once when
    /// a catalog is read, not on every call.
    #[must_use]
    pub fn plural_rule(&self) -> PluralRule {
        self.language
            .as_deref()
            .and_then(PluralRule::lookup)
            .unwrap_or(PluralRule::Germanic)
    }

    /// A translator over this catalog with default options.
    #[must_use]
    pub fn translator(&self) -> Translator<'_> {
        Translator::new(self)
    }

    /// A translator over this catalog with explicit options.
    #[must_use]
    pub fn translator_with(&self, options: TranslatorOptions) -> Translator<'_> {
        Translator::with_options(self, options)
    }

    /// Look up a translation. See [`Translator::translate`].
    #[must_use]
    pub fn translate<'a>(
        &'a self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        quantity: Option<u64>,
    ) -> LookupResult<'a> {
        self.translator().translate(context, source, comment, quantity)
    }

    /// Lifecycle and consistency report. See [`crate::lifecycle::validate`].
    #[must_use]
    pub fn validate(&self) -> Vec<Issue> {
        validate(self)
    }

    /// Count messages by status.
    #[must_use]
    pub fn statistics(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            contexts: self.store.context_count(),
            ..CatalogStats::default()
        };
        for context in self.store.contexts() {
            for message in context.messages() {
                stats.count(message.status);
            }
        }
        stats
    }

    /// Owned copy of all contexts in document order.
    #[must_use]
    pub fn to_contexts(&self) -> Vec<Context> {
        self.store.contexts().map(|c| c.to_context()).collect()
    }

    /// Export header data and contexts as pretty-printed JSON.
    ///
    /// With `context` set, only that context is exported.
    ///
    /// # Errors
    /// Returns [`Error::ContextNotFound`] for an unknown context name, or a
    /// JSON error if serialization fails.
    pub fn to_json(&self, context: Option<&str>) -> Result<String> {
        let contexts = match context {
            Some(name) => {
                let view = self
                    .store
                    .context(name)
                    .ok_or_else(|| Error::ContextNotFound(name.to_string()))?;
                vec![view.to_context()]
            }
            None => self.to_contexts(),
        };
        let export = CatalogExport {
            version: &self.version,
            language: self.language.as_deref(),
            source_language: self.source_language.as_deref(),
            contexts,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }
}

#[derive(Serialize)]
struct CatalogExport<'a> {
    version: &'a str,
    language: Option<&'a str>,
    source_language: Option<&'a str>,
    contexts: Vec<Context>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::ts::parse_ts;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_statistics() {
        let mut catalog = Catalog::new("de");
        catalog.insert("A", Message::new("one").translated("eins")).unwrap();
        catalog.insert("A", Message::new("two")).unwrap();
        catalog
            .insert("B", Message::new("three").with_status(Status::Obsolete))
            .unwrap();
        catalog
            .insert("B", Message::new("four").with_status(Status::Vanished))
            .unwrap();

        let stats = catalog.statistics();
        assert_eq!(
            stats,
            CatalogStats {
                contexts: 2,
                finished: 1,
                unfinished: 1,
                obsolete: 1,
                vanished: 1,
            }
        );
        assert_eq!(stats.active(), 2);
        assert_eq!(stats.total(), 4);
        assert!((stats.completion() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_catalog_is_complete() {
        let catalog = Catalog::default();
        assert_eq!(catalog.version, DEFAULT_VERSION);
        assert!((catalog.statistics().completion() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_plural_rule_follows_language() {
        assert_eq!(Catalog::new("pl_PL").plural_rule(), PluralRule::Polish);
        assert_eq!(Catalog::default().plural_rule(), PluralRule::Germanic);
    }

    #[test]
    fn test_unknown_language_warns_once_per_read() {
        #[derive(Clone, Default)]
        struct CapturedLog(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for CapturedLog {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let catalog = parse_ts(
                br#"<TS version="2.1" language="xx_YY"><context><name>C</name>
<message><source>Open</source><translation>Ouvrir</translation></message>
</context></TS>"#,
            )
            .unwrap();
            for _ in 0..5 {
                assert_eq!(
                    catalog.translate("C", "Open", None, None),
                    LookupResult::Found("Ouvrir")
                );
            }
            assert!(catalog.validate().is_empty());
            assert_eq!(catalog.plural_rule(), PluralRule::Germanic);
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("Unknown locale 'xx_YY'").count(), 1);
    }

    #[test]
    fn test_to_json() {
        let mut catalog = Catalog::new("de");
        catalog.insert("A", Message::new("x").translated("y")).unwrap();
        catalog.insert("B", Message::new("z")).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&catalog.to_json(None).unwrap()).unwrap();
        assert_eq!(value["language"], "de");
        assert_eq!(value["contexts"].as_array().unwrap().len(), 2);

        let value: serde_json::Value =
            serde_json::from_str(&catalog.to_json(Some("B")).unwrap()).unwrap();
        assert_eq!(value["contexts"][0]["name"], "B");

        assert!(matches!(
            catalog.to_json(Some("Missing")),
            Err(Error::ContextNotFound(_))
        ));
    }

    #[test]
    fn test_to_contexts() {
        let mut catalog = Catalog::new("de");
        catalog.insert("A", Message::new("x")).unwrap();
        catalog.insert("B", Message::new("y")).unwrap();
        let names: Vec<_> = catalog
            .to_contexts()
            .into_iter()
            .map(|c| c.info.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
