//! Translation lookup
//!
//! Lookups only ever see active messages: obsolete and vanished entries are
//! not in the store's primary index. A [`Translator`] borrows the catalog
//! and caches its plural rule, so it is cheap to create and can be shared
//! between threads together with the catalog.
//!
//! ```
//! use tscatalog::{Catalog, LookupResult, Message};
//!
//! let mut catalog = Catalog::new("cs_CZ");
//! catalog.insert("Main", Message::new("Open").translated("Otevřít"))?;
//!
//! let translator = catalog.translator();
//! assert_eq!(translator.translate("Main", "Open", None, None), LookupResult::Found("Otevřít"));
//! assert_eq!(translator.translate("Main", "Quit", None, None), LookupResult::NotFound);
//! assert_eq!(translator.resolve("Main", "Quit", None, None), "Quit");
//! # Ok::<(), tscatalog::Error>(())
//! ```

use crate::catalog::Catalog;
use crate::formats::ts::{Message, Status, TranslationText};
use crate::plural::PluralRule;

/// Outcome of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult<'a> {
    /// Finished translation.
    Found(&'a str),
    /// Translation of an unfinished message.
    FoundPartial(&'a str),
    /// No active message, or its translation is empty.
    NotFound,
    /// The plural slot for the quantity is missing or empty.
    NotApplicablePlural {
        /// Nearest lower non-empty slot, if any.
        fallback: Option<&'a str>,
    },
}

impl<'a> LookupResult<'a> {
    /// Translated text, including unfinished text and plural fallbacks.
    #[must_use]
    pub fn text(&self) -> Option<&'a str> {
        match *self {
            Self::Found(text) | Self::FoundPartial(text) => Some(text),
            Self::NotApplicablePlural { fallback } => fallback,
            Self::NotFound => None,
        }
    }

    /// Whether a finished translation was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Translated text, or `source` when there is none.
    #[must_use]
    pub fn or_source<'s>(&self, source: &'s str) -> &'s str
    where
        'a: 's,
    {
        self.text().unwrap_or(source)
    }
}

/// Lookup options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Let [`Translator::resolve`] serve translations of unfinished messages.
    pub accept_unfinished: bool,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self {
            accept_unfinished: true,
        }
    }
}

/// Read-only lookup handle over a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    catalog: &'a Catalog,
    rule: PluralRule,
    options: TranslatorOptions,
}

impl<'a> Translator<'a> {
    /// Create a translator with default options
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_options(catalog, TranslatorOptions::default())
    }

    /// Create a translator with explicit options
    #[must_use]
    pub fn with_options(catalog: &'a Catalog, options: TranslatorOptions) -> Self {
        Self {
            catalog,
            rule: catalog.plural_rule(),
            options,
        }
    }

    /// Plural rule in use.
    #[must_use]
    pub fn plural_rule(&self) -> PluralRule {
        self.rule
    }

    /// Look up a translation.
    ///
    /// The exact (context, source, comment) identity is tried first. If a
    /// comment was given and did not match, the comment-less message is
    /// tried. For plural translations the quantity picks the slot; without
    /// a quantity slot 0 is used.
    #[must_use]
    pub fn translate(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        quantity: Option<u64>,
    ) -> LookupResult<'a> {
        let store = self.catalog.store();
        let message = store.get(context, source, comment).or_else(|| {
            comment
                .filter(|c| !c.is_empty())
                .and_then(|_| store.get(context, source, None))
        });
        match message {
            Some(message) => self.select(message, quantity),
            None => LookupResult::NotFound,
        }
    }

    /// Translated text, or the source text when nothing usable is found.
    ///
    /// Unfinished translations are served only when
    /// [`TranslatorOptions::accept_unfinished`] is set.
    #[must_use]
    pub fn resolve<'s>(
        &self,
        context: &str,
        source: &'s str,
        comment: Option<&str>,
        quantity: Option<u64>,
    ) -> &'s str
    where
        'a: 's,
    {
        match self.translate(context, source, comment, quantity) {
            LookupResult::Found(text) => text,
            LookupResult::FoundPartial(text) if self.options.accept_unfinished => text,
            LookupResult::NotApplicablePlural {
                fallback: Some(text),
            } => text,
            _ => source,
        }
    }

    fn select(&self, message: &'a Message, quantity: Option<u64>) -> LookupResult<'a> {
        if message.translation.text.is_empty() {
            return LookupResult::NotFound;
        }

        let text = match &message.translation.text {
            TranslationText::Singular(text) => text.as_str(),
            TranslationText::Plural(forms) => {
                let index = quantity.map_or(0, |n| self.rule.select(n));
                match forms.get(index).filter(|form| !form.text.is_empty()) {
                    Some(form) => form.text.as_str(),
                    None => {
                        let below = &forms[..index.min(forms.len())];
                        let fallback = below
                            .iter()
                            .rev()
                            .find(|form| !form.text.is_empty())
                            .map(|form| form.text.as_str());
                        return LookupResult::NotApplicablePlural { fallback };
                    }
                }
            }
        };

        match message.status {
            Status::Finished => LookupResult::Found(text),
            _ => LookupResult::FoundPartial(text),
        }
    }
}

/// Look up a translation in a catalog. See [`Translator::translate`].
#[must_use]
pub fn translate<'a>(
    catalog: &'a Catalog,
    context: &str,
    source: &str,
    comment: Option<&str>,
    quantity: Option<u64>,
) -> LookupResult<'a> {
    Translator::new(catalog).translate(context, source, comment, quantity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new("ru_RU");
        catalog
            .insert("Editor", Message::new("Open").translated("Открыть"))
            .unwrap();
        catalog
            .insert(
                "Editor",
                Message::new("Open").with_comment("file menu").translated("Открыть файл"),
            )
            .unwrap();
        catalog
            .insert(
                "Editor",
                Message::new("Foo").translated("Фу").with_status(Status::Obsolete),
            )
            .unwrap();
        catalog
            .insert(
                "Editor",
                Message::new("Bar").translated("Бар").with_status(Status::Vanished),
            )
            .unwrap();
        catalog
            .insert("Editor", Message::new("Draft").translated("Черновик").with_status(Status::Unfinished))
            .unwrap();
        catalog.insert("Editor", Message::new("Empty")).unwrap();
        catalog
            .insert(
                "Log",
                Message::new("%n lines filtered").translated_plural([
                    "%n строка отфильтрована",
                    "%n строки отфильтрованы",
                    "%n строк отфильтровано",
                ]),
            )
            .unwrap();
        catalog
            .insert("Log", Message::new("%n errors").translated_plural(["%n ошибка", "", ""]))
            .unwrap();
        catalog
    }

    #[test]
    fn test_exact_and_comment_fallback() {
        let catalog = catalog();
        let t = catalog.translator();
        assert_eq!(
            t.translate("Editor", "Open", Some("file menu"), None),
            LookupResult::Found("Открыть файл")
        );
        assert_eq!(
            t.translate("Editor", "Open", Some("toolbar"), None),
            LookupResult::Found("Открыть")
        );
        assert_eq!(t.translate("Editor", "Open", None, None), LookupResult::Found("Открыть"));
        assert_eq!(t.translate("Other", "Open", None, None), LookupResult::NotFound);
    }

    #[test]
    fn test_retired_messages_are_never_returned() {
        let catalog = catalog();
        assert_eq!(translate(&catalog, "Editor", "Foo", None, None), LookupResult::NotFound);
        assert_eq!(translate(&catalog, "Editor", "Bar", None, None), LookupResult::NotFound);
    }

    #[test]
    fn test_unfinished_and_empty() {
        let catalog = catalog();
        let t = catalog.translator();
        assert_eq!(
            t.translate("Editor", "Draft", None, None),
            LookupResult::FoundPartial("Черновик")
        );
        assert_eq!(t.translate("Editor", "Empty", None, None), LookupResult::NotFound);
        assert_eq!(t.resolve("Editor", "Draft", None, None), "Черновик");

        let strict = catalog.translator_with(TranslatorOptions {
            accept_unfinished: false,
        });
        assert_eq!(strict.resolve("Editor", "Draft", None, None), "Draft");
        assert_eq!(strict.resolve("Editor", "Empty", None, None), "Empty");
    }

    #[test]
    fn test_plural_slots() {
        let catalog = catalog();
        let t = catalog.translator();
        let text = |n| t.translate("Log", "%n lines filtered", None, Some(n)).text();
        assert_eq!(text(1), Some("%n строка отфильтрована"));
        assert_eq!(text(3), Some("%n строки отфильтрованы"));
        assert_eq!(text(11), Some("%n строк отфильтровано"));
        assert_eq!(
            t.translate("Log", "%n lines filtered", None, None),
            LookupResult::Found("%n строка отфильтрована")
        );
    }

    #[test]
    fn test_missing_plural_slot_falls_back_lower() {
        let catalog = catalog();
        let t = catalog.translator();
        assert_eq!(
            t.translate("Log", "%n errors", None, Some(5)),
            LookupResult::NotApplicablePlural {
                fallback: Some("%n ошибка")
            }
        );
        assert_eq!(t.resolve("Log", "%n errors", None, Some(5)), "%n ошибка");
        assert_eq!(
            t.translate("Log", "%n errors", None, Some(1)),
            LookupResult::Found("%n ошибка")
        );
    }

    #[test]
    fn test_plural_past_the_end() {
        let mut catalog = Catalog::new("ar");
        catalog
            .insert("C", Message::new("%n items").translated_plural(["zero", "one"]))
            .unwrap();
        assert_eq!(
            translate(&catalog, "C", "%n items", None, Some(50)),
            LookupResult::NotApplicablePlural {
                fallback: Some("one")
            }
        );
    }

    #[test]
    fn test_or_source() {
        assert_eq!(LookupResult::NotFound.or_source("Quit"), "Quit");
        assert_eq!(LookupResult::Found("Beenden").or_source("Quit"), "Beenden");
        assert!(!LookupResult::FoundPartial("x").is_found());
    }
}
