//! TS document structures
//!
//! Model types shared by the reader, the writer and the message store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not yet translated, or the translation needs review.
    Unfinished,
    /// Translated and approved.
    Finished,
    /// Source string disappeared upstream; kept for reuse.
    Obsolete,
    /// Source string permanently removed upstream; kept for audit.
    Vanished,
}

impl Status {
    /// Whether lookups may serve this message.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Unfinished | Self::Finished)
    }

    /// Get the lowercase name used in `type` attributes and reports
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unfinished => "unfinished",
            Self::Finished => "finished",
            Self::Obsolete => "obsolete",
            Self::Vanished => "vanished",
        }
    }

    /// Parse a status name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "unfinished" => Some(Self::Unfinished),
            "finished" => Some(Self::Finished),
            "obsolete" => Some(Self::Obsolete),
            "vanished" => Some(Self::Vanished),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An attribute kept verbatim because the engine does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAttribute {
    /// Attribute name.
    pub name: String,
    /// Unescaped attribute value.
    pub value: String,
}

impl RawAttribute {
    /// Creates a new raw attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A raw XML element subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueBlob {
    /// Element name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<RawAttribute>,
    /// Child content in document order.
    pub children: Vec<OpaqueContent>,
}

impl OpaqueBlob {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get the value of an attribute by name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether any child is an element.
    #[must_use]
    pub fn has_element_children(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c, OpaqueContent::Element(_)))
    }

    /// Drop whitespace-only text next to element children, recursively.
    /// The writer regenerates that indentation.
    pub(crate) fn strip_indentation(&mut self) {
        if self.has_element_children() {
            self.children
                .retain(|c| !matches!(c, OpaqueContent::Text(t) if t.trim().is_empty()));
        }
        for child in &mut self.children {
            if let OpaqueContent::Element(element) = child {
                element.strip_indentation();
            }
        }
    }
}

/// One piece of content inside an [`OpaqueBlob`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpaqueContent {
    /// Nested element.
    Element(OpaqueBlob),
    /// Unescaped character data.
    Text(String),
    /// `<![CDATA[...]]>` section.
    CData(String),
    /// `<!-- ... -->` comment.
    Comment(String),
}

/// Unknown content retained on a modeled entity.
///
/// `position` is the index among the owner's element and comment children
/// at parse time. The writer uses it to put the content back in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainedContent {
    /// Index among the owner's element/comment children.
    pub position: usize,
    /// The retained element or comment.
    pub content: OpaqueContent,
}

/// A `<location>` hint. Informational only; values are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// `filename` attribute. Absent means "same file as the previous location".
    pub filename: Option<String>,
    /// `line` attribute, possibly relative (`+3`).
    pub line: Option<String>,
    /// Attributes the engine does not interpret.
    pub extra_attributes: Vec<RawAttribute>,
}

/// A single `<numerusform>` slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NumerusForm {
    /// Translated text for this plural category.
    pub text: String,
    /// Attributes the engine does not interpret.
    pub extra_attributes: Vec<RawAttribute>,
}

impl NumerusForm {
    /// Creates a plural slot with the given text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra_attributes: Vec::new(),
        }
    }
}

/// Translated text of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationText {
    /// Direct text content.
    Singular(String),
    /// Ordered plural variants, one per plural category.
    Plural(Vec<NumerusForm>),
}

impl TranslationText {
    /// Build plural variants from plain strings.
    pub fn plural<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Plural(forms.into_iter().map(NumerusForm::new).collect())
    }

    /// True when no variant carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Singular(text) => text.is_empty(),
            Self::Plural(forms) => forms.iter().all(|f| f.text.is_empty()),
        }
    }

    /// Number of variants (1 for singular text).
    #[must_use]
    pub fn variant_count(&self) -> usize {
        match self {
            Self::Singular(_) => 1,
            Self::Plural(forms) => forms.len(),
        }
    }
}

impl Default for TranslationText {
    fn default() -> Self {
        Self::Singular(String::new())
    }
}

/// The `<translation>` element of a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Translation {
    /// Translated text or plural variants.
    pub text: TranslationText,
    /// `type` attribute exactly as read, if any.
    pub type_attribute: Option<String>,
    /// Attributes the engine does not interpret.
    pub extra_attributes: Vec<RawAttribute>,
    /// Unknown children and comments.
    pub retained: Vec<RetainedContent>,
}

impl Translation {
    /// Status implied by the `type` attribute and the text.
    ///
    /// `obsolete`/`vanished`/`unfinished` map directly. Without a `type`,
    /// non-empty text means finished and empty text means unfinished.
    /// Unrecognized `type` values are treated as unfinished.
    #[must_use]
    pub fn implied_status(&self) -> Status {
        match self.type_attribute.as_deref() {
            Some("obsolete") => Status::Obsolete,
            Some("vanished") => Status::Vanished,
            Some(_) => Status::Unfinished,
            None if self.text.is_empty() => Status::Unfinished,
            None => Status::Finished,
        }
    }
}

/// The (source, comment) part of a message's identity.
///
/// An empty comment and no comment are the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageKey {
    /// Source text.
    pub source: String,
    /// Disambiguation comment.
    pub comment: Option<String>,
}

impl MessageKey {
    /// Creates a key, normalizing an empty comment to `None`.
    #[must_use]
    pub fn new(source: impl Into<String>, comment: Option<&str>) -> Self {
        Self {
            source: source.into(),
            comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.source)?;
        if let Some(comment) = &self.comment {
            write!(f, " [{comment}]")?;
        }
        Ok(())
    }
}

/// A translatable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// `id` attribute (text-id based catalogs).
    pub id: Option<String>,
    /// `numerus="yes"`: the source takes a quantity.
    pub numerus: bool,
    /// Lifecycle state.
    pub status: Status,
    /// Source text. Part of the identity.
    pub source: String,
    /// Previous source text kept by the extraction tool.
    pub old_source: Option<String>,
    /// Disambiguation comment. Part of the identity.
    pub comment: Option<String>,
    /// Previous disambiguation comment.
    pub old_comment: Option<String>,
    /// Developer note for translators. Not part of the identity.
    pub extra_comment: Option<String>,
    /// Translator's own note.
    pub translator_comment: Option<String>,
    /// Source locations.
    pub locations: Vec<Location>,
    /// The translation.
    pub translation: Translation,
    /// Attributes the engine does not interpret.
    pub extra_attributes: Vec<RawAttribute>,
    /// Unknown children such as `<userdata>` or `<extra-*>`.
    pub retained: Vec<RetainedContent>,
}

impl Message {
    /// Creates an unfinished message with an empty translation.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let translation = Translation {
            type_attribute: Some(Status::Unfinished.as_str().to_string()),
            ..Translation::default()
        };
        Self {
            id: None,
            numerus: false,
            status: Status::Unfinished,
            source: source.into(),
            old_source: None,
            comment: None,
            old_comment: None,
            extra_comment: None,
            translator_comment: None,
            locations: Vec::new(),
            translation,
            extra_attributes: Vec::new(),
            retained: Vec::new(),
        }
    }

    /// Set the disambiguation comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set singular translated text and mark the message finished.
    #[must_use]
    pub fn translated(mut self, text: impl Into<String>) -> Self {
        self.translation.text = TranslationText::Singular(text.into());
        self.status = Status::Finished;
        self.translation.type_attribute = None;
        self
    }

    /// Set plural variants, mark the message numerus and finished.
    #[must_use]
    pub fn translated_plural<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numerus = true;
        self.translation.text = TranslationText::plural(forms);
        self.status = Status::Finished;
        self.translation.type_attribute = None;
        self
    }

    /// Set the status without lifecycle checks (for building new messages).
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self.translation.type_attribute = match status {
            Status::Finished => None,
            other => Some(other.as_str().to_string()),
        };
        self
    }

    /// Disambiguation comment as used in the identity ("" for none).
    #[must_use]
    pub fn comment_key(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// Identity of this message within its context.
    #[must_use]
    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.source.clone(), self.comment.as_deref())
    }
}

/// Context-level data other than the messages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextInfo {
    /// Context name. Unique within a catalog.
    pub name: String,
    /// Context-level `<comment>`.
    pub comment: Option<String>,
    /// Attributes the engine does not interpret (e.g. `encoding`).
    pub extra_attributes: Vec<RawAttribute>,
    /// Unknown children and comments.
    pub retained: Vec<RetainedContent>,
}

impl ContextInfo {
    /// Creates context data with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A context together with its messages in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Name and context-level data.
    #[serde(flatten)]
    pub info: ContextInfo,
    /// Messages in document order.
    pub messages: Vec<Message>,
}

/// A structural node of a catalog document.
///
/// The reader turns every child element into one of these, so element
/// dispatch is exhaustive and anything unrecognized stays as raw XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogNode {
    /// `<context>`
    Context(Context),
    /// `<message>`
    Message(Box<Message>),
    /// `<translation>`
    Translation(Translation),
    /// Any other element.
    Unknown(OpaqueBlob),
}
