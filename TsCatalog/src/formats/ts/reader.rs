//! TS file reading
//!
//! Parsing happens in two passes. The quick-xml event loop first builds a
//! raw element tree ([`OpaqueBlob`]). The tree is then walked top-down and
//! every child element is classified as a [`CatalogNode`]. Elements the
//! engine does not model stay raw and are retained on their owner.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::TS_ROOT;
use super::document::{
    CatalogNode, Context, ContextInfo, Location, Message, NumerusForm, OpaqueBlob,
    OpaqueContent, RawAttribute, RetainedContent, Translation, TranslationText,
};
use crate::catalog::{Catalog, InsertOutcome};
use crate::error::{Error, ParseError, Result};
use crate::lifecycle::{Issue, IssueKind, Severity, numerus_issue};
use crate::plural::PluralRule;

type ParseResult<T> = std::result::Result<T, ParseError>;

/// A parsed catalog together with the problems recovered while reading it.
#[derive(Debug, Clone)]
pub struct ParsedCatalog {
    /// The catalog.
    pub catalog: Catalog,
    /// Non-fatal problems found while parsing (merged contexts, retired
    /// duplicates, plural slot mismatches).
    pub issues: Vec<Issue>,
}

/// Read a .ts catalog from disk
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn read_ts<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    Ok(read_ts_with_issues(path)?.catalog)
}

/// Read a .ts catalog from disk, keeping the recovered issues
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid catalog.
pub fn read_ts_with_issues<P: AsRef<Path>>(path: P) -> Result<ParsedCatalog> {
    let path = path.as_ref();
    tracing::info!("Reading TS catalog: {:?}", path);
    let data = fs::read(path)?;
    let parsed = parse_ts_with_issues(&data)?;
    tracing::info!(
        "Loaded {} messages in {} contexts ({} issues)",
        parsed.catalog.store().len(),
        parsed.catalog.store().context_count(),
        parsed.issues.len()
    );
    Ok(parsed)
}

/// Parse a .ts catalog from bytes
///
/// Recovered issues are logged as warnings and dropped. Use
/// [`parse_ts_with_issues`] to keep them.
///
/// # Errors
/// Returns [`ParseError::Malformed`] for XML or structure violations,
/// [`ParseError::UnknownRoot`] if the root is not `<TS>`, and
/// [`ParseError::DuplicateKey`] if two active messages share an identity.
pub fn parse_ts(data: &[u8]) -> ParseResult<Catalog> {
    let parsed = parse_ts_with_issues(data)?;
    for issue in &parsed.issues {
        tracing::warn!("{issue}");
    }
    Ok(parsed.catalog)
}

/// Parse a .ts catalog from bytes, keeping the recovered issues
///
/// # Errors
/// Same as [`parse_ts`].
pub fn parse_ts_with_issues(data: &[u8]) -> ParseResult<ParsedCatalog> {
    let content = decode_utf8(data)?;
    let root = read_tree(content)?;
    if root.name != TS_ROOT {
        return Err(ParseError::UnknownRoot { found: root.name });
    }
    CatalogBuilder::default().build(root)
}

fn decode_utf8(data: &[u8]) -> ParseResult<&str> {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    std::str::from_utf8(data).map_err(|e| {
        ParseError::malformed(format!("invalid UTF-8 at byte {}", e.valid_up_to()))
    })
}

// ============================================================================
// Pass 1: XML events to a raw element tree
// ============================================================================

fn read_tree(content: &str) -> ParseResult<OpaqueBlob> {
    let mut reader = Reader::from_str(content);
    // Leading/trailing whitespace is significant in source and translation text
    reader.trim_text(false);

    let mut buf = Vec::new();
    let mut tree = TreeBuilder::default();

    loop {
        let position = reader.buffer_position();
        let step = match reader.read_event_into(&mut buf) {
            Ok(event) => tree.push(event),
            Err(e) => Err(ParseError::from(e)),
        };
        match step {
            Ok(true) => break,
            Ok(false) => {}
            Err(ParseError::Malformed(message)) => {
                return Err(ParseError::malformed(format!("at byte {position}: {message}")));
            }
            Err(other) => return Err(other),
        }
        buf.clear();
    }

    tree.finish()
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<OpaqueBlob>,
    root: Option<OpaqueBlob>,
}

impl TreeBuilder {
    /// Feed one event. Returns `true` at end of input.
    fn push(&mut self, event: Event<'_>) -> ParseResult<bool> {
        match event {
            Event::Start(e) => {
                let blob = start_blob(&e)?;
                if self.stack.is_empty() && self.root.is_some() {
                    return Err(ParseError::malformed(format!(
                        "second root element <{}>",
                        blob.name
                    )));
                }
                self.stack.push(blob);
            }
            Event::Empty(e) => {
                let blob = start_blob(&e)?;
                self.attach(blob)?;
            }
            Event::End(e) => {
                let blob = self.stack.pop().ok_or_else(|| {
                    ParseError::malformed(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                self.attach(blob)?;
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                self.push_content(OpaqueContent::Text(text.into_owned()))?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                self.push_content(OpaqueContent::CData(text))?;
            }
            Event::Comment(e) => {
                // Comments outside the root element are not kept
                if let Some(parent) = self.stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.children.push(OpaqueContent::Comment(text));
                }
            }
            Event::Eof => return Ok(true),
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        Ok(false)
    }

    fn push_content(&mut self, content: OpaqueContent) -> ParseResult<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(content);
            return Ok(());
        }
        match content {
            OpaqueContent::Text(text) if text.trim().is_empty() => Ok(()),
            _ => Err(ParseError::malformed("character data outside the root element")),
        }
    }

    fn attach(&mut self, blob: OpaqueBlob) -> ParseResult<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(OpaqueContent::Element(blob));
        } else if self.root.is_none() {
            self.root = Some(blob);
        } else {
            return Err(ParseError::malformed(format!(
                "second root element <{}>",
                blob.name
            )));
        }
        Ok(())
    }

    fn finish(self) -> ParseResult<OpaqueBlob> {
        if let Some(open) = self.stack.last() {
            return Err(ParseError::malformed(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }
        self.root
            .ok_or_else(|| ParseError::malformed("document has no root element"))
    }
}

fn start_blob(e: &BytesStart<'_>) -> ParseResult<OpaqueBlob> {
    let mut blob = OpaqueBlob::new(String::from_utf8_lossy(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr?;
        blob.attributes.push(RawAttribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(blob)
}

// ============================================================================
// Pass 2: raw tree to catalog model
// ============================================================================

#[derive(Default)]
struct CatalogBuilder {
    issues: Vec<Issue>,
}

impl CatalogBuilder {
    fn build(mut self, root: OpaqueBlob) -> ParseResult<ParsedCatalog> {
        let mut catalog = Catalog::default();
        for attr in root.attributes {
            match attr.name.as_str() {
                "version" => catalog.version = attr.value,
                "language" => catalog.language = Some(attr.value),
                "sourcelanguage" => catalog.source_language = Some(attr.value),
                _ => catalog.extra_attributes.push(attr),
            }
        }
        // Reports an unknown target language once per read
        let rule = PluralRule::for_locale(catalog.language.as_deref().unwrap_or(""));

        // Merged contexts are written once, so later root children move up
        let mut merged = 0;
        for (position, child) in structural_children(&root.name, root.children)?
            .into_iter()
            .enumerate()
        {
            let position = position - merged;
            let element = match child {
                OpaqueContent::Element(element) => element,
                other => {
                    catalog.retained.push(RetainedContent { position, content: other });
                    continue;
                }
            };
            if element.name == "context" {
                let node = read_context(element)?;
                if self.add_context(&mut catalog, node, rule)? {
                    merged += 1;
                }
                continue;
            }
            match read_node(element)? {
                CatalogNode::Context(_) => {
                    return Err(ParseError::malformed("unexpected <context>"));
                }
                CatalogNode::Unknown(blob) => catalog.retained.push(RetainedContent {
                    position,
                    content: OpaqueContent::Element(blob),
                }),
                CatalogNode::Message(_) => {
                    return Err(ParseError::malformed("<message> outside <context>"));
                }
                CatalogNode::Translation(_) => {
                    return Err(ParseError::malformed("<translation> outside <message>"));
                }
            }
        }

        Ok(ParsedCatalog {
            catalog,
            issues: self.issues,
        })
    }

    /// Add a context to the catalog. Returns `true` if it was merged into an
    /// earlier declaration of the same name.
    fn add_context(
        &mut self,
        catalog: &mut Catalog,
        node: ContextNode,
        rule: PluralRule,
    ) -> ParseResult<bool> {
        let ContextNode {
            context: Context { info, messages },
            name_position,
            comment_position,
        } = node;
        let name = info.name.clone();
        let store = catalog.store_mut();

        let merged = match store.context(&name).map(|view| view.len()) {
            None => {
                store.insert_context(info);
                false
            }
            Some(message_count) => {
                tracing::debug!("Merging repeated context '{}'", name);
                let mut description = String::from(
                    "context declared more than once; merged into the first declaration",
                );
                if let Some(first) = store.context_info_mut(&name) {
                    let later = LaterDeclaration {
                        info,
                        name_position,
                        comment_position,
                    };
                    let conflicts = merge_context_info(first, message_count, later);
                    if !conflicts.is_empty() {
                        description.push_str("; kept first value of ");
                        description.push_str(&conflicts.join(", "));
                    }
                }
                self.issues.push(Issue::new(
                    Severity::Warning,
                    IssueKind::ContextMerged,
                    &name,
                    None,
                    description,
                ));
                true
            }
        };

        for message in messages {
            if let Some(issue) = numerus_issue(rule, &name, &message) {
                self.issues.push(issue);
            }
            let key = message.key();
            match catalog.store_mut().insert(&name, message) {
                Ok(InsertOutcome::RetainedDuplicate) => {
                    tracing::debug!("Retired duplicate of {} in '{}'", key, name);
                    self.issues.push(Issue::new(
                        Severity::Info,
                        IssueKind::DuplicateKey,
                        &name,
                        Some(key),
                        "retired message shares its identity with another message; kept as a suggestion",
                    ));
                }
                Ok(InsertOutcome::Added | InsertOutcome::Superseded) => {}
                Err(Error::DuplicateKey(duplicate)) => return Err(duplicate.into()),
                Err(other) => return Err(ParseError::malformed(other.to_string())),
            }
        }
        Ok(merged)
    }
}

/// A `<context>` plus the child positions of its `<name>` and `<comment>`.
struct ContextNode {
    context: Context,
    name_position: usize,
    comment_position: Option<usize>,
}

/// Header data of a repeated `<context>` declaration.
struct LaterDeclaration {
    info: ContextInfo,
    name_position: usize,
    comment_position: Option<usize>,
}

/// Fold a repeated context declaration into the first one.
///
/// The later declaration's children are placed after everything the first
/// one holds so far, which is where the writer puts its messages. Returns
/// the names of attributes whose values disagree; the first value is kept.
fn merge_context_info(
    first: &mut ContextInfo,
    message_count: usize,
    later: LaterDeclaration,
) -> Vec<String> {
    let mut conflicts = Vec::new();
    for attr in later.info.extra_attributes {
        let existing = first
            .extra_attributes
            .iter()
            .find(|a| a.name == attr.name)
            .map(|a| a.value == attr.value);
        match existing {
            Some(true) => {}
            Some(false) => conflicts.push(attr.name),
            None => first.extra_attributes.push(attr),
        }
    }

    let mut dropped = vec![later.name_position];
    let mut retained = later.info.retained;
    if let (Some(comment), Some(position)) = (later.info.comment, later.comment_position) {
        match first.comment.as_ref().map(|existing| *existing == comment) {
            None => {
                let slot = comment_slot(&first.retained);
                for item in &mut first.retained {
                    if item.position >= slot {
                        item.position += 1;
                    }
                }
                first.comment = Some(comment);
                dropped.push(position);
            }
            Some(true) => dropped.push(position),
            Some(false) => {
                let mut element = OpaqueBlob::new("comment");
                if !comment.is_empty() {
                    element.children.push(OpaqueContent::Text(comment));
                }
                retained.push(RetainedContent {
                    position,
                    content: OpaqueContent::Element(element),
                });
                retained.sort_by_key(|item| item.position);
            }
        }
    }

    let offset =
        1 + usize::from(first.comment.is_some()) + message_count + first.retained.len();
    for mut item in retained {
        let skipped = dropped.iter().filter(|&&p| p < item.position).count();
        item.position = offset + item.position - skipped;
        first.retained.push(item);
    }
    conflicts
}

/// Child position the writer gives a context comment added after parsing.
fn comment_slot(retained: &[RetainedContent]) -> usize {
    let mut positions = retained.iter().map(|item| item.position).peekable();
    let mut written = 0;
    // `<name>`, then the comment
    for _ in 0..2 {
        while positions.next_if(|&p| p <= written).is_some() {
            written += 1;
        }
        written += 1;
    }
    written - 1
}

/// Retained children of one element.
///
/// Comments inside leaf text elements are moved out and kept just before
/// their element. Later positions shift to match the written document.
#[derive(Default)]
struct RetainedList {
    items: Vec<RetainedContent>,
    shift: usize,
}

impl RetainedList {
    /// Position of a child once earlier moved comments are counted.
    fn at(&self, position: usize) -> usize {
        position + self.shift
    }

    fn keep(&mut self, position: usize, content: OpaqueContent) {
        let position = self.at(position);
        self.items.push(RetainedContent { position, content });
    }

    /// Text of the leaf element at `position`.
    fn text_of(&mut self, position: usize, blob: &OpaqueBlob) -> ParseResult<String> {
        let (text, comments) = leaf_text(blob)?;
        for comment in comments {
            tracing::debug!("Moving comment out of <{}>", blob.name);
            self.keep(position, OpaqueContent::Comment(comment));
            self.shift += 1;
        }
        Ok(text)
    }

    fn into_inner(self) -> Vec<RetainedContent> {
        self.items
    }
}

/// Classify an element as a structural catalog node.
fn read_node(blob: OpaqueBlob) -> ParseResult<CatalogNode> {
    match blob.name.as_str() {
        "context" => read_context(blob).map(|node| CatalogNode::Context(node.context)),
        "message" => read_message(blob).map(|m| CatalogNode::Message(Box::new(m))),
        "translation" => read_translation(blob).map(CatalogNode::Translation),
        _ => {
            let mut blob = blob;
            blob.strip_indentation();
            Ok(CatalogNode::Unknown(blob))
        }
    }
}

fn read_context(blob: OpaqueBlob) -> ParseResult<ContextNode> {
    let mut info = ContextInfo {
        extra_attributes: blob.attributes,
        ..ContextInfo::default()
    };
    let mut retained = RetainedList::default();
    let mut name = None;
    let mut name_position = 0;
    let mut comment_position = None;
    let mut messages = Vec::new();

    for (position, child) in structural_children(&blob.name, blob.children)?
        .into_iter()
        .enumerate()
    {
        let element = match child {
            OpaqueContent::Element(element) => element,
            other => {
                retained.keep(position, other);
                continue;
            }
        };
        match element.name.as_str() {
            "name" if name.is_none() => {
                name = Some(retained.text_of(position, &element)?);
                name_position = retained.at(position);
            }
            "comment" if info.comment.is_none() => {
                info.comment = Some(retained.text_of(position, &element)?);
                comment_position = Some(retained.at(position));
            }
            _ => match read_node(element)? {
                CatalogNode::Message(message) => messages.push(*message),
                CatalogNode::Unknown(unknown) => {
                    retained.keep(position, OpaqueContent::Element(unknown));
                }
                CatalogNode::Context(_) => {
                    return Err(ParseError::malformed("nested <context>"));
                }
                CatalogNode::Translation(_) => {
                    return Err(ParseError::malformed("<translation> outside <message>"));
                }
            },
        }
    }

    info.name = name.ok_or_else(|| ParseError::malformed("<context> without <name>"))?;
    info.retained = retained.into_inner();
    Ok(ContextNode {
        context: Context { info, messages },
        name_position,
        comment_position,
    })
}

fn read_message(blob: OpaqueBlob) -> ParseResult<Message> {
    let mut message = Message::new(String::new());
    for attr in blob.attributes {
        match attr.name.as_str() {
            "id" => message.id = Some(attr.value),
            "numerus" if attr.value == "yes" => message.numerus = true,
            _ => message.extra_attributes.push(attr),
        }
    }

    let mut retained = RetainedList::default();
    let mut source = None;
    let mut translation = None;

    for (position, child) in structural_children(&blob.name, blob.children)?
        .into_iter()
        .enumerate()
    {
        let element = match child {
            OpaqueContent::Element(element) => element,
            other => {
                retained.keep(position, other);
                continue;
            }
        };
        match element.name.as_str() {
            "location" => message.locations.push(read_location(element)),
            "source" if source.is_none() => source = Some(retained.text_of(position, &element)?),
            "oldsource" if message.old_source.is_none() => {
                message.old_source = Some(retained.text_of(position, &element)?);
            }
            "comment" if message.comment.is_none() => {
                message.comment = Some(retained.text_of(position, &element)?);
            }
            "oldcomment" if message.old_comment.is_none() => {
                message.old_comment = Some(retained.text_of(position, &element)?);
            }
            "extracomment" if message.extra_comment.is_none() => {
                message.extra_comment = Some(retained.text_of(position, &element)?);
            }
            "translatorcomment" if message.translator_comment.is_none() => {
                message.translator_comment = Some(retained.text_of(position, &element)?);
            }
            _ => match read_node(element)? {
                CatalogNode::Translation(parsed) => {
                    if translation.replace(parsed).is_some() {
                        return Err(ParseError::malformed(
                            "<message> with more than one <translation>",
                        ));
                    }
                }
                CatalogNode::Unknown(unknown) => {
                    retained.keep(position, OpaqueContent::Element(unknown));
                }
                CatalogNode::Context(_) | CatalogNode::Message(_) => {
                    return Err(ParseError::malformed("<message> nested inside <message>"));
                }
            },
        }
    }

    message.source = source.ok_or_else(|| ParseError::malformed("<message> without <source>"))?;
    message.retained = retained.into_inner();
    let translation = translation.ok_or_else(|| {
        ParseError::malformed(format!(
            "message {:?} has no <translation>",
            message.source
        ))
    })?;
    message.status = translation.implied_status();
    message.translation = translation;
    Ok(message)
}

fn read_location(blob: OpaqueBlob) -> Location {
    let mut location = Location::default();
    for attr in blob.attributes {
        match attr.name.as_str() {
            "filename" => location.filename = Some(attr.value),
            "line" => location.line = Some(attr.value),
            _ => location.extra_attributes.push(attr),
        }
    }
    location
}

fn read_translation(blob: OpaqueBlob) -> ParseResult<Translation> {
    let mut translation = Translation::default();
    for attr in blob.attributes {
        match attr.name.as_str() {
            "type" => translation.type_attribute = Some(attr.value),
            _ => translation.extra_attributes.push(attr),
        }
    }

    let mut retained = RetainedList::default();
    let mut direct = String::new();
    let mut forms = Vec::new();
    let mut has_structure = false;
    let mut position = 0;

    for child in blob.children {
        match child {
            OpaqueContent::Text(text) | OpaqueContent::CData(text) => direct.push_str(&text),
            OpaqueContent::Element(element) if element.name == "byte" => {
                direct.push(decode_byte(&element)?);
            }
            OpaqueContent::Element(element) if element.name == "numerusform" => {
                let text = retained.text_of(position, &element)?;
                forms.push(NumerusForm {
                    text,
                    extra_attributes: element.attributes,
                });
                has_structure = true;
                position += 1;
            }
            mut other => {
                if let OpaqueContent::Element(element) = &mut other {
                    element.strip_indentation();
                }
                has_structure = true;
                retained.keep(position, other);
                position += 1;
            }
        }
    }
    translation.retained = retained.into_inner();

    // Whitespace between child elements or comments is indentation, not text
    if has_structure && direct.trim().is_empty() {
        direct.clear();
    }

    translation.text = if forms.is_empty() {
        TranslationText::Singular(direct)
    } else if direct.is_empty() {
        TranslationText::Plural(forms)
    } else {
        return Err(ParseError::malformed(
            "<translation> mixes direct text and <numerusform>",
        ));
    };
    Ok(translation)
}

/// Element and comment children of a structural element.
///
/// Whitespace between them is dropped. Other character data is an error.
fn structural_children(
    owner: &str,
    children: Vec<OpaqueContent>,
) -> ParseResult<Vec<OpaqueContent>> {
    let mut structural = Vec::with_capacity(children.len());
    for child in children {
        match child {
            OpaqueContent::Text(text) if text.trim().is_empty() => {}
            OpaqueContent::Text(_) | OpaqueContent::CData(_) => {
                return Err(ParseError::malformed(format!(
                    "unexpected character data inside <{owner}>"
                )));
            }
            other => structural.push(other),
        }
    }
    Ok(structural)
}

/// Text content of a leaf element, decoding `<byte value="..."/>` escapes.
///
/// XML comments inside the element are returned separately.
fn leaf_text(blob: &OpaqueBlob) -> ParseResult<(String, Vec<String>)> {
    let mut text = String::new();
    let mut comments = Vec::new();
    for child in &blob.children {
        match child {
            OpaqueContent::Text(part) | OpaqueContent::CData(part) => text.push_str(part),
            OpaqueContent::Element(element) if element.name == "byte" => {
                text.push(decode_byte(element)?);
            }
            OpaqueContent::Element(element) => {
                return Err(ParseError::malformed(format!(
                    "unexpected <{}> inside <{}>",
                    element.name, blob.name
                )));
            }
            OpaqueContent::Comment(comment) => comments.push(comment.clone()),
        }
    }
    Ok((text, comments))
}

/// Decode `<byte value="x1b"/>` (hex) or `<byte value="27"/>` (decimal).
fn decode_byte(blob: &OpaqueBlob) -> ParseResult<char> {
    let value = blob
        .attribute("value")
        .ok_or_else(|| ParseError::malformed("<byte> without value attribute"))?;
    let code = match value.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };
    code.ok()
        .and_then(char::from_u32)
        .ok_or_else(|| ParseError::malformed(format!("invalid <byte> value {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::ts::Status;
    use pretty_assertions::assert_eq;

    fn parse(xml: &str) -> Catalog {
        parse_ts(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_statuses() {
        let catalog = parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="cs_CZ">
<context>
    <name>Editor</name>
    <message>
        <source>Open</source>
        <translation>Otevřít</translation>
    </message>
    <message>
        <source>Close</source>
        <translation type="unfinished"></translation>
    </message>
    <message>
        <source>Save</source>
        <translation></translation>
    </message>
    <message>
        <source>Foo</source>
        <translation type="obsolete">X</translation>
    </message>
    <message>
        <source>Bar</source>
        <translation type="vanished">Y</translation>
    </message>
</context>
</TS>
"#,
        );

        let statuses: Vec<_> = catalog
            .store()
            .iter_context("Editor")
            .map(|m| (m.source.as_str(), m.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("Open", Status::Finished),
                ("Close", Status::Unfinished),
                ("Save", Status::Unfinished),
                ("Foo", Status::Obsolete),
                ("Bar", Status::Vanished),
            ]
        );
        assert_eq!(catalog.language.as_deref(), Some("cs_CZ"));
        assert_eq!(catalog.version, "2.1");
    }

    #[test]
    fn test_parse_numerus_forms() {
        let catalog = parse(
            r#"<TS version="2.1" language="ru_RU"><context><name>Log</name>
<message numerus="yes">
    <source>%n lines filtered</source>
    <translation>
        <numerusform>one</numerusform>
        <numerusform>few</numerusform>
        <numerusform>many</numerusform>
    </translation>
</message>
</context></TS>"#,
        );
        let message = catalog.store().get("Log", "%n lines filtered", None).unwrap();
        assert!(message.numerus);
        assert_eq!(message.status, Status::Finished);
        assert_eq!(
            message.translation.text,
            TranslationText::plural(["one", "few", "many"])
        );
    }

    #[test]
    fn test_parse_byte_escape() {
        let catalog = parse(
            r#"<TS version="2.1"><context><name>C</name><message>
<source>Bell<byte value="x7"/>!</source>
<translation>Zvonek<byte value="7"/>!</translation>
</message></context></TS>"#,
        );
        let message = catalog.store().get("C", "Bell\u{7}!", None).unwrap();
        assert_eq!(
            message.translation.text,
            TranslationText::Singular("Zvonek\u{7}!".to_string())
        );
    }

    #[test]
    fn test_parse_keeps_unknown_attributes_and_elements() {
        let catalog = parse(
            r#"<TS version="2.1" language="de" future="1"><context encoding="UTF-8"><name>C</name>
<message hint="x">
    <source>A</source>
    <translation variants="no">B</translation>
    <extra-po-flags>c-format</extra-po-flags>
</message>
</context></TS>"#,
        );
        assert_eq!(catalog.extra_attributes, vec![RawAttribute::new("future", "1")]);
        let context = catalog.store().context("C").unwrap();
        assert_eq!(
            context.info().extra_attributes,
            vec![RawAttribute::new("encoding", "UTF-8")]
        );
        let message = catalog.store().get("C", "A", None).unwrap();
        assert_eq!(message.extra_attributes, vec![RawAttribute::new("hint", "x")]);
        assert_eq!(
            message.translation.extra_attributes,
            vec![RawAttribute::new("variants", "no")]
        );
        assert_eq!(message.retained.len(), 1);
        assert_eq!(message.retained[0].position, 2);
    }

    #[test]
    fn test_unknown_root() {
        let err = parse_ts(b"<xliff version=\"1.2\"></xliff>").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownRoot {
                found: "xliff".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_ts(b"<TS><context><name>C</name></TS>").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));

        let err = parse_ts(b"<TS><context><name>C</name>").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_missing_translation_is_malformed() {
        let err = parse_ts(b"<TS><context><name>C</name><message><source>A</source></message></context></TS>")
            .unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_message_outside_context_is_malformed() {
        let err = parse_ts(b"<TS><message><source>A</source><translation/></message></TS>")
            .unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_active_duplicate_is_fatal() {
        let err = parse_ts(
            br#"<TS><context><name>C</name>
<message><source>A</source><translation>1</translation></message>
<message><source>A</source><translation>2</translation></message>
</context></TS>"#,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::DuplicateKey(ref d) if d.source_text == "A"));
    }

    #[test]
    fn test_comment_disambiguates() {
        let catalog = parse(
            r#"<TS><context><name>C</name>
<message><source>Open</source><comment>menu</comment><translation>1</translation></message>
<message><source>Open</source><comment>button</comment><translation>2</translation></message>
</context></TS>"#,
        );
        assert_eq!(catalog.store().len(), 2);
    }

    #[test]
    fn test_retired_duplicate_is_recovered() {
        let parsed = parse_ts_with_issues(
            br#"<TS><context><name>C</name>
<message><source>A</source><translation type="obsolete">old</translation></message>
<message><source>A</source><translation>new</translation></message>
<message><source>A</source><translation type="vanished">older</translation></message>
</context></TS>"#,
        )
        .unwrap();
        assert_eq!(parsed.catalog.store().len(), 3);
        assert_eq!(parsed.issues.len(), 1);
        assert_eq!(parsed.issues[0].kind, IssueKind::DuplicateKey);
    }

    #[test]
    fn test_repeated_context_is_merged() {
        let parsed = parse_ts_with_issues(
            br#"<TS><context><name>C</name>
<message><source>A</source><translation>1</translation></message>
</context><context><name>C</name>
<message><source>B</source><translation>2</translation></message>
</context></TS>"#,
        )
        .unwrap();
        assert_eq!(parsed.catalog.store().context_count(), 1);
        assert_eq!(parsed.catalog.store().len(), 2);
        assert_eq!(parsed.issues[0].kind, IssueKind::ContextMerged);
    }

    #[test]
    fn test_indented_comment_translation_is_empty() {
        let catalog = parse(
            r#"<TS version="2.1" language="de"><context><name>C</name>
<message>
    <source>Open</source>
    <translation>
        <!-- waiting for review -->
    </translation>
</message>
</context></TS>"#,
        );
        let message = catalog.store().get("C", "Open", None).unwrap();
        assert_eq!(message.status, Status::Unfinished);
        assert_eq!(message.translation.text, TranslationText::Singular(String::new()));
        assert_eq!(message.translation.retained.len(), 1);
    }

    #[test]
    fn test_mixed_translation_content_is_malformed() {
        let err = parse_ts(
            br#"<TS><context><name>C</name><message numerus="yes"><source>%n</source>
<translation>text<numerusform>a</numerusform></translation></message></context></TS>"#,
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_bom_is_accepted() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(b"<TS version=\"2.0\"></TS>");
        let catalog = parse_ts(&data).unwrap();
        assert_eq!(catalog.version, "2.0");
        assert!(catalog.store().is_empty());
    }
}
