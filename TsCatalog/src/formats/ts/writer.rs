//! TS file writing

use std::fs;
use std::io::Write;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::TS_ROOT;
use super::document::{
    Location, Message, OpaqueBlob, OpaqueContent, RawAttribute, RetainedContent, Status,
    TranslationText,
};
use crate::catalog::{Catalog, ContextView};
use crate::error::Result;

/// Output formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Emit a UTF-8 byte order mark.
    pub byte_order_mark: bool,
    /// Emit `<!DOCTYPE TS>` after the declaration.
    pub doctype: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            byte_order_mark: false,
            doctype: true,
        }
    }
}

/// Write a catalog to a .ts file
///
/// # Errors
/// Returns an error if serialization or the file write fails.
pub fn write_ts<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<()> {
    write_ts_with_options(catalog, path, &WriteOptions::default())
}

/// Write a catalog to a .ts file with explicit formatting
///
/// # Errors
/// Returns an error if serialization or the file write fails.
pub fn write_ts_with_options<P: AsRef<Path>>(
    catalog: &Catalog,
    path: P,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    tracing::info!("Writing TS catalog: {:?}", path);
    let data = serialize_ts_with_options(catalog, options)?;
    fs::write(path, data)?;
    Ok(())
}

/// Serialize a catalog to .ts bytes
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_ts(catalog: &Catalog) -> Result<Vec<u8>> {
    serialize_ts_with_options(catalog, &WriteOptions::default())
}

/// Serialize a catalog to .ts bytes with explicit formatting
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_ts_with_options(catalog: &Catalog, options: &WriteOptions) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    if options.byte_order_mark {
        output.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
    }

    {
        let mut writer = Writer::new_with_indent(&mut output, b' ', options.indent);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        if options.doctype {
            writer.write_event(Event::DocType(BytesText::from_escaped(TS_ROOT)))?;
        }

        let mut root = BytesStart::new(TS_ROOT);
        root.push_attribute(("version", catalog.version.as_str()));
        if let Some(language) = &catalog.language {
            root.push_attribute(("language", language.as_str()));
        }
        if let Some(source_language) = &catalog.source_language {
            root.push_attribute(("sourcelanguage", source_language.as_str()));
        }
        push_extra(&mut root, &catalog.extra_attributes);
        writer.write_event(Event::Start(root))?;

        let mut children = Interleave::new(&catalog.retained);
        for context in catalog.store().contexts() {
            children.next_known(&mut writer)?;
            write_context(&mut writer, context)?;
        }
        children.finish(&mut writer)?;

        writer.write_event(Event::End(BytesEnd::new(TS_ROOT)))?;
    }

    output.push(b'\n');
    Ok(output)
}

/// Puts retained content back between the known children of an element.
struct Interleave<'a> {
    pending: std::iter::Peekable<std::slice::Iter<'a, RetainedContent>>,
    written: usize,
}

impl<'a> Interleave<'a> {
    fn new(retained: &'a [RetainedContent]) -> Self {
        Self {
            pending: retained.iter().peekable(),
            written: 0,
        }
    }

    /// Flush retained content that belongs before the next known child.
    fn next_known<W: Write>(&mut self, writer: &mut Writer<W>) -> Result<()> {
        while let Some(retained) = self.pending.next_if(|r| r.position <= self.written) {
            write_content(writer, &retained.content)?;
            self.written += 1;
        }
        self.written += 1;
        Ok(())
    }

    fn finish<W: Write>(self, writer: &mut Writer<W>) -> Result<()> {
        for retained in self.pending {
            write_content(writer, &retained.content)?;
        }
        Ok(())
    }
}

fn write_context<W: Write>(writer: &mut Writer<W>, context: ContextView<'_>) -> Result<()> {
    let info = context.info();
    let mut start = BytesStart::new("context");
    push_extra(&mut start, &info.extra_attributes);
    writer.write_event(Event::Start(start))?;

    let mut children = Interleave::new(&info.retained);
    children.next_known(writer)?;
    write_text_element(writer, "name", &[], &info.name)?;
    if let Some(comment) = &info.comment {
        children.next_known(writer)?;
        write_text_element(writer, "comment", &[], comment)?;
    }
    for message in context.messages() {
        children.next_known(writer)?;
        write_message(writer, message)?;
    }
    children.finish(writer)?;

    writer.write_event(Event::End(BytesEnd::new("context")))?;
    Ok(())
}

fn write_message<W: Write>(writer: &mut Writer<W>, message: &Message) -> Result<()> {
    let mut start = BytesStart::new("message");
    if let Some(id) = &message.id {
        start.push_attribute(("id", id.as_str()));
    }
    if message.numerus {
        start.push_attribute(("numerus", "yes"));
    }
    push_extra(&mut start, &message.extra_attributes);
    writer.write_event(Event::Start(start))?;

    let mut children = Interleave::new(&message.retained);
    for location in &message.locations {
        children.next_known(writer)?;
        write_location(writer, location)?;
    }
    children.next_known(writer)?;
    write_text_element(writer, "source", &[], &message.source)?;

    let optional = [
        ("oldsource", &message.old_source),
        ("comment", &message.comment),
        ("oldcomment", &message.old_comment),
        ("extracomment", &message.extra_comment),
        ("translatorcomment", &message.translator_comment),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            children.next_known(writer)?;
            write_text_element(writer, name, &[], value)?;
        }
    }

    children.next_known(writer)?;
    write_translation(writer, message)?;
    children.finish(writer)?;

    writer.write_event(Event::End(BytesEnd::new("message")))?;
    Ok(())
}

fn write_location<W: Write>(writer: &mut Writer<W>, location: &Location) -> Result<()> {
    let mut start = BytesStart::new("location");
    if let Some(filename) = &location.filename {
        start.push_attribute(("filename", filename.as_str()));
    }
    if let Some(line) = &location.line {
        start.push_attribute(("line", line.as_str()));
    }
    push_extra(&mut start, &location.extra_attributes);
    writer.write_event(Event::Empty(start))?;
    Ok(())
}

fn write_translation<W: Write>(writer: &mut Writer<W>, message: &Message) -> Result<()> {
    let translation = &message.translation;
    let mut start = BytesStart::new("translation");
    if let Some(kind) = type_attribute(message) {
        start.push_attribute(("type", kind));
    }
    push_extra(&mut start, &translation.extra_attributes);
    writer.write_event(Event::Start(start))?;

    match &translation.text {
        TranslationText::Singular(text) => {
            write_text(writer, text)?;
            // No line breaks: they would read back as translation text
            for retained in &translation.retained {
                writer.write_event(Event::Text(BytesText::new("")))?;
                write_content(writer, &retained.content)?;
            }
            writer.write_event(Event::Text(BytesText::new("")))?;
        }
        TranslationText::Plural(forms) => {
            let mut children = Interleave::new(&translation.retained);
            for form in forms {
                children.next_known(writer)?;
                write_text_element(writer, "numerusform", &form.extra_attributes, &form.text)?;
            }
            children.finish(writer)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("translation")))?;
    Ok(())
}

/// `type` attribute for a message's translation.
///
/// Unfinished messages keep the value they were read with, so a future
/// `type` value survives a round trip.
fn type_attribute(message: &Message) -> Option<&str> {
    match message.status {
        Status::Finished => None,
        Status::Obsolete => Some("obsolete"),
        Status::Vanished => Some("vanished"),
        Status::Unfinished => match message.translation.type_attribute.as_deref() {
            Some("obsolete" | "vanished") | None => {
                (!message.translation.text.is_empty()).then_some("unfinished")
            }
            Some(raw) => Some(raw),
        },
    }
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[RawAttribute],
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    push_extra(&mut start, attributes);
    writer.write_event(Event::Start(start))?;
    write_text(writer, text)?;
    // An empty text event keeps the closing tag on the same line
    writer.write_event(Event::Text(BytesText::new("")))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write character data, encoding control characters as `<byte/>` elements.
fn write_text<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
    let mut run_start = 0;
    for (index, c) in text.char_indices() {
        if !needs_byte_escape(c) {
            continue;
        }
        if run_start < index {
            writer.write_event(Event::Text(BytesText::new(&text[run_start..index])))?;
        }
        writer.write_event(Event::Text(BytesText::new("")))?;
        let mut byte = BytesStart::new("byte");
        let value = format!("x{:x}", u32::from(c));
        byte.push_attribute(("value", value.as_str()));
        writer.write_event(Event::Empty(byte))?;
        run_start = index + c.len_utf8();
    }
    if run_start < text.len() {
        writer.write_event(Event::Text(BytesText::new(&text[run_start..])))?;
    }
    Ok(())
}

fn needs_byte_escape(c: char) -> bool {
    c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')
}

fn write_content<W: Write>(writer: &mut Writer<W>, content: &OpaqueContent) -> Result<()> {
    match content {
        OpaqueContent::Element(blob) => write_blob(writer, blob)?,
        OpaqueContent::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        OpaqueContent::CData(text) => {
            writer.write_event(Event::CData(BytesCData::new(text.as_str())))?;
        }
        OpaqueContent::Comment(text) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
        }
    }
    Ok(())
}

fn write_blob<W: Write>(writer: &mut Writer<W>, blob: &OpaqueBlob) -> Result<()> {
    let mut start = BytesStart::new(blob.name.as_str());
    push_extra(&mut start, &blob.attributes);

    // Indentation between child elements is regenerated by the writer
    let structured = blob.has_element_children();
    let children: Vec<&OpaqueContent> = blob
        .children
        .iter()
        .filter(|c| !(structured && matches!(c, OpaqueContent::Text(t) if t.trim().is_empty())))
        .collect();

    if children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in children {
        if !structured && !matches!(child, OpaqueContent::Text(_)) {
            writer.write_event(Event::Text(BytesText::new("")))?;
        }
        write_content(writer, child)?;
    }
    if !structured {
        writer.write_event(Event::Text(BytesText::new("")))?;
    }
    writer.write_event(Event::End(BytesEnd::new(blob.name.as_str())))?;
    Ok(())
}

fn push_extra(start: &mut BytesStart<'_>, attributes: &[RawAttribute]) {
    for attr in attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }
}
