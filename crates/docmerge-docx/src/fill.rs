//! Text traversal and placeholder substitution over `word/document.xml`.
//!
//! Every `<w:t>` node outside a table is visited first, in document order,
//! followed by every `<w:t>` inside a table (rows top to bottom, cells left
//! to right). Text box content (`<w:txbxContent>`) is left alone; Word keeps a
//! second copy of it in the VML fallback, so walking it would consume values
//! twice.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader as XmlReader, Writer as XmlWriter};

use crate::error::DocxError;
use crate::pattern::{PlaceholderPattern, ValueCursor};

const TEXT: &[u8] = b"w:t";
const TABLE: &[u8] = b"w:tbl";
const TEXT_BOX: &[u8] = b"w:txbxContent";

/// Outcome of filling one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Tokens found, filled or not.
    pub tokens: usize,
    /// Tokens replaced by a value.
    pub substituted: usize,
}

impl FillStats {
    pub fn unfilled(&self) -> usize {
        self.tokens - self.substituted
    }
}

enum Piece {
    Raw(Event<'static>),
    Text(usize),
}

struct TextNode {
    start: BytesStart<'static>,
    text: String,
    in_table: bool,
    changed: bool,
}

/// Parsed main document part, split into pass-through events and the
/// `<w:t>` text nodes that take part in substitution.
pub struct DocumentXml {
    pieces: Vec<Piece>,
    texts: Vec<TextNode>,
}

impl DocumentXml {
    pub fn parse(xml: &[u8]) -> Result<Self, DocxError> {
        let mut reader = XmlReader::from_reader(xml);
        reader.config_mut().trim_text(false);
        let mut buf: Vec<u8> = Vec::new();

        let mut pieces = Vec::new();
        let mut texts: Vec<TextNode> = Vec::new();
        let mut table_depth: usize = 0;
        let mut text_box_depth: usize = 0;
        let mut open_text: Option<TextNode> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| DocxError::Xml(format!("failed to parse document XML: {e}")))?;
            match event {
                Event::Eof => break,
                Event::Start(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if name == TEXT && text_box_depth == 0 && open_text.is_none() {
                        open_text = Some(TextNode {
                            start: e.into_owned(),
                            text: String::new(),
                            in_table: table_depth > 0,
                            changed: false,
                        });
                        buf.clear();
                        continue;
                    }
                    if name == TABLE {
                        table_depth += 1;
                    } else if name == TEXT_BOX {
                        text_box_depth += 1;
                    }
                    pieces.push(Piece::Raw(Event::Start(e.into_owned())));
                }
                Event::End(e) => {
                    let name = e.name();
                    let name = name.as_ref();
                    if name == TEXT {
                        if let Some(node) = open_text.take() {
                            pieces.push(Piece::Text(texts.len()));
                            texts.push(node);
                            buf.clear();
                            continue;
                        }
                    }
                    if name == TABLE {
                        table_depth = table_depth.saturating_sub(1);
                    } else if name == TEXT_BOX {
                        text_box_depth = text_box_depth.saturating_sub(1);
                    }
                    pieces.push(Piece::Raw(Event::End(e.into_owned())));
                }
                Event::Text(t) if open_text.is_some() => {
                    let text = t
                        .unescape()
                        .map_err(|e| DocxError::Xml(format!("bad text content: {e}")))?;
                    if let Some(node) = open_text.as_mut() {
                        node.text.push_str(&text);
                    }
                }
                Event::CData(c) if open_text.is_some() => {
                    if let Some(node) = open_text.as_mut() {
                        node.text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                other => pieces.push(Piece::Raw(other.into_owned())),
            }
            buf.clear();
        }

        Ok(Self { pieces, texts })
    }

    /// Indices of the text nodes in substitution order.
    fn traversal(&self) -> impl Iterator<Item = usize> + '_ {
        let body = (0..self.texts.len()).filter(|&i| !self.texts[i].in_table);
        let tables = (0..self.texts.len()).filter(|&i| self.texts[i].in_table);
        body.chain(tables)
    }

    /// Text of each `<w:t>` node, in substitution order.
    pub fn texts(&self) -> Vec<&str> {
        self.traversal().map(|i| self.texts[i].text.as_str()).collect()
    }

    /// Replace tokens in substitution order, drawing values from `cursor`.
    pub fn fill(&mut self, pattern: &PlaceholderPattern, cursor: &mut ValueCursor<'_>) -> FillStats {
        let order: Vec<usize> = self.traversal().collect();
        let mut stats = FillStats::default();
        for i in order {
            let node = &mut self.texts[i];
            if let Some(sub) = pattern.substitute(&node.text, cursor) {
                stats.tokens += sub.tokens;
                stats.substituted += sub.substituted;
                if sub.substituted > 0 {
                    node.text = sub.text;
                    node.changed = true;
                }
            }
        }
        stats
    }

    pub fn to_xml(&self) -> Result<Vec<u8>, DocxError> {
        let mut writer = XmlWriter::new(Vec::new());
        for piece in &self.pieces {
            match piece {
                Piece::Raw(event) => writer.write_event(event.borrow()).map_err(write_error)?,
                Piece::Text(i) => write_text_node(&mut writer, &self.texts[*i])?,
            }
        }
        Ok(writer.into_inner())
    }
}

fn write_error(e: impl std::fmt::Display) -> DocxError {
    DocxError::Xml(format!("XML write error: {e}"))
}

fn write_text_node(writer: &mut XmlWriter<Vec<u8>>, node: &TextNode) -> Result<(), DocxError> {
    let mut start = node.start.clone();
    let edge_space = node.text.starts_with(char::is_whitespace) || node.text.ends_with(char::is_whitespace);
    if node.changed && edge_space && !has_space_preserve(&start) {
        start.push_attribute(("xml:space", "preserve"));
    }
    writer.write_event(Event::Start(start)).map_err(write_error)?;
    writer
        .write_event(Event::Text(BytesText::new(&node.text)))
        .map_err(write_error)?;
    writer.write_event(Event::End(BytesEnd::new("w:t"))).map_err(write_error)?;
    Ok(())
}

fn has_space_preserve(start: &BytesStart<'_>) -> bool {
    start
        .attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"xml:space")
}

/// Fill the placeholder tokens of a `word/document.xml` payload.
pub fn fill_document_xml(
    xml: &[u8],
    pattern: &PlaceholderPattern,
    cursor: &mut ValueCursor<'_>,
) -> Result<(Vec<u8>, FillStats), DocxError> {
    let mut doc = DocumentXml::parse(xml)?;
    let stats = doc.fill(pattern, cursor);
    Ok((doc.to_xml()?, stats))
}
