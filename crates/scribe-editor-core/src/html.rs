//! Minimal HTML fragment handling for the in-memory engine.
//!
//! Initial content arrives as a run of well-formed block fragments
//! (`<h1>..</h1><p>..</p>..`). This module splits such a run into its
//! top-level blocks and derives text statistics from block content. It is
//! not a general HTML parser: it understands elements, void elements,
//! comments, quoted attributes and a handful of entities, which is all the
//! editor ever serializes.

use std::borrow::Cow;

use smol_str::SmolStr;

use crate::error::HtmlError;

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Blocks whose direct content is inline text.
const TEXTBLOCKS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "pre"];

/// Blocks that only contain other blocks.
const CONTAINERS: &[&str] = &["ul", "ol", "li", "blockquote", "div"];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// One top-level block parsed out of a fragment run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlBlock {
    /// Lowercased element name.
    pub tag_name: SmolStr,
    /// Raw attribute text as written, without the element name.
    pub attributes: String,
    /// Content between the start and end tags, byte-for-byte.
    pub inner_html: String,
}

impl HtmlBlock {
    pub fn new(tag_name: impl Into<SmolStr>, inner_html: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: String::new(),
            inner_html: inner_html.into(),
        }
    }

    /// Serialize back to HTML.
    pub fn outer_html(&self) -> String {
        outer_html(&self.tag_name, &self.attributes, &self.inner_html)
    }
}

/// Build `<tag attrs>inner</tag>` (or `<tag attrs>` for void elements).
pub fn outer_html(tag_name: &str, attributes: &str, inner_html: &str) -> String {
    let mut out = String::with_capacity(tag_name.len() * 2 + attributes.len() + inner_html.len() + 6);
    out.push('<');
    out.push_str(tag_name);
    if !attributes.is_empty() {
        out.push(' ');
        out.push_str(attributes);
    }
    out.push('>');
    if !is_void_element(tag_name) {
        out.push_str(inner_html);
        out.push_str("</");
        out.push_str(tag_name);
        out.push('>');
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Open {
        name: SmolStr,
        attributes: &'a str,
        self_closing: bool,
    },
    Close {
        name: SmolStr,
    },
    Text(&'a str),
    Comment,
}

struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Next token with its byte span.
    fn next_token(&mut self) -> Result<Option<(Token<'a>, usize, usize)>, HtmlError> {
        let start = self.pos;
        let rest = &self.src[start..];
        if rest.is_empty() {
            return Ok(None);
        }

        if !rest.starts_with('<') {
            let len = rest.find('<').unwrap_or(rest.len());
            self.pos += len;
            return Ok(Some((Token::Text(&rest[..len]), start, self.pos)));
        }

        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body
                .find("-->")
                .ok_or(HtmlError::MalformedTag { offset: start })?;
            self.pos += 4 + end + 3;
            return Ok(Some((Token::Comment, start, self.pos)));
        }

        if let Some(body) = rest.strip_prefix("</") {
            let name_len = tag_name_len(body);
            if name_len == 0 {
                return Err(HtmlError::MalformedTag { offset: start });
            }
            let after = &body[name_len..];
            let trimmed = after.trim_start();
            if !trimmed.starts_with('>') {
                return Err(HtmlError::MalformedTag { offset: start });
            }
            let name = SmolStr::new(body[..name_len].to_ascii_lowercase());
            self.pos += 2 + name_len + (after.len() - trimmed.len()) + 1;
            return Ok(Some((Token::Close { name }, start, self.pos)));
        }

        let body = &rest[1..];
        let name_len = tag_name_len(body);
        if name_len == 0 {
            return Err(HtmlError::MalformedTag { offset: start });
        }
        let name = SmolStr::new(body[..name_len].to_ascii_lowercase());

        // Find the closing '>' outside of quoted attribute values.
        let attr_src = &body[name_len..];
        let mut quote: Option<char> = None;
        let mut close = None;
        for (i, c) in attr_src.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"') | (None, '\'') => quote = Some(c),
                (None, '>') => {
                    close = Some(i);
                    break;
                }
                (None, '<') => return Err(HtmlError::MalformedTag { offset: start }),
                _ => {}
            }
        }
        let close = close.ok_or(HtmlError::MalformedTag { offset: start })?;

        let raw_attrs = attr_src[..close].trim();
        let (attributes, self_closing) = match raw_attrs.strip_suffix('/') {
            Some(stripped) => (stripped.trim_end(), true),
            None => (raw_attrs, false),
        };

        self.pos += 1 + name_len + close + 1;
        Ok(Some((
            Token::Open {
                name,
                attributes,
                self_closing,
            },
            start,
            self.pos,
        )))
    }
}

fn tag_name_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    s.char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '-'))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Split a run of block fragments into top-level blocks.
///
/// Whitespace and comments between blocks are ignored; any other text at
/// the top level is an error.
pub fn parse_blocks(html: &str) -> Result<Vec<HtmlBlock>, HtmlError> {
    let mut tokens = Tokenizer::new(html);
    let mut blocks = Vec::new();

    while let Some((token, start, end)) = tokens.next_token()? {
        match token {
            Token::Comment => {}
            Token::Text(text) if text.trim().is_empty() => {}
            Token::Text(_) => return Err(HtmlError::StrayText { offset: start }),
            Token::Close { .. } => return Err(HtmlError::MalformedTag { offset: start }),
            Token::Open {
                name,
                attributes,
                self_closing,
            } => {
                let inner_html = if self_closing || is_void_element(&name) {
                    String::new()
                } else {
                    let inner_end = scan_to_close(&mut tokens, &name, start)?;
                    html[end..inner_end].to_string()
                };
                blocks.push(HtmlBlock {
                    tag_name: name,
                    attributes: attributes.to_string(),
                    inner_html,
                });
            }
        }
    }

    Ok(blocks)
}

/// Consume tokens up to the end tag matching an already-consumed start tag.
/// Returns the byte offset where the end tag begins.
fn scan_to_close(
    tokens: &mut Tokenizer<'_>,
    name: &SmolStr,
    open_offset: usize,
) -> Result<usize, HtmlError> {
    let mut stack: Vec<(SmolStr, usize)> = vec![(name.clone(), open_offset)];

    while let Some((token, start, _end)) = tokens.next_token()? {
        match token {
            Token::Open {
                name, self_closing, ..
            } => {
                if !self_closing && !is_void_element(&name) {
                    stack.push((name, start));
                }
            }
            Token::Close { name } => {
                let Some((expected, _)) = stack.pop() else {
                    return Err(HtmlError::MalformedTag { offset: start });
                };
                if expected != name {
                    return Err(HtmlError::Mismatched {
                        expected,
                        found: name,
                        offset: start,
                    });
                }
                if stack.is_empty() {
                    return Ok(start);
                }
            }
            Token::Text(_) | Token::Comment => {}
        }
    }

    let (name, offset) = stack.pop().unwrap_or((name.clone(), open_offset));
    Err(HtmlError::Unclosed { name, offset })
}

/// Check that `inner_html` is balanced content that can sit inside a block.
pub fn validate_inner_html(inner_html: &str) -> Result<(), HtmlError> {
    let mut tokens = Tokenizer::new(inner_html);
    let mut stack: Vec<(SmolStr, usize)> = Vec::new();
    while let Some((token, start, _)) = tokens.next_token()? {
        match token {
            Token::Open {
                name, self_closing, ..
            } if !self_closing && !is_void_element(&name) => stack.push((name, start)),
            Token::Close { name } => match stack.pop() {
                Some((expected, _)) if expected == name => {}
                Some((expected, _)) => {
                    return Err(HtmlError::Mismatched {
                        expected,
                        found: name,
                        offset: start,
                    });
                }
                None => return Err(HtmlError::MalformedTag { offset: start }),
            },
            _ => {}
        }
    }
    match stack.pop() {
        Some((name, offset)) => Err(HtmlError::Unclosed { name, offset }),
        None => Ok(()),
    }
}

/// Decode the entities the editor serializes.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[1..semi];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(|code: u32| match code {
                        // NUL is never produced from markup.
                        0 => Some(char::REPLACEMENT_CHARACTER),
                        _ => char::from_u32(code),
                    }),
            };
            c.map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Word and character statistics for a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
}

/// Placeholder for leaf nodes (`<br>`, `<img>`, `<hr>`) while collapsing
/// whitespace, so they survive trimming. Rendered as a single space.
const LEAF: char = '\u{0}';

/// Collects the text of each textblock in document order.
#[derive(Default)]
struct TextCollector {
    segments: Vec<String>,
    current: Option<String>,
    pre_depth: usize,
}

impl TextCollector {
    fn flush(&mut self) {
        if let Some(segment) = self.current.take() {
            self.segments.push(finish_segment(&segment, self.pre_depth > 0));
        }
    }

    fn open(&mut self, name: &str) {
        if TEXTBLOCKS.contains(&name) {
            self.flush();
            if name == "pre" {
                self.pre_depth += 1;
            }
            self.current = Some(String::new());
        } else if CONTAINERS.contains(&name) {
            self.flush();
        } else if is_void_element(name) {
            self.current.get_or_insert_with(String::new).push(LEAF);
            if name == "hr" {
                // Block-level leaf stands alone.
                self.flush();
            }
        }
    }

    fn close(&mut self, name: &str) {
        if TEXTBLOCKS.contains(&name) {
            self.flush();
            if name == "pre" {
                self.pre_depth = self.pre_depth.saturating_sub(1);
            }
        } else if CONTAINERS.contains(&name) {
            self.flush();
        }
    }

    fn text(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        if self.pre_depth > 0 {
            self.current.get_or_insert_with(String::new).push_str(&decoded);
            return;
        }
        // Whitespace-only text between blocks is formatting, not content.
        if self.current.is_none() && decoded.trim().is_empty() {
            return;
        }
        let segment = self.current.get_or_insert_with(String::new);
        for c in decoded.chars() {
            if c.is_ascii_whitespace() {
                if !segment.is_empty() && !segment.ends_with(' ') {
                    segment.push(' ');
                }
            } else {
                segment.push(c);
            }
        }
    }
}

fn finish_segment(segment: &str, preformatted: bool) -> String {
    let text = if preformatted {
        segment
    } else {
        segment.trim_matches(' ')
    };
    text.replace(LEAF, " ")
}

/// Text of each textblock inside one block element, in order.
pub fn block_text_segments(tag_name: &str, inner_html: &str) -> Vec<String> {
    let mut collector = TextCollector::default();
    collector.open(tag_name);

    let mut tokens = Tokenizer::new(inner_html);
    // Content was validated on the way in; stop quietly on anything odd.
    while let Ok(Some((token, _, _))) = tokens.next_token() {
        match token {
            Token::Open {
                name, self_closing, ..
            } => {
                collector.open(&name);
                if self_closing && !is_void_element(&name) {
                    collector.close(&name);
                }
            }
            Token::Close { name } => collector.close(&name),
            Token::Text(text) => collector.text(text),
            Token::Comment => {}
        }
    }

    if !is_void_element(tag_name) {
        collector.close(tag_name);
    }
    collector.flush();
    collector.segments
}

/// Compute statistics over `(tag_name, inner_html)` blocks.
///
/// Characters are counted without block separators, leaf nodes count as
/// one character. Words are split on spaces with textblock boundaries acting
/// as separators.
pub fn text_stats<'a>(blocks: impl IntoIterator<Item = (&'a str, &'a str)>) -> TextStats {
    let segments: Vec<String> = blocks
        .into_iter()
        .flat_map(|(tag, inner)| block_text_segments(tag, inner))
        .collect();

    let characters = segments.iter().map(|s| s.chars().count()).sum();
    let words = segments
        .iter()
        .map(|s| s.split(' ').filter(|w| !w.is_empty()).count())
        .sum();

    TextStats { words, characters }
}
