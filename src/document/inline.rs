//! Inline markup carried by block content.
//!
//! Block content is markup-bearing text: plain characters mixed with a small
//! set of inline tags (`<b>`, `<i>`, `<u>` and friends) and HTML entities.
//! This module tokenizes content so the rest of the crate can reason about
//! text positions without ever splitting a tag or an entity in half.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)[^<>]*>").expect("valid tag regex"));

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6}|[A-Za-z]{2,8});").expect("valid entity regex")
});

/// What a token in block content represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A literal character.
    Text(char),
    /// An entity, decoded to the character it stands for.
    Entity(char),
    /// An opening or closing tag. `name` is lowercased.
    Tag { name: String, closing: bool },
}

/// A token and the byte range it occupies in the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

impl Token {
    /// Character this token contributes to the text content, if any.
    pub const fn text_char(&self) -> Option<char> {
        match self.kind {
            TokenKind::Text(c) | TokenKind::Entity(c) => Some(c),
            TokenKind::Tag { .. } => None,
        }
    }
}

/// Split content into text, entity and tag tokens.
pub fn tokenize(content: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < content.len() {
        let rest = &content[pos..];
        if rest.starts_with('<') {
            if let Some(caps) = TAG_RE.captures(rest) {
                let len = caps[0].len();
                tokens.push(Token {
                    range: pos..pos + len,
                    kind: TokenKind::Tag {
                        name: caps[2].to_ascii_lowercase(),
                        closing: !caps[1].is_empty(),
                    },
                });
                pos += len;
                continue;
            }
        } else if rest.starts_with('&') {
            if let Some(caps) = ENTITY_RE.captures(rest) {
                if let Some(decoded) = decode_entity(&caps[1]) {
                    let len = caps[0].len();
                    tokens.push(Token {
                        range: pos..pos + len,
                        kind: TokenKind::Entity(decoded),
                    });
                    pos += len;
                    continue;
                }
            }
        }
        let ch = rest.chars().next().unwrap_or_default();
        let len = ch.len_utf8();
        tokens.push(Token {
            range: pos..pos + len,
            kind: TokenKind::Text(ch),
        });
        pos += len;
    }
    tokens
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let value = if let Some(hex) = num.strip_prefix(['x', 'X']) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        return char::from_u32(value);
    }
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}

/// Text content of the markup: tags dropped, entities decoded.
pub fn plain_text(content: &str) -> String {
    tokenize(content).iter().filter_map(Token::text_char).collect()
}

/// Whether the text content is empty once surrounding whitespace is removed.
pub fn is_blank(content: &str) -> bool {
    tokenize(content)
        .iter()
        .filter_map(Token::text_char)
        .all(char::is_whitespace)
}

/// Escape literal text so it can be stored as block content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Caret position one text character to the right of `offset`.
pub fn next_boundary(content: &str, offset: usize) -> usize {
    tokenize(content)
        .into_iter()
        .find(|t| t.range.start >= offset && t.text_char().is_some())
        .map_or(content.len(), |t| t.range.end)
}

/// Caret position one text character to the left of `offset`.
pub fn prev_boundary(content: &str, offset: usize) -> usize {
    tokenize(content)
        .into_iter()
        .rev()
        .find(|t| t.range.end <= offset && t.text_char().is_some())
        .map_or(0, |t| t.range.start)
}

/// Move `offset` out of any token it falls inside of.
pub fn snap(content: &str, offset: usize) -> usize {
    if offset >= content.len() {
        return content.len();
    }
    tokenize(content)
        .into_iter()
        .find(|t| t.range.start < offset && offset < t.range.end)
        .map_or(offset, |t| t.range.end)
}

/// Remove the text characters inside `range`, keeping any tags so the
/// remaining markup stays balanced.
pub fn remove_text(content: &str, range: Range<usize>) -> String {
    let mut out = String::with_capacity(content.len());
    for token in tokenize(content) {
        let inside = token.range.start >= range.start && token.range.end <= range.end;
        if inside && token.text_char().is_some() {
            continue;
        }
        out.push_str(&content[token.range]);
    }
    out
}

/// Text content before `offset`, used by hosts to place the caret.
pub fn plain_prefix(content: &str, offset: usize) -> String {
    tokenize(content)
        .iter()
        .take_while(|t| t.range.end <= offset)
        .filter_map(Token::text_char)
        .collect()
}

/// Inline formatting a selection can be toggled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Underline,
}

impl Format {
    const fn tag(self) -> &'static str {
        match self {
            Self::Bold => "b",
            Self::Italic => "i",
            Self::Underline => "u",
        }
    }

    fn open(self) -> String {
        format!("<{}>", self.tag())
    }

    fn close(self) -> String {
        format!("</{}>", self.tag())
    }
}

/// Toggle `format` over the byte range `selection` of `content`.
///
/// Tags at the edges of the selection are ignored, so a selection that
/// starts or ends beside a tag still sees the pair around its text. When the
/// text is enclosed by a matching pair of the format's tags (with only tags
/// in between), that pair is removed; otherwise the text is wrapped. Returns
/// the new content and the range now covering the same text, or `None` when
/// the selection holds no text or does not sit on token boundaries.
pub fn toggle_format(
    content: &str,
    selection: Range<usize>,
    format: Format,
) -> Option<(String, Range<usize>)> {
    if selection.start >= selection.end || selection.end > content.len() {
        return None;
    }
    let tokens = tokenize(content);
    let on_boundary = |offset: usize| {
        offset == content.len() || tokens.iter().any(|t| t.range.start == offset)
    };
    if !on_boundary(selection.start) || !on_boundary(selection.end) {
        return None;
    }

    let mut text = tokens.iter().enumerate().filter(|(_, t)| {
        t.range.start >= selection.start && t.range.end <= selection.end && t.text_char().is_some()
    });
    let (first, _) = text.next()?;
    let last = text.last().map_or(first, |(idx, _)| idx);
    let start = tokens[first].range.start;
    let end = tokens[last].range.end;

    if let Some((open, close)) = enclosing_pair(&tokens, first, last, format) {
        let open = tokens[open].range.clone();
        let close = tokens[close].range.clone();
        let unwrapped = format!(
            "{}{}{}",
            &content[..open.start],
            &content[open.end..close.start],
            &content[close.end..]
        );
        let shift = open.len();
        return Some((unwrapped, start - shift..end - shift));
    }

    let open = format.open();
    let close = format.close();
    let wrapped = format!(
        "{}{open}{}{close}{}",
        &content[..start],
        &content[start..end],
        &content[end..]
    );
    let new_start = start + open.len();
    Some((wrapped, new_start..new_start + (end - start)))
}

fn is_format_tag(token: &Token, format: Format, closing: bool) -> bool {
    matches!(&token.kind, TokenKind::Tag { name, closing: c } if name == format.tag() && *c == closing)
}

/// Indices of the `format` tag pair around text tokens `first..=last`, when
/// only tags separate the pair from that text.
fn enclosing_pair(
    tokens: &[Token],
    first: usize,
    last: usize,
    format: Format,
) -> Option<(usize, usize)> {
    let open = tokens[..first]
        .iter()
        .rposition(|t| t.text_char().is_some() || is_format_tag(t, format, false))?;
    if !is_format_tag(&tokens[open], format, false) {
        return None;
    }
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        if is_format_tag(token, format, false) {
            depth += 1;
        } else if is_format_tag(token, format, true) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                let only_tags = tokens[last + 1..idx.max(last + 1)]
                    .iter()
                    .all(|t| t.text_char().is_none());
                return (idx > last && only_tags).then_some((open, idx));
            }
        }
    }
    None
}

/// Inline style flags derived from enclosing tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Split content into styled runs of text content.
pub fn styled_spans(content: &str) -> Vec<InlineSpan> {
    let mut depth = [0usize; 3];
    let mut spans: Vec<InlineSpan> = Vec::new();
    for token in tokenize(content) {
        match token.kind {
            TokenKind::Tag { name, closing } => {
                let slot = match name.as_str() {
                    "b" | "strong" => 0,
                    "i" | "em" => 1,
                    "u" => 2,
                    _ => continue,
                };
                if closing {
                    depth[slot] = depth[slot].saturating_sub(1);
                } else {
                    depth[slot] += 1;
                }
            }
            TokenKind::Text(ch) | TokenKind::Entity(ch) => {
                let style = InlineStyle {
                    bold: depth[0] > 0,
                    italic: depth[1] > 0,
                    underline: depth[2] > 0,
                };
                match spans.last_mut() {
                    Some(last) if last.style == style => last.text.push(ch),
                    _ => spans.push(InlineSpan::new(ch.to_string(), style)),
                }
            }
        }
    }
    spans
}
