//! Splitting condition text into quoted and unquoted segments.
//!
//! Canonicalization rewrites free text, but never the contents of a
//! double-quoted string literal. The segmenter finds the quoted spans so the
//! rewrite passes can skip them.

/// A slice of condition text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Free text, subject to rewriting.
    Plain(&'a str),
    /// A string literal including its quotes, preserved verbatim.
    Quoted(&'a str),
}

impl<'a> Segment<'a> {
    /// The underlying text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        match self {
            Self::Plain(s) | Self::Quoted(s) => s,
        }
    }
}

/// Splits text into alternating plain and quoted segments.
///
/// A backslash inside quotes escapes the next character. An unterminated
/// quote runs to the end of the input and is still treated as quoted, so the
/// parser sees (and reports) it unchanged.
#[must_use]
pub fn segments(input: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut chars = input.char_indices();

    while let Some((i, ch)) = chars.next() {
        if ch != '"' {
            continue;
        }
        if i > plain_start {
            out.push(Segment::Plain(&input[plain_start..i]));
        }
        let mut end = input.len();
        while let Some((j, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => {
                    end = j + 1;
                    break;
                }
                _ => {}
            }
        }
        out.push(Segment::Quoted(&input[i..end]));
        plain_start = end;
    }

    if plain_start < input.len() {
        out.push(Segment::Plain(&input[plain_start..]));
    }
    out
}

/// Applies `rewrite` to every plain segment and reassembles the text.
pub fn rewrite_plain(input: &str, mut rewrite: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(input.len());
    for segment in segments(input) {
        match segment {
            Segment::Plain(text) => out.push_str(&rewrite(text)),
            Segment::Quoted(text) => out.push_str(text),
        }
    }
    out
}
