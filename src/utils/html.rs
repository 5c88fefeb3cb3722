//! Minimal HTML tag scanner
//!
//! Locates element boundaries inside mixed Markdown/HTML text. Tag names are
//! matched case-insensitively and same-name nesting is tracked, so a table
//! nested inside a cell closes at its own `</table>`. Nothing here builds a
//! DOM: callers get byte ranges back and slice the original string, which
//! keeps segment boundaries exact. Table structure inside a located block is
//! read with `scraper` (see `core::table::parser`).

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    /// `name="value"`, `name='value'` or `name=value`
    static ref ATTRIBUTE: Regex = Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#
    )
    .expect("attribute pattern");
}

/// Byte ranges of one element in the scanned source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Opening `<` through the closing tag's `>`
    pub outer: Range<usize>,
    /// The opening tag, brackets included
    pub open_tag: Range<usize>,
    /// Everything between the opening and closing tags
    pub inner: Range<usize>,
}

impl Element {
    pub fn outer_str<'a>(&self, src: &'a str) -> &'a str {
        &src[self.outer.clone()]
    }

    pub fn open_tag_str<'a>(&self, src: &'a str) -> &'a str {
        &src[self.open_tag.clone()]
    }
}

/// Case-insensitive tag scanner over a borrowed source string
pub struct TagScanner<'a> {
    src: &'a str,
    // ASCII lowercasing keeps byte offsets identical to `src`
    lower: String,
}

impl<'a> TagScanner<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            lower: src.to_ascii_lowercase(),
        }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    /// Position of the next `<name` opening tag at or after `from`
    pub fn find_open(&self, name: &str, from: usize) -> Option<usize> {
        let pattern = format!("<{}", name);
        let mut pos = from;
        while let Some(offset) = self.lower.get(pos..)?.find(&pattern) {
            let start = pos + offset;
            let after = start + pattern.len();
            if is_name_boundary(self.lower.as_bytes().get(after).copied()) {
                return Some(start);
            }
            pos = after;
        }
        None
    }

    /// Whether an opening `<name` tag starts exactly at `pos`
    pub fn is_open_at(&self, name: &str, pos: usize) -> bool {
        let bytes = self.lower.as_bytes();
        let name_end = pos + 1 + name.len();
        bytes.get(pos) == Some(&b'<')
            && self.lower.get(pos + 1..name_end) == Some(name)
            && is_name_boundary(bytes.get(name_end).copied())
    }

    /// Index just past the `>` closing the tag that starts at `start`.
    /// Quoted attribute values may contain `>`.
    pub fn open_tag_end(&self, start: usize) -> Option<usize> {
        let bytes = self.lower.as_bytes();
        let mut quote: Option<u8> = None;
        let mut i = start + 1;
        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == b'>' => return Some(i + 1),
                None if b == b'<' => return None,
                None => {}
            }
            i += 1;
        }
        None
    }

    /// Range of the next `</name>` closing tag at or after `from`
    pub fn find_close(&self, name: &str, from: usize) -> Option<Range<usize>> {
        let pattern = format!("</{}", name);
        let mut pos = from;
        while let Some(offset) = self.lower.get(pos..)?.find(&pattern) {
            let start = pos + offset;
            let mut end = start + pattern.len();
            let bytes = self.lower.as_bytes();
            while end < bytes.len() && bytes[end].is_ascii_whitespace() {
                end += 1;
            }
            if bytes.get(end) == Some(&b'>') {
                return Some(start..end + 1);
            }
            pos = start + pattern.len();
        }
        None
    }

    /// Match the element whose opening tag starts at `start`.
    ///
    /// Returns `None` when the opening tag is malformed or the element is
    /// never closed.
    pub fn element_at(&self, name: &str, start: usize) -> Option<Element> {
        if !self.is_open_at(name, start) {
            return None;
        }
        let open_end = self.open_tag_end(start)?;
        if self.lower[..open_end].ends_with("/>") {
            return Some(Element {
                outer: start..open_end,
                open_tag: start..open_end,
                inner: open_end..open_end,
            });
        }

        let mut depth = 1usize;
        let mut pos = open_end;
        loop {
            let close = self.find_close(name, pos)?;
            match self.find_open(name, pos) {
                Some(nested) if nested < close.start => {
                    depth += 1;
                    pos = self.open_tag_end(nested)?;
                }
                _ => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(Element {
                            outer: start..close.end,
                            open_tag: start..open_end,
                            inner: open_end..close.start,
                        });
                    }
                    pos = close.end;
                }
            }
        }
    }

    /// First complete `name` element at or after `from`
    pub fn find_element(&self, name: &str, from: usize) -> Option<Element> {
        let mut pos = from;
        while let Some(start) = self.find_open(name, pos) {
            if let Some(element) = self.element_at(name, start) {
                return Some(element);
            }
            pos = start + 1;
        }
        None
    }
}

fn is_name_boundary(next: Option<u8>) -> bool {
    matches!(next, Some(b) if b.is_ascii_whitespace() || b == b'>' || b == b'/')
}

/// Value of attribute `name` in an opening tag, matched case-insensitively
pub fn attribute(open_tag: &str, name: &str) -> Option<String> {
    ATTRIBUTE.captures_iter(open_tag).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str().to_string())
    })
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
