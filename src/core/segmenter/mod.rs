//! Document segmentation
//!
//! A document is Markdown-like text with raw HTML blocks mixed in. The
//! segmenter splits it into an ordered list of typed [`Segment`]s: text
//! runs interleaved with tables, YouTube embeds and PDF embeds.
//!
//! The sequence always starts and ends with a text segment and alternates
//! text and block, keeping zero-length text runs at boundaries, so that
//! concatenating every segment's `raw` reproduces the document exactly.
//!
//! Segments are a disposable projection of the string: they are recomputed
//! on every change and identified only by position.
//!
//! ```rust
//! use richblocks::segmenter::{segment_document, SegmentKind};
//!
//! let doc = "Intro\n<table><tr><td>1</td></tr></table>\nOutro";
//! let segments = segment_document(doc);
//! let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
//! assert_eq!(kinds, [SegmentKind::Text, SegmentKind::Table, SegmentKind::Text]);
//! assert_eq!(segments.assemble(), doc);
//! ```


use crate::core::embed::{EmbedProvider, EmbedRef};
use crate::core::options::InsertMode;
use crate::utils::error::{EditorError, EditorResult};
use crate::utils::html::{attribute, TagScanner};
use std::fmt;
use std::ops::Range;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Segment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SegmentKind {
    Text,
    Table,
    Youtube,
    Pdf,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Text => "text",
            SegmentKind::Table => "table",
            SegmentKind::Youtube => "youtube",
            SegmentKind::Pdf => "pdf",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, SegmentKind::Text)
    }

    pub fn is_embed(&self) -> bool {
        matches!(self, SegmentKind::Youtube | SegmentKind::Pdf)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed span of a document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Segment {
    pub kind: SegmentKind,
    /// Literal substring, tags included for blocks
    pub raw: String,
    /// Position in the segment sequence
    pub index: usize,
    /// Byte range in the source document
    pub span: Range<usize>,
}

impl Segment {
    /// Provider reference for embed segments
    pub fn embed(&self) -> Option<EmbedRef> {
        if self.kind.is_embed() {
            EmbedRef::from_html(&self.raw)
        } else {
            None
        }
    }
}

/// Caret position inside one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Caret {
    pub segment: usize,
    /// Byte offset within the segment's raw text
    pub offset: usize,
}

impl Caret {
    pub fn new(segment: usize, offset: usize) -> Self {
        Self { segment, offset }
    }
}

/// Ordered segments of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    segments: Vec<Segment>,
}

/// Split a document into segments. Never fails: markup that does not match
/// a known block shape stays in the surrounding text.
pub fn segment_document(doc: &str) -> Segmentation {
    let scanner = TagScanner::new(doc);
    let mut builder = Builder::default();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = doc[pos..].find('<') {
        let start = pos + offset;
        match match_block(&scanner, start) {
            Some((kind, end)) => {
                builder.push(doc, SegmentKind::Text, text_start..start);
                builder.push(doc, kind, start..end);
                text_start = end;
                pos = end;
            }
            None => pos = start + 1,
        }
    }
    builder.push(doc, SegmentKind::Text, text_start..doc.len());

    let segmentation = Segmentation {
        segments: builder.segments,
    };
    debug!(
        segments = segmentation.len(),
        tables = segmentation.count(SegmentKind::Table),
        youtube = segmentation.count(SegmentKind::Youtube),
        pdf = segmentation.count(SegmentKind::Pdf),
        "segmented document"
    );
    segmentation
}

/// Try each block shape at `start`, in precedence order
fn match_block(scanner: &TagScanner<'_>, start: usize) -> Option<(SegmentKind, usize)> {
    if let Some(table) = scanner.element_at("table", start) {
        return Some((SegmentKind::Table, table.outer.end));
    }
    let frame = scanner.element_at("iframe", start)?;
    let src = attribute(frame.open_tag_str(scanner.src()), "src")?;
    let embed = EmbedRef::from_src(&src)?;
    let kind = match embed.provider {
        EmbedProvider::Youtube => SegmentKind::Youtube,
        EmbedProvider::Pdf => SegmentKind::Pdf,
    };
    Some((kind, frame.outer.end))
}

#[derive(Default)]
struct Builder {
    segments: Vec<Segment>,
}

impl Builder {
    fn push(&mut self, doc: &str, kind: SegmentKind, span: Range<usize>) {
        self.segments.push(Segment {
            kind,
            raw: doc[span.clone()].to_string(),
            index: self.segments.len(),
            span,
        });
    }
}

impl Segmentation {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: even an empty document has one empty text segment
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn count(&self, kind: SegmentKind) -> usize {
        self.segments.iter().filter(|s| s.kind == kind).count()
    }

    /// Raw blocks of one kind, in order of appearance
    pub fn blocks(&self, kind: SegmentKind) -> Vec<&str> {
        self.segments
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.raw.as_str())
            .collect()
    }

    pub fn tables(&self) -> Vec<&str> {
        self.blocks(SegmentKind::Table)
    }

    pub fn youtube_embeds(&self) -> Vec<&str> {
        self.blocks(SegmentKind::Youtube)
    }

    pub fn pdf_embeds(&self) -> Vec<&str> {
        self.blocks(SegmentKind::Pdf)
    }

    /// Text runs, in order
    pub fn text_runs(&self) -> Vec<&str> {
        self.blocks(SegmentKind::Text)
    }

    /// Concatenate every segment back into a document
    pub fn assemble(&self) -> String {
        self.segments.iter().map(|s| s.raw.as_str()).collect()
    }

    /// Document with segment `index` replaced by `replacement`
    pub fn replace(&self, index: usize, replacement: &str) -> EditorResult<String> {
        if index >= self.segments.len() {
            return Err(EditorError::out_of_range(index, self.segments.len()));
        }
        Ok(self.splice(index, replacement))
    }

    fn splice(&self, index: usize, replacement: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.index == index {
                out.push_str(replacement);
            } else {
                out.push_str(&segment.raw);
            }
        }
        out
    }

    /// Document with the block at `index` deleted
    pub fn remove(&self, index: usize) -> EditorResult<String> {
        self.replace(index, "")
    }

    /// Insert `snippet` into a text segment.
    ///
    /// With [`InsertMode::FirstText`] the snippet always goes into segment 0,
    /// at the caret offset when the caret is there and at its end
    /// otherwise. With [`InsertMode::Caret`] it goes where the caret is; a
    /// caret inside a block leaves the document unchanged.
    pub fn insert(&self, caret: Caret, snippet: &str, mode: InsertMode) -> String {
        self.insert_with_caret(caret, snippet, mode).0
    }

    /// Like [`Segmentation::insert`], also returning the absolute byte
    /// offset just past the inserted snippet
    pub fn insert_with_caret(
        &self,
        caret: Caret,
        snippet: &str,
        mode: InsertMode,
    ) -> (String, Option<usize>) {
        let (target, offset) = match mode {
            InsertMode::FirstText if caret.segment == 0 => (0, caret.offset),
            InsertMode::FirstText => (0, self.segments.first().map(|s| s.raw.len()).unwrap_or(0)),
            InsertMode::Caret => (caret.segment, caret.offset),
        };

        let Some(segment) = self.segments.get(target).filter(|s| s.kind.is_text()) else {
            debug!(segment = target, "insert target is not a text segment");
            return (self.assemble(), None);
        };

        let at = floor_char_boundary(&segment.raw, offset.min(segment.raw.len()));
        let mut raw = String::with_capacity(segment.raw.len() + snippet.len());
        raw.push_str(&segment.raw[..at]);
        raw.push_str(snippet);
        raw.push_str(&segment.raw[at..]);

        let new_caret = segment.span.start + at + snippet.len();
        (self.splice(target, &raw), Some(new_caret))
    }

    /// Map an absolute byte offset to a caret. An offset on a boundary
    /// between a block and a text run resolves to the text run.
    pub fn caret_at(&self, offset: usize) -> Caret {
        let text_hit = self
            .segments
            .iter()
            .find(|s| s.kind.is_text() && s.span.start <= offset && offset <= s.span.end);
        let hit = text_hit.or_else(|| {
            self.segments
                .iter()
                .find(|s| s.span.start <= offset && offset < s.span.end)
        });
        match hit {
            Some(s) => Caret::new(s.index, offset - s.span.start),
            None => {
                let last = self.segments.last();
                Caret::new(
                    last.map(|s| s.index).unwrap_or(0),
                    last.map(|s| s.raw.len()).unwrap_or(0),
                )
            }
        }
    }

    /// Caret at the end of the segment just before `index`; where a block
    /// sat once it has been removed
    pub fn caret_before(&self, index: usize) -> Caret {
        match index.checked_sub(1).and_then(|i| self.segments.get(i)) {
            Some(prev) => Caret::new(prev.index, prev.raw.len()),
            None => Caret::default(),
        }
    }
}

impl<'a> IntoIterator for &'a Segmentation {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
