//! Host-side document session
//!
//! Owns the authoritative document string and re-derives segments from it
//! on every call; nothing parsed is cached between edits. Every change is
//! reported through the `on_change` callback, mirroring a
//! `render(value)` / `onChange(newValue)` host contract.
//!
//! ```rust
//! use richblocks::session::DocumentSession;
//! use richblocks::table::{RowEdge, TableOp};
//! use richblocks::EditorOptions;
//!
//! let mut saved = Vec::new();
//! let mut session = DocumentSession::new(
//!     "Notes\n<table><tr><th>A</th></tr></table>",
//!     EditorOptions::default(),
//!     |value: &str| saved.push(value.to_string()),
//! );
//! session
//!     .apply_table_op(1, &TableOp::AddRow { edge: RowEdge::Bottom })
//!     .unwrap();
//! drop(session);
//! assert_eq!(saved.len(), 1);
//! assert!(saved[0].contains("<tbody>"));
//! ```

use crate::core::options::EditorOptions;
use crate::core::segmenter::{segment_document, Caret, SegmentKind, Segmentation};
use crate::core::table::{TableEditor, TableGrid, TableOp};
use crate::features::embeds;
use crate::features::markdown::Formatting;
use crate::utils::error::{EditorError, EditorResult};
use tracing::debug;

/// Editing session over one document string
pub struct DocumentSession<F>
where
    F: FnMut(&str),
{
    value: String,
    options: EditorOptions,
    on_change: F,
}

impl<F> DocumentSession<F>
where
    F: FnMut(&str),
{
    pub fn new(value: impl Into<String>, options: EditorOptions, on_change: F) -> Self {
        Self {
            value: value.into(),
            options,
            on_change,
        }
    }

    /// Current document, for rendering
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Fresh segmentation of the current document
    pub fn segments(&self) -> Segmentation {
        segment_document(&self.value)
    }

    fn update(&mut self, value: String) -> bool {
        if value == self.value {
            return false;
        }
        self.value = value;
        debug!(len = self.value.len(), "document changed");
        (self.on_change)(&self.value);
        true
    }

    /// Replace the whole document (a keystroke in the host editor)
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        self.update(value.into())
    }

    /// Replace one segment's raw content
    pub fn replace_segment(&mut self, index: usize, replacement: &str) -> EditorResult<bool> {
        let value = self.segments().replace(index, replacement)?;
        Ok(self.update(value))
    }

    /// Insert a snippet at the caret, honoring the configured insert mode.
    /// Returns the absolute offset just past the snippet when it landed.
    pub fn insert(&mut self, caret: Caret, snippet: &str) -> Option<usize> {
        let (value, new_caret) =
            self.segments()
                .insert_with_caret(caret, snippet, self.options.insert_mode);
        self.update(value);
        new_caret
    }

    /// Run a toolbar action at the caret
    pub fn apply_formatting(&mut self, caret: Caret, formatting: Formatting) -> Option<usize> {
        let snippet = formatting.snippet(&self.options);
        self.insert(caret, &snippet)
    }

    fn expect_kind(
        segments: &Segmentation,
        index: usize,
        expected: SegmentKind,
    ) -> EditorResult<String> {
        let segment = segments
            .get(index)
            .ok_or_else(|| EditorError::out_of_range(index, segments.len()))?;
        if segment.kind != expected {
            return Err(EditorError::wrong_kind(
                index,
                expected.as_str(),
                segment.kind.as_str(),
            ));
        }
        Ok(segment.raw.clone())
    }

    /// Open an editing session on the table at segment `index`
    pub fn table_editor(&self, index: usize) -> EditorResult<TableEditor> {
        let raw = Self::expect_kind(&self.segments(), index, SegmentKind::Table)?;
        TableEditor::new(&raw, self.options.clone())
    }

    /// Splice a table's new HTML back into the document
    pub fn commit_table(&mut self, index: usize, html: &str) -> EditorResult<bool> {
        let segments = self.segments();
        Self::expect_kind(&segments, index, SegmentKind::Table)?;
        let value = segments.replace(index, html)?;
        Ok(self.update(value))
    }

    /// Apply a one-shot grid edit to the table at segment `index`
    pub fn apply_table_op(&mut self, index: usize, op: &TableOp) -> EditorResult<bool> {
        let segments = self.segments();
        let raw = Self::expect_kind(&segments, index, SegmentKind::Table)?;
        let mut grid = TableGrid::parse(&raw).ok_or(EditorError::NoTable)?;
        if !grid.apply(op, &self.options) {
            return Ok(false);
        }
        let value = segments.replace(index, &grid.to_html(&self.options))?;
        Ok(self.update(value))
    }

    /// Insert the embed for a pasted URL at the caret
    pub fn insert_embed(&mut self, caret: Caret, url: &str) -> EditorResult<bool> {
        let value = embeds::insert_embed(&self.value, url, caret, self.options.insert_mode)?;
        Ok(self.update(value))
    }

    /// URL to show when the embed at segment `index` is opened for editing
    pub fn embed_url(&self, index: usize) -> EditorResult<String> {
        let segments = self.segments();
        let segment = segments
            .get(index)
            .ok_or_else(|| EditorError::out_of_range(index, segments.len()))?;
        segment
            .embed()
            .map(|e| e.canonical_url())
            .ok_or_else(|| EditorError::wrong_kind(index, "embed", segment.kind.as_str()))
    }

    /// Swap the embed at segment `index` for the one `url` points to.
    /// An invalid URL leaves the document untouched.
    ///
    /// The old block is removed by position, so an identical embed
    /// elsewhere in the document is left alone.
    pub fn replace_embed(&mut self, index: usize, url: &str) -> EditorResult<bool> {
        let segments = self.segments();
        let segment = segments
            .get(index)
            .ok_or_else(|| EditorError::out_of_range(index, segments.len()))?;
        if !segment.kind.is_embed() {
            return Err(EditorError::wrong_kind(index, "embed", segment.kind.as_str()));
        }
        let embed = embeds::parse_embed_url(url)?;
        let removed = segment_document(&segments.remove(index)?);
        let caret = removed.caret_at(segment.span.start);
        debug!(index, ?caret, provider = embed.provider.as_str(), "replacing embed");
        let value = removed.insert(caret, &embeds::embed_snippet(&embed), self.options.insert_mode);
        Ok(self.update(value))
    }

    /// Delete the block at segment `index`
    pub fn remove_block(&mut self, index: usize) -> EditorResult<bool> {
        let segments = self.segments();
        let segment = segments
            .get(index)
            .ok_or_else(|| EditorError::out_of_range(index, segments.len()))?;
        if segment.kind.is_text() {
            return Err(EditorError::wrong_kind(index, "block", "text"));
        }
        let value = segments.remove(index)?;
        Ok(self.update(value))
    }

    pub fn into_value(self) -> String {
        self.value
    }
}
