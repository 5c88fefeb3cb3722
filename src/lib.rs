//! # richblocks
//!
//! Block-aware editing for Markdown documents that carry raw HTML tables
//! and iframe embeds.
//!
//! ## Features
//!
//! - **Segmentation**: Splits a document into text runs, tables, YouTube
//!   embeds and PDF embeds, losslessly
//! - **Table Editing**: Rectangular grid model with row/column insert,
//!   delete, reorder, resize and in-place cell edits
//! - **Embeds**: Turns pasted YouTube and Google Drive URLs into iframes
//! - **Toolbar**: Markdown formatting snippets inserted at the caret
//! - **Diagnostics**: Explains markup that stays plain text
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Segmenting a Document
//!
//! ```rust
//! use richblocks::{segment_document, SegmentKind};
//!
//! let doc = "Intro\n<table><tr><th>A</th></tr></table>\nOutro";
//! let segments = segment_document(doc);
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments.get(1).unwrap().kind, SegmentKind::Table);
//! assert_eq!(segments.assemble(), doc);
//! ```
//!
//! ### Editing a Table in Place
//!
//! ```rust
//! use richblocks::{edit_table, EditorOptions};
//! use richblocks::table::{ColumnEdge, TableOp};
//!
//! let doc = "<table><tr><th>A</th></tr><tr><td>1</td></tr></table>";
//! let edited = edit_table(
//!     doc,
//!     1,
//!     &TableOp::AddColumn { edge: ColumnEdge::Right },
//!     &EditorOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(edited.matches("<th>").count(), 2);
//! ```

/// Core document model
pub mod core;

/// Feature modules - editing operations
pub mod features;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core modules and types
pub use core::embed;
pub use core::options::{EditorOptions, InsertMode};
pub use core::segmenter;
pub use core::segmenter::{segment_document, Caret, Segment, SegmentKind, Segmentation};
pub use core::table;
pub use core::table::{TableEditor, TableGrid, TableOp};
pub use core::{EmbedProvider, EmbedRef};

// Re-export feature modules
pub use features::embeds;
pub use features::markdown;
pub use features::session;
pub use features::{DocumentSession, Formatting};

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{EditorError, EditorResult};

/// Normalize a table fragment into the editor's canonical HTML
///
/// Returns `None` when `html` holds no table with at least one cell.
pub fn normalize_table(html: &str, options: &EditorOptions) -> Option<String> {
    TableGrid::parse(html).map(|grid| grid.to_html(options))
}

/// Apply a table edit to the table at segment `index` of `doc`
pub fn edit_table(
    doc: &str,
    index: usize,
    op: &TableOp,
    options: &EditorOptions,
) -> EditorResult<String> {
    let segments = segment_document(doc);
    let segment = segments
        .get(index)
        .ok_or_else(|| EditorError::out_of_range(index, segments.len()))?;
    if segment.kind != SegmentKind::Table {
        return Err(EditorError::wrong_kind(
            index,
            SegmentKind::Table.as_str(),
            segment.kind.as_str(),
        ));
    }
    let html = table::apply_to_html(&segment.raw, op, options)?;
    segments.replace(index, &html)
}

/// Iframe HTML for a pasted YouTube or Google Drive URL
pub fn embed_html(url: &str) -> EditorResult<String> {
    embeds::parse_embed_url(url).map(|embed| embed.to_html())
}

/// Insert a snippet at an absolute byte offset, using caret tracking
pub fn insert_at(doc: &str, offset: usize, snippet: &str) -> String {
    let segments = segment_document(doc);
    let caret = segments.caret_at(offset);
    segments.insert(caret, snippet, InsertMode::Caret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_table() {
        let html = normalize_table(
            "<TABLE><TR><TD>1</TD></TR></TABLE>",
            &EditorOptions::default(),
        )
        .unwrap();
        assert!(html.starts_with("<table class=\"rich-table\">"));
        assert!(html.contains("<td>1</td>"));
        assert_eq!(normalize_table("<p>no</p>", &EditorOptions::default()), None);
    }

    #[test]
    fn test_edit_table_rejects_text_segment() {
        let err = edit_table(
            "plain",
            0,
            &TableOp::DeleteRow { index: 0 },
            &EditorOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, EditorError::wrong_kind(0, "table", "text"));
    }

    #[test]
    fn test_edit_table_keeps_surrounding_text() {
        let doc = "a\n<table><tr><td>1</td></tr><tr><td>2</td></tr></table>\nb";
        let out = edit_table(
            doc,
            1,
            &TableOp::MoveRow { from: 1, to: 0 },
            &EditorOptions::default(),
        )
        .unwrap();
        assert!(out.starts_with("a\n<table"));
        assert!(out.ends_with("</table>\nb"));
        assert!(out.find("<td>2</td>").unwrap() < out.find("<td>1</td>").unwrap());
    }

    #[test]
    fn test_embed_html() {
        assert!(embed_html("https://youtu.be/abc")
            .unwrap()
            .contains("https://www.youtube.com/embed/abc"));
        assert!(embed_html("https://example.com").is_err());
    }

    #[test]
    fn test_insert_at() {
        let doc = "ab<table><tr><td>1</td></tr></table>cd";
        let out = insert_at(doc, doc.len() - 1, "X");
        assert!(out.ends_with("</table>cXd"));
        // Inside the table: no-op
        assert_eq!(insert_at(doc, 5, "X"), doc);
    }
}
