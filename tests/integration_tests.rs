//! Integration tests for richblocks document editing

use richblocks::{
    diagnostics::check_document,
    edit_table,
    embeds::{insert_embed, parse_embed_url, remove_block},
    segment_document,
    table::{ColumnEdge, RowEdge, TableOp},
    Caret, DocumentSession, EditorError, EditorOptions, Formatting, InsertMode, SegmentKind,
    TableEditor, TableGrid,
};

const YT: &str = r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/dQw4w9WgXcQ" frameborder="0" allowfullscreen></iframe>"#;
const PDF: &str = r#"<iframe src="https://drive.google.com/file/d/1x2y3z/preview" width="640" height="480"></iframe>"#;

fn four_row_table() -> TableGrid {
    let html = "<table><tbody>\
        <tr><td>r0</td></tr><tr><td>r1</td></tr><tr><td>r2</td></tr><tr><td>r3</td></tr>\
        </tbody></table>";
    TableGrid::parse(html).unwrap()
}

fn row_labels(grid: &TableGrid) -> Vec<String> {
    grid.rows().iter().map(|r| r.cells[0].content.clone()).collect()
}

// ============================================================================
// Segmentation
// ============================================================================

mod segmentation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mixed_document_roundtrip() {
        let doc = format!(
            "# Lecture\n\nSee the table:\n<table>\n<tr><th>A</th></tr>\n</table>\n\nVideo:\n{}\nSlides:\n{}\n",
            YT, PDF
        );
        let segments = segment_document(&doc);
        let kinds: Vec<SegmentKind> = segments.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Text,
                SegmentKind::Table,
                SegmentKind::Text,
                SegmentKind::Youtube,
                SegmentKind::Text,
                SegmentKind::Pdf,
                SegmentKind::Text,
            ]
        );
        assert_eq!(segments.assemble(), doc);
        assert_eq!(segments.youtube_embeds(), vec![YT]);
        assert_eq!(segments.pdf_embeds(), vec![PDF]);
    }

    #[test]
    fn test_embed_extraction() {
        let segments = segment_document(&format!("{}{}", YT, PDF));
        assert_eq!(segments.get(1).unwrap().embed().unwrap().id, "dQw4w9WgXcQ");
        assert_eq!(segments.get(3).unwrap().embed().unwrap().id, "1x2y3z");
    }

    #[test]
    fn test_graceful_degradation() {
        let doc = r#"<iframe src="https://vimeo.com/1"></iframe> and <table><tr>"#;
        let segments = segment_document(doc);
        assert_eq!(segments.len(), 1);
        assert!(segments.get(0).unwrap().kind.is_text());
        assert_eq!(segments.assemble(), doc);
    }

    #[test]
    fn test_replace_then_resegment() {
        let doc = format!("a{}b", YT);
        let segments = segment_document(&doc);
        let edited = segments.replace(1, PDF).unwrap();
        assert_eq!(segment_document(&edited).pdf_embeds(), vec![PDF]);
        assert!(matches!(
            segments.replace(9, ""),
            Err(EditorError::SegmentOutOfRange { index: 9, len: 3 })
        ));
    }
}

// ============================================================================
// Table Editing
// ============================================================================

mod table_editing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_canonical_serialization() {
        let grid = TableGrid::parse("<table><tr><th>A</th></tr><tr><td>1</td></tr></table>").unwrap();
        let expected = "<table class=\"rich-table\">\n  <thead>\n    <tr>\n      <th>A</th>\n    </tr>\n  </thead>\n  <tbody>\n    <tr>\n      <td>1</td>\n    </tr>\n  </tbody>\n</table>";
        assert_eq!(grid.to_html(&EditorOptions::default()), expected);
    }

    #[test]
    fn test_header_authority() {
        let html = r#"<table><thead><tr><th style="width: 200px">A</th><th>B</th></tr></thead>
            <tbody><tr><td style="width: 90px">1</td><td style="width: 80px">2</td></tr></tbody></table>"#;
        let out = TableGrid::parse(html).unwrap().to_html(&EditorOptions::default());
        assert!(out.contains(r#"<td style="width: 200px">1</td>"#));
        // Header has no width for column 1: the row keeps its own
        assert!(out.contains(r#"<td style="width: 80px">2</td>"#));
    }

    #[test]
    fn test_reorder_semantics() {
        let mut grid = four_row_table();
        assert!(grid.move_row(2, 0));
        assert_eq!(row_labels(&grid), ["r2", "r0", "r1", "r3"]);

        let mut grid = four_row_table();
        assert!(grid.move_row(0, 3));
        assert_eq!(row_labels(&grid), ["r1", "r2", "r3", "r0"]);

        let mut grid = four_row_table();
        assert!(grid.drop_row(0, 3));
        assert_eq!(row_labels(&grid), ["r1", "r2", "r0", "r3"]);
    }

    #[test]
    fn test_floor_enforcement() {
        let mut grid = TableGrid::with_size(1, 1, false);
        assert!(!grid.delete_row(0));
        assert!(!grid.delete_column(0));
        assert_eq!((grid.row_count(), grid.column_count()), (1, 1));
    }

    #[test]
    fn test_resize_drag_commits_once() {
        let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></table>";
        let mut editor = TableEditor::new(html, EditorOptions::default()).unwrap();
        assert!(editor.begin_resize(0, 100.0));
        assert!(editor.update_resize(110.0));
        assert!(editor.update_resize(125.0));
        let out = editor.end_resize().unwrap();
        assert_eq!(out.matches("width: 175px").count(), 3);

        assert!(editor.begin_resize(1, 0.0));
        editor.update_resize(-500.0);
        let out = editor.end_resize().unwrap();
        assert_eq!(out.matches("width: 50px").count(), 3);
    }

    #[test]
    fn test_cell_edit_commit_on_blur() {
        let mut editor =
            TableEditor::new("<table><tr><td>a</td><td>b</td></tr></table>", EditorOptions::default())
                .unwrap();
        assert_eq!(editor.begin_edit(0, 0).unwrap(), None);
        editor.update_draft("alpha");
        // Clicking another cell commits the first
        let committed = editor.begin_edit(0, 1).unwrap().unwrap();
        assert!(committed.contains("<td>alpha</td>"));
        editor.update_draft("discarded");
        editor.cancel_edit();
        assert_eq!(editor.grid().cell(0, 1).unwrap().content, "b");
        assert!(editor.begin_edit(3, 3).is_err());
    }

    #[test]
    fn test_edit_table_in_document() {
        let doc = "Before\n<table><tr><td>x</td></tr></table>\nAfter";
        let opts = EditorOptions::default();
        let doc = edit_table(doc, 1, &TableOp::AddRow { edge: RowEdge::Bottom }, &opts).unwrap();
        let doc = edit_table(doc.as_str(), 1, &TableOp::AddColumn { edge: ColumnEdge::Left }, &opts)
            .unwrap();
        let grid = TableGrid::parse(segment_document(&doc).tables()[0]).unwrap();
        assert_eq!((grid.row_count(), grid.column_count()), (2, 2));
        assert_eq!(grid.cell(0, 1).unwrap().content, "x");
        assert!(doc.starts_with("Before\n") && doc.ends_with("\nAfter"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_table_op_json() {
        let op: TableOp = serde_json::from_str(r#"{"op":"resize_column","column":1,"delta":-20.0}"#)
            .unwrap();
        assert_eq!(op, TableOp::ResizeColumn { column: 1, delta: -20.0 });
        let op: TableOp = serde_json::from_str(r#"{"op":"add_row","edge":"top"}"#).unwrap();
        assert_eq!(op, TableOp::AddRow { edge: RowEdge::Top });
    }
}

// ============================================================================
// Embeds
// ============================================================================

mod embeds {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pasted_url_to_iframe() {
        let embed = parse_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").unwrap();
        let html = embed.to_html();
        let segments = segment_document(&html);
        assert_eq!(segments.youtube_embeds(), vec![html.as_str()]);
    }

    #[test]
    fn test_invalid_url_message() {
        let err = parse_embed_url("https://example.com/video").unwrap_err();
        assert_eq!(
            err.user_message(),
            "Please enter a valid YouTube or Google Drive URL"
        );
    }

    #[test]
    fn test_exact_substring_removal() {
        let doc = format!("a\n{}\nb", PDF);
        assert_eq!(remove_block(&doc, PDF), "a\n\nb");
        let reformatted = PDF.replace("\" width", "\"  width");
        assert_eq!(remove_block(&doc, &reformatted), doc);
    }

    #[test]
    fn test_insert_embed_at_caret_in_later_run() {
        let doc = format!("one{}two", YT);
        let out = insert_embed(
            &doc,
            "https://drive.google.com/file/d/abc/view",
            Caret::new(2, 3),
            InsertMode::Caret,
        )
        .unwrap();
        assert!(out.ends_with("two\n<iframe src=\"https://drive.google.com/file/d/abc/preview\" width=\"640\" height=\"480\" allow=\"autoplay\"></iframe>\n"));
    }
}

// ============================================================================
// Sessions
// ============================================================================

mod sessions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_reports_every_change() {
        let mut history: Vec<String> = Vec::new();
        {
            let mut session =
                DocumentSession::new("Notes", EditorOptions::default(), |v: &str| {
                    history.push(v.to_string())
                });
            session.apply_formatting(Caret::new(0, 5), Formatting::Table);
            session
                .apply_table_op(1, &TableOp::DeleteRow { index: 2 })
                .unwrap();
            session
                .insert_embed(Caret::new(2, 0), "https://youtu.be/xyz")
                .unwrap();
        }
        assert_eq!(history.len(), 3);
        let last = segment_document(history.last().unwrap());
        assert_eq!(last.tables().len(), 1);
        assert_eq!(last.youtube_embeds().len(), 1);
        assert_eq!(TableGrid::parse(last.tables()[0]).unwrap().row_count(), 2);
    }

    #[test]
    fn test_legacy_insert_mode() {
        let doc = format!("top{}bottom", YT);
        let mut session = DocumentSession::new(doc, EditorOptions::legacy(), |_: &str| {});
        session.insert(Caret::new(2, 6), "!");
        assert!(session.value().starts_with("top!<iframe"));
        assert!(session.value().ends_with("bottom"));
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

mod diagnostics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_degraded_blocks_are_reported() {
        let doc = "x\n<iframe src=\"https://vimeo.com/1\"></iframe>\n<table><tr><td>1</td></tr>";
        let result = check_document(doc);
        assert_eq!(result.infos, 1);
        assert_eq!(result.warnings, 1);
        assert_eq!(result.diagnostics[0].line, Some(2));
        assert_eq!(result.diagnostics[1].line, Some(3));
    }

    #[test]
    fn test_recognized_blocks_are_clean() {
        let doc = format!("{}\n{}", YT, PDF);
        assert!(check_document(&doc).is_empty());
    }
}
