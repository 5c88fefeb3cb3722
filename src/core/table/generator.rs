//! HTML table generator
//!
//! Row 0 decides the layout: when it holds any header cell it is emitted as
//! `<thead>` and its widths become the canonical column widths for every
//! other row.

use super::cell::{GridCell, GridRow};
use crate::core::options::EditorOptions;
use crate::utils::html::escape_attribute;

/// Serialize rows to an HTML table fragment
pub fn generate(rows: &[GridRow], options: &EditorOptions) -> String {
    let indent = options.indent.as_str();
    let mut out = format!(
        "<table class=\"{}\">\n",
        escape_attribute(&options.table_class)
    );

    match rows.split_first() {
        Some((first, rest)) if first.has_header_cell() => {
            open_section(&mut out, indent, "thead");
            write_row(&mut out, indent, first, None);
            close_section(&mut out, indent, "thead");
            if !rest.is_empty() {
                open_section(&mut out, indent, "tbody");
                for row in rest {
                    write_row(&mut out, indent, row, Some(first));
                }
                close_section(&mut out, indent, "tbody");
            }
        }
        _ => {
            open_section(&mut out, indent, "tbody");
            for row in rows {
                write_row(&mut out, indent, row, None);
            }
            close_section(&mut out, indent, "tbody");
        }
    }

    out.push_str("</table>");
    out
}

fn open_section(out: &mut String, indent: &str, name: &str) {
    out.push_str(&format!("{}<{}>\n", indent, name));
}

fn close_section(out: &mut String, indent: &str, name: &str) {
    out.push_str(&format!("{}</{}>\n", indent, name));
}

/// Write one `<tr>`; `canonical` is the header row whose widths win
fn write_row(out: &mut String, indent: &str, row: &GridRow, canonical: Option<&GridRow>) {
    out.push_str(&format!("{}<tr>\n", indent.repeat(2)));
    for (column, cell) in row.cells.iter().enumerate() {
        let width = canonical
            .and_then(|header| header.cells.get(column))
            .and_then(|header_cell| header_cell.width.as_deref())
            .or(cell.width.as_deref());
        write_cell(out, indent, cell, width);
    }
    out.push_str(&format!("{}</tr>\n", indent.repeat(2)));
}

fn write_cell(out: &mut String, indent: &str, cell: &GridCell, width: Option<&str>) {
    let tag = cell.tag().as_str();
    match width {
        Some(w) => out.push_str(&format!(
            "{}<{} style=\"width: {}\">{}</{}>\n",
            indent.repeat(3),
            tag,
            escape_attribute(w),
            cell.content,
            tag
        )),
        None => out.push_str(&format!(
            "{}<{}>{}</{}>\n",
            indent.repeat(3),
            tag,
            cell.content,
            tag
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_layout() {
        let rows = vec![
            GridRow::new(vec![
                GridCell::header("Name").with_width("120px"),
                GridCell::header("Qty"),
            ]),
            GridRow::new(vec![GridCell::new("Pens").with_width("90px"), GridCell::new("3")]),
        ];
        let html = generate(&rows, &EditorOptions::default());
        assert_eq!(
            html,
            "<table class=\"rich-table\">\n  <thead>\n    <tr>\n      <th style=\"width: 120px\">Name</th>\n      <th>Qty</th>\n    </tr>\n  </thead>\n  <tbody>\n    <tr>\n      <td style=\"width: 120px\">Pens</td>\n      <td>3</td>\n    </tr>\n  </tbody>\n</table>"
        );
    }

    #[test]
    fn test_header_only_has_no_tbody() {
        let rows = vec![GridRow::new(vec![GridCell::header("A")])];
        let html = generate(&rows, &EditorOptions::default());
        assert!(html.contains("<thead>"));
        assert!(!html.contains("<tbody>"));
    }

    #[test]
    fn test_no_header_uses_own_widths() {
        let rows = vec![
            GridRow::new(vec![GridCell::new("a").with_width("100px")]),
            GridRow::new(vec![GridCell::new("b").with_width("60px")]),
        ];
        let html = generate(&rows, &EditorOptions::default());
        assert!(!html.contains("<thead>"));
        assert!(html.contains("<td style=\"width: 100px\">a</td>"));
        assert!(html.contains("<td style=\"width: 60px\">b</td>"));
    }

    #[test]
    fn test_custom_class_and_indent() {
        let options = EditorOptions {
            indent: "\t".to_string(),
            ..EditorOptions::default().with_table_class("grid")
        };
        let rows = vec![GridRow::new(vec![GridCell::new("x")])];
        let html = generate(&rows, &options);
        assert!(html.starts_with("<table class=\"grid\">\n\t<tbody>\n\t\t<tr>\n\t\t\t<td>x</td>"));
    }
}
