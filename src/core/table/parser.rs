//! HTML table fragment parser
//!
//! The first complete `<table>` is located with the byte scanner, then that
//! slice goes through `scraper` (html5ever) for its structure. Section
//! handling follows what hand-written and editor-generated tables actually
//! contain:
//!
//! 1. `<thead>` rows become header rows
//! 2. `<tbody>` rows become data rows, except a row with only `<th>` cells,
//!    which keeps them as header cells
//! 3. With neither section written, every `<tr>` is read directly and its
//!    `<th>` cells are collected ahead of its `<td>` cells
//!
//! html5ever wraps bare rows in an implicit `<tbody>`, so whether sections
//! were written is decided from the source text, not from the tree.

use super::cell::{width_from_style, GridCell, GridRow};
use crate::utils::html::{Element, TagScanner};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use std::ops::Range;
use tracing::trace;

lazy_static! {
    static ref TABLE_SELECTOR: Selector =
        Selector::parse("table").expect("hardcoded selector 'table' is valid");
}

/// Parse the first `<table>` in `html` into rows.
///
/// Returns `None` when there is no complete table or it has no cells.
pub fn parse_rows(html: &str) -> Option<Vec<GridRow>> {
    let scanner = TagScanner::new(html);
    let table = scanner.find_element("table", 0)?;
    let sections_written = has_sections(&scanner, &table);

    let fragment = Html::parse_fragment(table.outer_str(html));
    let root = fragment.select(&TABLE_SELECTOR).next()?;

    let mut rows = Vec::new();
    for section in child_elements(root, &["thead", "tbody"]) {
        let in_head = section.value().name() == "thead";
        for tr in child_elements(section, &["tr"]) {
            let row = if !sections_written {
                parse_headers_first(tr)
            } else if in_head {
                parse_header_row(tr)
            } else {
                parse_body_row(tr)
            };
            rows.push(row);
        }
    }

    if rows.iter().all(GridRow::is_empty) {
        return None;
    }
    trace!(rows = rows.len(), sections_written, "parsed table rows");
    inherit_widths(&mut rows);
    pad_rows(&mut rows);
    Some(rows)
}

/// Whether `<thead>` or `<tbody>` is written in the table itself, ignoring
/// tables nested inside its cells
fn has_sections(scanner: &TagScanner<'_>, table: &Element) -> bool {
    let inner = table.inner.clone();
    let mut nested: Vec<Range<usize>> = Vec::new();
    let mut pos = inner.start;
    while let Some(element) = scanner
        .find_element("table", pos)
        .filter(|e| e.outer.end <= inner.end)
    {
        pos = element.outer.end;
        nested.push(element.outer);
    }

    ["thead", "tbody"].iter().any(|name| {
        let mut pos = inner.start;
        while let Some(start) = scanner.find_open(name, pos).filter(|s| *s < inner.end) {
            if !nested.iter().any(|range| range.contains(&start)) {
                return true;
            }
            pos = start + 1;
        }
        false
    })
}

/// Direct element children named any of `names`, in document order
fn child_elements<'a>(
    parent: ElementRef<'a>,
    names: &'static [&'static str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| names.iter().any(|name| *name == e.value().name()))
}

fn cell_from(element: ElementRef<'_>, is_header: bool) -> GridCell {
    GridCell {
        content: element.inner_html(),
        is_header,
        width: element.value().attr("style").and_then(width_from_style),
    }
}

/// Rows inside `<thead>`: every cell is a header cell
fn parse_header_row(tr: ElementRef<'_>) -> GridRow {
    GridRow::new(
        child_elements(tr, &["th", "td"])
            .map(|e| cell_from(e, true))
            .collect(),
    )
}

/// Rows inside `<tbody>`: `<td>` cells, or `<th>` cells when there are none
fn parse_body_row(tr: ElementRef<'_>) -> GridRow {
    let data: Vec<GridCell> = child_elements(tr, &["td"])
        .map(|e| cell_from(e, false))
        .collect();
    if !data.is_empty() {
        return GridRow::new(data);
    }
    GridRow::new(
        child_elements(tr, &["th"])
            .map(|e| cell_from(e, true))
            .collect(),
    )
}

/// Bare `<tr>` rows: `<th>` cells first, then `<td>` cells
fn parse_headers_first(tr: ElementRef<'_>) -> GridRow {
    let (headers, data): (Vec<_>, Vec<_>) = child_elements(tr, &["th", "td"])
        .map(|e| cell_from(e, e.value().name() == "th"))
        .partition(|cell| cell.is_header);
    GridRow::new(headers.into_iter().chain(data).collect())
}

/// Row 0's width is the column's canonical width for rows that set none
fn inherit_widths(rows: &mut [GridRow]) {
    let Some((first, rest)) = rows.split_first_mut() else {
        return;
    };
    for row in rest {
        for (cell, canonical) in row.cells.iter_mut().zip(&first.cells) {
            if cell.width.is_none() {
                cell.width = canonical.width.clone();
            }
        }
    }
}

/// Pad ragged rows with empty cells so the grid starts rectangular
fn pad_rows(rows: &mut [GridRow]) {
    let columns = rows.iter().map(GridRow::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        let is_header = row.cells.first().map(|c| c.is_header).unwrap_or(false);
        while row.cells.len() < columns {
            row.cells.push(GridCell::empty(is_header));
        }
    }
}

/// Number of cells in each row as written, before padding
pub fn raw_row_lengths(html: &str) -> Vec<usize> {
    let scanner = TagScanner::new(html);
    let Some(table) = scanner.find_element("table", 0) else {
        return Vec::new();
    };
    let fragment = Html::parse_fragment(table.outer_str(html));
    let Some(root) = fragment.select(&TABLE_SELECTOR).next() else {
        return Vec::new();
    };
    child_elements(root, &["thead", "tbody"])
        .flat_map(|section| child_elements(section, &["tr"]))
        .map(|tr| child_elements(tr, &["th", "td"]).count())
        .collect()
}
