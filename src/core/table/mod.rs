//! Table grid editing
//!
//! A [`TableGrid`] is the rectangular model of one `<table>` fragment.
//! Structural edits return `true` when they changed the grid; refused edits
//! (the one-row and one-column floors, out-of-range indices) return `false`
//! and leave the grid untouched.
//!
//! ```rust
//! use richblocks::table::{RowEdge, TableGrid};
//! use richblocks::EditorOptions;
//!
//! let mut grid = TableGrid::parse("<table><tr><th>A</th></tr><tr><td>1</td></tr></table>").unwrap();
//! grid.add_row(RowEdge::Bottom);
//! assert_eq!(grid.row_count(), 3);
//! assert!(grid.to_html(&EditorOptions::default()).contains("<thead>"));
//! ```

pub mod cell;
pub mod editor;
pub mod generator;
pub mod parser;


pub use cell::{format_px, parse_px, width_from_style, CellTag, GridCell, GridRow};
pub use editor::{CellEditState, TableEditor};

use crate::core::options::EditorOptions;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Edge for a new row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RowEdge {
    Top,
    Bottom,
}

/// Edge for a new column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColumnEdge {
    Left,
    Right,
}

/// One committed grid edit, as sent by the CLI and WASM layers
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum TableOp {
    AddRow { edge: RowEdge },
    AddColumn { edge: ColumnEdge },
    DeleteRow { index: usize },
    DeleteColumn { index: usize },
    /// Move a row so it ends up at `to`
    MoveRow { from: usize, to: usize },
    /// Drag-and-drop: drop row `from` onto row `target`
    DropRow { from: usize, target: usize },
    /// Grow or shrink a column by `delta` pixels
    ResizeColumn { column: usize, delta: f64 },
    SetCell {
        row: usize,
        column: usize,
        content: String,
    },
}

/// Rectangular grid parsed from one table fragment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableGrid {
    rows: Vec<GridRow>,
}

impl TableGrid {
    /// Parse the first `<table>` in `html`; `None` when there is none
    pub fn parse(html: &str) -> Option<Self> {
        parser::parse_rows(html).map(|rows| Self { rows })
    }

    /// Build a grid from rows, padding ragged rows with empty cells
    pub fn from_rows(mut rows: Vec<GridRow>) -> Self {
        let columns = rows.iter().map(GridRow::len).max().unwrap_or(0);
        for row in &mut rows {
            let is_header = row.cells.first().map(|c| c.is_header).unwrap_or(false);
            row.cells.resize(columns, GridCell::empty(is_header));
        }
        Self { rows }
    }

    /// Empty `rows` x `columns` grid; the first row is a header row when
    /// `header` is set
    pub fn with_size(rows: usize, columns: usize, header: bool) -> Self {
        let rows = (0..rows)
            .map(|i| GridRow::empty(columns, header && i == 0))
            .collect();
        Self { rows }
    }

    /// Serialize to HTML
    pub fn to_html(&self, options: &EditorOptions) -> String {
        generator::generate(&self.rows, options)
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(GridRow::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&GridCell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    /// Whether row 0 is the header row
    pub fn has_header_row(&self) -> bool {
        self.rows.first().map(GridRow::has_header_cell).unwrap_or(false)
    }

    /// Row 0's width for `column`
    pub fn column_width(&self, column: usize) -> Option<&str> {
        self.cell(0, column).and_then(|c| c.width.as_deref())
    }

    /// Width in pixels a resize of `column` starts from
    pub fn column_width_px(&self, column: usize, options: &EditorOptions) -> f64 {
        self.cell(0, column)
            .and_then(GridCell::width_px)
            .unwrap_or(options.default_column_width as f64)
    }

    /// Whether every row has the same number of cells
    pub fn is_rectangular(&self) -> bool {
        let columns = self.column_count();
        self.rows.iter().all(|r| r.len() == columns)
    }

    /// Insert an empty data row. No-op on an empty grid.
    pub fn add_row(&mut self, edge: RowEdge) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        let row = GridRow::empty(self.column_count(), false);
        match edge {
            RowEdge::Top => self.rows.insert(0, row),
            RowEdge::Bottom => self.rows.push(row),
        }
        debug!(?edge, rows = self.rows.len(), "added row");
        true
    }

    /// Insert an empty cell into every row. Each new cell is a header cell
    /// when its row's first cell is.
    pub fn add_column(&mut self, edge: ColumnEdge) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        for row in &mut self.rows {
            let is_header = row.cells.first().map(|c| c.is_header).unwrap_or(false);
            let cell = GridCell::empty(is_header);
            match edge {
                ColumnEdge::Left => row.cells.insert(0, cell),
                ColumnEdge::Right => row.cells.push(cell),
            }
        }
        debug!(?edge, columns = self.column_count(), "added column");
        true
    }

    /// Remove row `index`; refused on the last remaining row
    pub fn delete_row(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            debug!(index, rows = self.rows.len(), "row delete refused");
            return false;
        }
        self.rows.remove(index);
        true
    }

    /// Remove column `index` from every row; refused on the last column
    pub fn delete_column(&mut self, index: usize) -> bool {
        let columns = self.column_count();
        if columns <= 1 || index >= columns {
            debug!(index, columns, "column delete refused");
            return false;
        }
        for row in &mut self.rows {
            row.cells.remove(index);
        }
        true
    }

    /// Move row `from` so that it ends up at position `to`
    pub fn move_row(&mut self, from: usize, to: usize) -> bool {
        let len = self.rows.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let row = self.rows.remove(from);
        self.rows.insert(to, row);
        true
    }

    /// Drop row `from` onto row `target`: the row is inserted before the
    /// target, so a downward move lands at `target - 1` once the source
    /// has been removed.
    pub fn drop_row(&mut self, from: usize, target: usize) -> bool {
        let len = self.rows.len();
        if from == target || from >= len || target >= len {
            return false;
        }
        let insert_at = if from < target { target - 1 } else { target };
        let row = self.rows.remove(from);
        self.rows.insert(insert_at, row);
        insert_at != from
    }

    /// Set every row's width for `column`
    pub fn set_column_width(&mut self, column: usize, width: impl Into<String>) -> bool {
        if column >= self.column_count() {
            return false;
        }
        let width = width.into();
        for row in &mut self.rows {
            row.cells[column].width = Some(width.clone());
        }
        true
    }

    /// Resize `column` by `delta` pixels from its current width, clamped to
    /// the configured minimum. A non-finite delta is refused.
    pub fn resize_column(&mut self, column: usize, delta: f64, options: &EditorOptions) -> bool {
        let start = self.column_width_px(column, options);
        match resized_width(start, delta, options) {
            Some(width) => self.set_column_width(column, format_px(width)),
            None => {
                debug!(column, delta, "refusing non-finite resize");
                false
            }
        }
    }

    /// Replace one cell's content
    pub fn set_cell(&mut self, row: usize, column: usize, content: impl Into<String>) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.cells.get_mut(column)) {
            Some(cell) => {
                let content = content.into();
                if cell.content == content {
                    return false;
                }
                cell.content = content;
                true
            }
            None => false,
        }
    }

    /// Apply one edit
    pub fn apply(&mut self, op: &TableOp, options: &EditorOptions) -> bool {
        let changed = match op {
            TableOp::AddRow { edge } => self.add_row(*edge),
            TableOp::AddColumn { edge } => self.add_column(*edge),
            TableOp::DeleteRow { index } => self.delete_row(*index),
            TableOp::DeleteColumn { index } => self.delete_column(*index),
            TableOp::MoveRow { from, to } => self.move_row(*from, *to),
            TableOp::DropRow { from, target } => self.drop_row(*from, *target),
            TableOp::ResizeColumn { column, delta } => {
                self.resize_column(*column, *delta, options)
            }
            TableOp::SetCell {
                row,
                column,
                content,
            } => self.set_cell(*row, *column, content.as_str()),
        };
        debug!(?op, changed, "applied table op");
        changed
    }
}

/// `max(minimum, start + delta)`, or `None` when that is not a finite width
pub fn resized_width(start: f64, delta: f64, options: &EditorOptions) -> Option<f64> {
    let width = start + delta;
    width
        .is_finite()
        .then(|| width.max(options.min_column_width as f64))
}

/// Parse `html`, apply `op`, and serialize the result.
///
/// The grid is re-serialized even when the op was refused, so the output
/// is always in normalized form.
pub fn apply_to_html(
    html: &str,
    op: &TableOp,
    options: &EditorOptions,
) -> crate::utils::error::EditorResult<String> {
    let mut grid = TableGrid::parse(html).ok_or(crate::utils::error::EditorError::NoTable)?;
    grid.apply(op, options);
    Ok(grid.to_html(options))
}
