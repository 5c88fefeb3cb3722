//! Interactive table editing session
//!
//! Wraps a [`TableGrid`] with the transient state a pointer-driven editor
//! needs: the one cell being edited, an active column resize, and a row
//! being dragged. Every method that commits a change returns the freshly
//! serialized HTML; `None` means nothing was committed.

use super::{resized_width, ColumnEdge, RowEdge, TableGrid, TableOp};
use crate::core::options::EditorOptions;
use crate::core::table::cell::format_px;
use crate::utils::error::{EditorError, EditorResult};
use tracing::{debug, trace};

/// Per-grid cell editing state. At most one cell edits at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellEditState {
    #[default]
    Viewing,
    Editing {
        row: usize,
        column: usize,
        draft: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeDrag {
    column: usize,
    start_x: f64,
    start_width: f64,
}

/// Editing session over one table fragment
#[derive(Debug, Clone)]
pub struct TableEditor {
    grid: TableGrid,
    options: EditorOptions,
    edit: CellEditState,
    resize: Option<ResizeDrag>,
    dragged_row: Option<usize>,
}

impl TableEditor {
    /// Start a session on a table fragment
    pub fn new(html: &str, options: EditorOptions) -> EditorResult<Self> {
        let grid = TableGrid::parse(html).ok_or(EditorError::NoTable)?;
        Ok(Self::from_grid(grid, options))
    }

    pub fn from_grid(grid: TableGrid, options: EditorOptions) -> Self {
        Self {
            grid,
            options,
            edit: CellEditState::Viewing,
            resize: None,
            dragged_row: None,
        }
    }

    pub fn grid(&self) -> &TableGrid {
        &self.grid
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Current serialized form
    pub fn html(&self) -> String {
        self.grid.to_html(&self.options)
    }

    fn commit(&self, changed: bool) -> Option<String> {
        changed.then(|| self.html())
    }

    pub fn add_row(&mut self, edge: RowEdge) -> Option<String> {
        let changed = self.grid.add_row(edge);
        self.commit(changed)
    }

    pub fn add_column(&mut self, edge: ColumnEdge) -> Option<String> {
        let changed = self.grid.add_column(edge);
        self.commit(changed)
    }

    pub fn delete_row(&mut self, index: usize) -> Option<String> {
        let changed = self.grid.delete_row(index);
        if changed {
            self.forget_edit_outside_grid();
        }
        self.commit(changed)
    }

    pub fn delete_column(&mut self, index: usize) -> Option<String> {
        let changed = self.grid.delete_column(index);
        if changed {
            self.forget_edit_outside_grid();
        }
        self.commit(changed)
    }

    /// Apply a one-shot edit
    pub fn apply(&mut self, op: &TableOp) -> Option<String> {
        let changed = self.grid.apply(op, &self.options);
        if changed {
            self.forget_edit_outside_grid();
        }
        self.commit(changed)
    }

    // A structural edit can remove the cell under edit
    fn forget_edit_outside_grid(&mut self) {
        if let CellEditState::Editing { row, column, .. } = self.edit {
            if self.grid.cell(row, column).is_none() {
                self.edit = CellEditState::Viewing;
            }
        }
    }

    // ------------------------------------------------------------------
    // Column resize
    // ------------------------------------------------------------------

    /// Pointer pressed on `column`'s resize handle at `pointer_x`
    pub fn begin_resize(&mut self, column: usize, pointer_x: f64) -> bool {
        if column >= self.grid.column_count() || !pointer_x.is_finite() {
            return false;
        }
        let start_width = self.grid.column_width_px(column, &self.options);
        self.resize = Some(ResizeDrag {
            column,
            start_x: pointer_x,
            start_width,
        });
        debug!(column, start_width, "resize started");
        true
    }

    /// Pointer moved during a resize. Updates every row's width for the
    /// column without serializing.
    pub fn update_resize(&mut self, pointer_x: f64) -> bool {
        let Some(drag) = self.resize else {
            return false;
        };
        let Some(width) = resized_width(drag.start_width, pointer_x - drag.start_x, &self.options)
        else {
            return false;
        };
        trace!(column = drag.column, width, "resize sample");
        self.grid.set_column_width(drag.column, format_px(width))
    }

    /// Pointer released; commits the resize
    pub fn end_resize(&mut self) -> Option<String> {
        let drag = self.resize.take()?;
        debug!(
            column = drag.column,
            width = ?self.grid.column_width(drag.column),
            "resize committed"
        );
        Some(self.html())
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    // ------------------------------------------------------------------
    // Row drag-and-drop
    // ------------------------------------------------------------------

    pub fn begin_row_drag(&mut self, row: usize) -> bool {
        if row >= self.grid.row_count() {
            return false;
        }
        self.dragged_row = Some(row);
        true
    }

    /// Drop the dragged row onto `target`
    pub fn drop_row_on(&mut self, target: usize) -> Option<String> {
        let from = self.dragged_row.take()?;
        let changed = self.grid.drop_row(from, target);
        self.commit(changed)
    }

    pub fn cancel_row_drag(&mut self) {
        self.dragged_row = None;
    }

    pub fn dragged_row(&self) -> Option<usize> {
        self.dragged_row
    }

    // ------------------------------------------------------------------
    // Cell editing
    // ------------------------------------------------------------------

    pub fn edit_state(&self) -> &CellEditState {
        &self.edit
    }

    pub fn is_editing(&self, row: usize, column: usize) -> bool {
        matches!(self.edit, CellEditState::Editing { row: r, column: c, .. } if r == row && c == column)
    }

    /// Click on a cell. A cell already under edit elsewhere loses focus
    /// first, which commits it; that commit's HTML is returned.
    pub fn begin_edit(&mut self, row: usize, column: usize) -> EditorResult<Option<String>> {
        let content = self
            .grid
            .cell(row, column)
            .ok_or(EditorError::CellOutOfRange { row, column })?
            .content
            .clone();
        if self.is_editing(row, column) {
            return Ok(None);
        }
        let committed = self.commit_edit();
        self.edit = CellEditState::Editing {
            row,
            column,
            draft: content,
        };
        Ok(committed)
    }

    /// Replace the staged text of the cell under edit
    pub fn update_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.edit {
            CellEditState::Editing { draft, .. } => {
                *draft = text.into();
                true
            }
            CellEditState::Viewing => false,
        }
    }

    /// Blur or Enter: write the draft into the grid
    pub fn commit_edit(&mut self) -> Option<String> {
        match std::mem::take(&mut self.edit) {
            CellEditState::Editing { row, column, draft } => {
                let changed = self.grid.set_cell(row, column, draft);
                self.commit(changed)
            }
            CellEditState::Viewing => None,
        }
    }

    /// Escape: drop the draft, grid untouched
    pub fn cancel_edit(&mut self) {
        self.edit = CellEditState::Viewing;
    }

    pub fn into_grid(self) -> TableGrid {
        self.grid
    }
}
