//! Monospace grid text layout: the native-selection provider for terminals
//! and tests.

use crate::mention::position::{NativeRange, NativeSelection, Rect};
use crate::model::{BlockKey, Document, EditorState};

/// Produces the platform selection for a committed document.
pub trait TextLayout {
    type Selection: NativeSelection;

    fn native_selection(&self, document: &Document) -> Self::Selection;
}

/// Cell geometry of a monospace text area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_width: f64,
    pub line_height: f64,
    /// Chars per row before wrapping
    pub columns: usize,
}

impl GridMetrics {
    /// One unit per cell, as in a terminal.
    pub fn cells(origin_x: u16, origin_y: u16, columns: u16) -> Self {
        Self {
            origin_x: f64::from(origin_x),
            origin_y: f64::from(origin_y),
            cell_width: 1.0,
            line_height: 1.0,
            columns: usize::from(columns),
        }
    }

    fn columns(&self) -> usize {
        self.columns.max(1)
    }

    /// Rows taken by a block of `len` chars. The extra row leaves room for a
    /// caret after the last char.
    pub fn rows_for(&self, len: usize) -> usize {
        len / self.columns() + 1
    }

    fn x(&self, col: usize) -> f64 {
        self.origin_x + col as f64 * self.cell_width
    }

    fn y(&self, row: usize) -> f64 {
        self.origin_y + row as f64 * self.line_height
    }
}

/// Lays out each block from a fresh row, wrapping at `metrics.columns`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub metrics: GridMetrics,
}

impl GridLayout {
    pub fn new(metrics: GridMetrics) -> Self {
        Self { metrics }
    }

    /// Screen cell `(row, col)` of a char offset in the block at `block_index`.
    pub fn cell_of(&self, document: &Document, block_index: usize, offset: usize) -> (usize, usize) {
        let block_row: usize = document.blocks()[..block_index]
            .iter()
            .map(|block| self.metrics.rows_for(block.char_len()))
            .sum();
        let columns = self.metrics.columns();
        (block_row + offset / columns, offset % columns)
    }

    fn block_row(&self, document: &Document, block_index: usize) -> usize {
        self.cell_of(document, block_index, 0).0
    }
}

impl TextLayout for GridLayout {
    type Selection = GridSelection;

    fn native_selection(&self, document: &Document) -> GridSelection {
        let selection = document.selection();
        if !selection.has_focus {
            return GridSelection { ranges: Vec::new() };
        }

        let index_of = |key: &BlockKey| document.blocks().iter().position(|block| block.key() == key);
        let (Some(anchor), Some(focus)) = (
            index_of(&selection.anchor_key),
            index_of(&selection.focus_key),
        ) else {
            return GridSelection { ranges: Vec::new() };
        };

        // Ranges run in document order regardless of selection direction
        let ((start_block, start), (end_block, end)) =
            if (anchor, selection.anchor_offset) <= (focus, selection.focus_offset) {
                ((anchor, selection.anchor_offset), (focus, selection.focus_offset))
            } else {
                ((focus, selection.focus_offset), (anchor, selection.anchor_offset))
            };

        let container_start = document
            .block_tree(document.blocks()[start_block].key())
            .and_then(|tree| tree.range_at(start))
            .map(|range| range.start)
            .unwrap_or(0);

        GridSelection {
            ranges: vec![GridRange {
                metrics: self.metrics,
                block_row: self.block_row(document, start_block),
                container_start,
                start,
                end_cell: self.cell_of(document, end_block, end),
            }],
        }
    }
}

/// Native selection over a [`GridLayout`]: zero or one range.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSelection {
    ranges: Vec<GridRange>,
}

impl NativeSelection for GridSelection {
    type Range = GridRange;

    fn range_count(&self) -> usize {
        self.ranges.len()
    }

    fn range_at(&self, index: usize) -> Option<&GridRange> {
        self.ranges.get(index)
    }
}

/// A range whose start sits inside one span-tree range (its container) and
/// whose end is a fixed screen cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRange {
    metrics: GridMetrics,
    block_row: usize,
    container_start: usize,
    /// Start offset within the block
    start: usize,
    end_cell: (usize, usize),
}

impl GridRange {
    fn start_cell(&self) -> (usize, usize) {
        let columns = self.metrics.columns();
        (self.block_row + self.start / columns, self.start % columns)
    }
}

impl NativeRange for GridRange {
    fn set_start_in_container(&mut self, offset: usize) {
        self.start = self.container_start + offset;
        // A start moved past the end collapses the range onto the start
        let start_cell = self.start_cell();
        if start_cell > self.end_cell {
            self.end_cell = start_cell;
        }
    }

    fn bounding_rect(&self) -> Rect {
        let m = &self.metrics;
        let (start_row, start_col) = self.start_cell();
        let (end_row, end_col) = self.end_cell;

        if start_row == end_row {
            Rect {
                top: m.y(start_row),
                left: m.x(start_col.min(end_col)),
                bottom: m.y(start_row + 1),
                right: m.x(start_col.max(end_col)),
            }
        } else {
            Rect {
                top: m.y(start_row.min(end_row)),
                left: m.x(0),
                bottom: m.y(start_row.max(end_row) + 1),
                right: m.x(m.columns()),
            }
        }
    }
}
