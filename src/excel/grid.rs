//! In-memory sheet grid with merged-range navigation.
//!
//! The loader flattens a worksheet into text cells addressed by absolute
//! 0-based coordinates plus the list of merged spans. Everything the
//! parser needs from the spreadsheet goes through this type, so tests can
//! build grids directly without a workbook on disk.

use crate::error::ParseError;

/// Column holding the weekday label, written once per day block.
pub const WEEKDAY_COL: u32 = 0;
/// Column holding the period number, vertically merged per period.
pub const PERIOD_COL: u32 = 1;
/// Column holding the "I"/"II" week parity marker.
pub const PARITY_COL: u32 = 4;
/// Row holding the group codes.
pub const GROUP_ROW: u32 = 1;
/// Row scanned for teacher-column labels.
pub const HEADER_ROW: u32 = 2;

/// One merged cell range. The anchor (top-left cell) owns the value; the
/// remaining cells are continuations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeSpan {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl MergeSpan {
    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    fn is_anchor(&self, row: u32, col: u32) -> bool {
        row == self.first_row && col == self.first_col
    }
}

pub struct SheetGrid {
    cells: Vec<Vec<Option<String>>>,
    merges: Vec<MergeSpan>,
}

impl SheetGrid {
    /// Rows may be ragged; absent trailing cells read as empty.
    pub fn new(cells: Vec<Vec<Option<String>>>, merges: Vec<MergeSpan>) -> Self {
        Self { cells, merges }
    }

    pub fn height(&self) -> u32 {
        self.cells.len() as u32
    }

    /// The cell's own text, if any. Merge continuations and empty cells
    /// both read as `None`.
    pub fn value(&self, row: u32, col: u32) -> Option<&str> {
        self.cells
            .get(row as usize)?
            .get(col as usize)?
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    /// Whether the cell belongs to a merged range without being its anchor.
    pub fn is_continuation(&self, row: u32, col: u32) -> bool {
        self.merges
            .iter()
            .any(|span| span.contains(row, col) && !span.is_anchor(row, col))
    }

    /// Walk upward from `row` through merge continuations to the row that
    /// owns the value. Walking past the top of the sheet means the merged
    /// range has no anchor, which is malformed input.
    pub fn anchor_row(&self, row: u32, col: u32) -> Result<u32, ParseError> {
        let mut current = row;
        while self.is_continuation(current, col) {
            if current == 0 {
                return Err(ParseError::UnboundedMergeWalk { row, col });
            }
            current -= 1;
        }
        Ok(current)
    }

    /// The value a cell reports once vertical merges are resolved.
    pub fn effective_value(&self, row: u32, col: u32) -> Result<Option<&str>, ParseError> {
        Ok(self.value(self.anchor_row(row, col)?, col))
    }

    /// Columns holding teacher names: for every header cell exactly equal
    /// to `label`, the column immediately to its left, in sheet order.
    pub fn teacher_columns(&self, label: &str) -> Vec<u32> {
        let Some(header) = self.cells.get(HEADER_ROW as usize) else {
            return Vec::new();
        };

        header
            .iter()
            .enumerate()
            .filter(|(_, value)| value.as_deref() == Some(label))
            .filter_map(|(col, _)| (col as u32).checked_sub(1))
            .collect()
    }
}
