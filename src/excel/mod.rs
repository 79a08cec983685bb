//! Workbook loading. The only module that talks to `calamine`; it turns
//! one worksheet into a [`SheetGrid`] the parser can navigate offline.

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use thiserror::Error;

mod grid;

pub use grid::{GROUP_ROW, MergeSpan, PARITY_COL, PERIOD_COL, SheetGrid, WEEKDAY_COL};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
}

/// Render one cell as trimmed text. Whole-number floats lose their
/// fractional part so a period number stored as `1.0` reads as "1".
fn cell_to_string(data: &Data) -> Option<String> {
    let text = match data {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    };

    if text.is_empty() { None } else { Some(text) }
}

/// Open an `.xlsx` workbook and flatten `sheet_name` into a [`SheetGrid`]
/// with its merged regions.
pub fn load_sheet(path: &Path, sheet_name: &str) -> Result<SheetGrid, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    workbook.load_merged_regions()?;

    let merges = workbook
        .merged_regions_by_sheet(sheet_name)
        .iter()
        .map(|(_, _, dimensions)| MergeSpan {
            first_row: dimensions.start.0,
            first_col: dimensions.start.1,
            last_row: dimensions.end.0,
            last_col: dimensions.end.1,
        })
        .collect();

    let range = workbook.worksheet_range(sheet_name)?;

    // Dense grid addressed by absolute sheet coordinates, so merge spans
    // and cell values share the same frame of reference.
    let mut cells = Vec::new();
    if let Some((last_row, last_col)) = range.end() {
        cells.reserve(last_row as usize + 1);
        for row in 0..=last_row {
            let mut row_cells = Vec::with_capacity(last_col as usize + 1);
            for col in 0..=last_col {
                row_cells.push(range.get_value((row, col)).and_then(cell_to_string));
            }
            cells.push(row_cells);
        }
    }

    Ok(SheetGrid::new(cells, merges))
}
