use thiserror::Error;

/// Errors raised while parsing one sheet. All of them are fatal to the
/// current sheet's parse; the batch driver decides whether the next
/// workbook is still processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A range has a number of bounds other than two, or start > end.
    #[error("malformed week expression {0:?}")]
    MalformedWeekExpression(String),

    /// A "кр" exclusion marker that names no weeks of the active parity.
    #[error("week exclusion marker names no weeks")]
    EmptyExclusion,

    #[error("unknown week parity marker {0:?}, expected \"I\" or \"II\"")]
    UnknownParityMarker(String),

    /// A merge-continuation chain reached the top of the sheet without
    /// ever hitting an anchor cell.
    #[error("merged range at row {row}, column {col} has no anchor value")]
    UnboundedMergeWalk { row: u32, col: u32 },

    /// A sibling field of a composite cell splits into a count that can
    /// neither be zipped positionally nor broadcast.
    #[error("field {field:?} splits into {found} values, expected 1 or {expected}")]
    SplitMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("missing value at row {row}, column {col}")]
    MissingValue { row: u32, col: u32 },

    #[error("period number {0:?} is not an integer")]
    InvalidPeriod(String),
}
