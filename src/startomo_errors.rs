use thiserror::Error;

/// Crate-wide error type.
///
/// Fatal conditions only: a malformed STAR file cannot be safely partially
/// interpreted, so the readers abort on the first structural inconsistency.
/// Missing *optional* columns are not errors — they are collected into a
/// warning string by the record converter (see
/// [`StarConverter::records_from_table`](crate::records::StarConverter::records_from_table)).
#[derive(Error, Debug)]
pub enum StartomoError {
    #[error("no 'loop_' marker found in STAR file: {0}")]
    MissingLoopMarker(String),

    #[error("no column labels declared after 'loop_' in STAR file: {0}")]
    EmptyHeader(String),

    #[error("STAR data row at line {line} has {found} fields, header declares {expected}")]
    ColumnCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("row has {found} values but the table declares {expected} columns")]
    RowShapeMismatch { expected: usize, found: usize },

    #[error("row index {0} is out of range")]
    RowOutOfRange(usize),

    #[error("column '{column}' holds a non-numeric value: '{value}'")]
    InvalidNumericField { column: String, value: String },

    #[error("transform matrix is singular and cannot be inverted")]
    SingularTransform,

    #[error("unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for StartomoError {
    fn eq(&self, other: &Self) -> bool {
        use StartomoError::*;
        match (self, other) {
            (MissingLoopMarker(a), MissingLoopMarker(b)) => a == b,
            (EmptyHeader(a), EmptyHeader(b)) => a == b,
            (
                ColumnCountMismatch {
                    line: l1,
                    expected: e1,
                    found: f1,
                },
                ColumnCountMismatch {
                    line: l2,
                    expected: e2,
                    found: f2,
                },
            ) => l1 == l2 && e1 == e2 && f1 == f2,
            (
                RowShapeMismatch {
                    expected: e1,
                    found: f1,
                },
                RowShapeMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (RowOutOfRange(a), RowOutOfRange(b)) => a == b,
            (
                InvalidNumericField {
                    column: c1,
                    value: v1,
                },
                InvalidNumericField {
                    column: c2,
                    value: v2,
                },
            ) => c1 == c2 && v1 == v2,
            (SingularTransform, SingularTransform) => true,

            // IO errors are not comparable: equality if same variant
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
