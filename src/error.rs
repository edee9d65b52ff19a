use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error, PartialEq)]
pub enum PlotError {
    #[error("field '{field}' not found (available columns: {})", available.join(", "))]
    FieldNotFound { field: String, available: Vec<String> },

    #[error("no field selected for the {axis} axis")]
    MissingField { axis: Axis },

    #[error("row {row} of group {group} has {width} cells, column {index} requested")]
    RowTooShort {
        group: usize,
        row: usize,
        index: usize,
        width: usize,
    },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("grid must have at least one column")]
    InvalidGridColumns,
}

/// Which side of the correlation a field selector feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}
