use crate::error::{PlotError, PlotResult};

/// Columns used when the widget configuration does not say otherwise.
pub const DEFAULT_FIXED_COL_NO: usize = 2;

/// Rows and columns of the subplot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    pub rows: usize,
    pub columns: usize,
}

impl GridSize {
    /// Size the grid for `n_groups` series groups wrapping at `fixed_col_no`.
    ///
    /// A single group gets a single column; otherwise the grid is always
    /// `fixed_col_no` wide and as many rows tall as needed.
    pub fn for_groups(n_groups: usize, fixed_col_no: usize) -> PlotResult<Self> {
        if fixed_col_no == 0 {
            return Err(PlotError::InvalidGridColumns);
        }
        let rows = n_groups.div_ceil(fixed_col_no);
        let columns = if n_groups == 1 { 1 } else { fixed_col_no };
        Ok(Self { rows, columns })
    }

    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }

    /// Row-major cell of the `index`-th group.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        let columns = self.columns.max(1);
        (index / columns, index % columns)
    }
}

/// Axis-pair ids binding the `index`-th group to its own subplot:
/// `x`/`y` for the first group, `x{i+1}`/`y{i+1}` after that.
pub fn axis_pair(index: usize) -> (String, String) {
    if index == 0 {
        ("x".to_string(), "y".to_string())
    } else {
        (format!("x{}", index + 1), format!("y{}", index + 1))
    }
}
