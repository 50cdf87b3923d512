use crate::error::SolveError;

/// Coordinate-list (COO) form of the constraint matrix: parallel 1-based row and
/// column index arrays plus values, with no zero entries
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateList {
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f64>,
}

impl CoordinateList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            cols: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, row: usize, col: usize, value: f64) {
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    /// Number of triples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(row, col, value)` triples in emission order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((&row, &col), &value)| (row, col, value))
    }

    /// Checks every triple against a `rows` x `cols` problem: 1-based indices in
    /// range and finite nonzero values
    pub fn validate(&self, rows: usize, cols: usize) -> Result<(), SolveError> {
        for (row, col, value) in self.iter() {
            let in_range = (1..=rows).contains(&row) && (1..=cols).contains(&col);
            if !in_range || value == 0.0 || !value.is_finite() {
                return Err(SolveError::InvalidMatrixEntry { row, col, value });
            }
        }
        Ok(())
    }
}
