use std::time::Duration;

use crate::coordinate::CoordinateList;
use crate::error::SolveError;
use crate::solution::SolveStatus;

/// Optimization direction of the objective
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

/// Which sides of a column or row bound are active
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    /// -inf < x < +inf
    Free,
    /// lower <= x < +inf
    Lower,
    /// -inf < x <= upper
    Upper,
    /// lower <= x <= upper
    Double,
    /// x = lower = upper
    Fixed,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariableKind {
    #[default]
    Continuous,
    Integer,
}

/// A bound descriptor as sent to the engine. Inactive sides hold infinities.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub kind: BoundKind,
    pub lower: f64,
    pub upper: f64,
}

impl Bound {
    pub fn free() -> Self {
        Self {
            kind: BoundKind::Free,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    /// Picks the kind from which limits are finite; equal finite limits are `Fixed`
    pub fn new(lower: f64, upper: f64) -> Self {
        let kind = match (lower.is_finite(), upper.is_finite()) {
            (false, false) => BoundKind::Free,
            (true, false) => BoundKind::Lower,
            (false, true) => BoundKind::Upper,
            (true, true) if lower == upper => BoundKind::Fixed,
            (true, true) => BoundKind::Double,
        };
        Self { kind, lower, upper }
    }

    /// Effective `(lower, upper)` limits, reading only the sides `kind` makes active
    pub fn limits(&self) -> (f64, f64) {
        match self.kind {
            BoundKind::Free => (f64::NEG_INFINITY, f64::INFINITY),
            BoundKind::Lower => (self.lower, f64::INFINITY),
            BoundKind::Upper => (f64::NEG_INFINITY, self.upper),
            BoundKind::Double => (self.lower, self.upper),
            BoundKind::Fixed => (self.lower, self.lower),
        }
    }
}

impl Default for Bound {
    fn default() -> Self {
        Self::free()
    }
}

/// Problem-construction and solve entry points of an external LP/MIP engine.
///
/// Row and column indices are 1-based. Implementations are handed to an
/// [`Assembler`](crate::Assembler) at construction.
pub trait SolverPort {
    fn name(&self) -> &str;

    /// Drops any previously described problem
    fn reset(&mut self);

    fn set_direction(&mut self, direction: Direction);

    /// Applies before the next solve call; engines without a time limit ignore it
    fn set_time_limit(&mut self, _limit: Duration) {}

    /// Enables or silences the engine's own terminal output
    fn set_message_output(&mut self, _enabled: bool) {}

    fn add_cols(&mut self, n: usize);

    fn add_rows(&mut self, n: usize);

    fn set_col_name(&mut self, j: usize, name: &str);

    fn set_row_name(&mut self, i: usize, name: &str);

    fn set_col_bound(&mut self, j: usize, kind: BoundKind, lower: f64, upper: f64);

    fn set_col_kind(&mut self, j: usize, kind: VariableKind);

    fn set_row_bound(&mut self, i: usize, kind: BoundKind, lower: f64, upper: f64);

    fn set_objective_coefficient(&mut self, j: usize, value: f64);

    /// Bulk-loads the whole constraint matrix
    fn load_matrix(&mut self, matrix: &CoordinateList) -> Result<(), SolveError>;

    fn solve_linear(&mut self) -> Result<SolveStatus, SolveError>;

    fn solve_mixed_integer(&mut self) -> Result<SolveStatus, SolveError>;

    /// Value of column `j` from the most recent solve
    fn primal_value(&self, j: usize) -> f64;

    fn objective_value(&self) -> f64;
}
