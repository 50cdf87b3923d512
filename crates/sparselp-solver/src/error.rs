use sparselp_linalg::LinalgError;
use thiserror::Error;

use crate::solution::SolveStatus;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error(transparent)]
    Linalg(#[from] LinalgError),
    #[error("Solver finished with status {status}")]
    Failure { status: SolveStatus },
    #[error("Solver unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid bounds for variable {index}: [{lower}, {upper}] admits no value")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },
    #[error("Invalid matrix entry ({row}, {col}) = {value}")]
    InvalidMatrixEntry { row: usize, col: usize, value: f64 },
}
