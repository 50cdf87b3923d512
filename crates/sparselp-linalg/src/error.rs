use thiserror::Error;

use crate::shape::{Orientation, Shape};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("Dimension mismatch in {op}: {left} vs {right}")]
    DimensionMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },
    #[error("Index {index} out of range for axis of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("Cannot multiply a {left} vector by a {right} vector")]
    UnsupportedOrientation {
        left: Orientation,
        right: Orientation,
    },
}

impl LinalgError {
    pub(crate) fn mismatch(op: &'static str, left: Shape, right: Shape) -> Self {
        LinalgError::DimensionMismatch { op, left, right }
    }

    pub(crate) fn check_index(index: usize, size: usize) -> Result<(), LinalgError> {
        if index < size {
            Ok(())
        } else {
            Err(LinalgError::IndexOutOfRange { index, size })
        }
    }
}
