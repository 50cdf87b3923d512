mod error;
mod matrix;
mod shape;
mod vector;

pub use error::LinalgError;
pub use matrix::SparseMatrix;
pub use shape::{Entry, Orientation, Shape};
pub use vector::{NonZeros, SparseVector};
