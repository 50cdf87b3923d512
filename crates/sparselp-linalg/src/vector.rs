use std::collections::HashMap;
use std::iter::FusedIterator;

use crate::error::LinalgError;
use crate::matrix::SparseMatrix;
use crate::shape::{Entry, Orientation, Shape};

/// Sparse vector with a fixed declared size and a row/column orientation.
///
/// Values live in parallel `index`/`data` arrays kept in insertion order, with a
/// lookup from index to storage position so writes stay constant time. Writing a
/// zero into an occupied slot keeps the slot, so `used()` is an upper bound on the
/// number of nonzero entries rather than an exact count. Equality and products are
/// always computed on the dense values, never on the storage layout.
#[derive(Debug, Clone)]
pub struct SparseVector {
    size: usize,
    orientation: Orientation,
    index: Vec<usize>,
    data: Vec<f64>,
    /// Occupied index -> position in `index`/`data`
    slots: HashMap<usize, usize>,
}

impl SparseVector {
    /// Empty column vector with `size` declared entries
    pub fn new(size: usize) -> Self {
        Self::with_capacity(size, 0)
    }

    /// Empty column vector with room for `hint` occupied slots
    pub fn with_capacity(size: usize, hint: usize) -> Self {
        let hint = hint.min(size);
        Self {
            size,
            orientation: Orientation::Column,
            index: Vec::with_capacity(hint),
            data: Vec::with_capacity(hint),
            slots: HashMap::with_capacity(hint),
        }
    }

    /// Column vector holding `values`. Every index occupies a slot, zeros included.
    pub fn from_dense(values: &[f64]) -> Self {
        Self {
            size: values.len(),
            orientation: Orientation::Column,
            index: (0..values.len()).collect(),
            data: values.to_vec(),
            slots: (0..values.len()).map(|i| (i, i)).collect(),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn shape(&self) -> Shape {
        self.orientation.shape(self.size)
    }

    /// Number of occupied storage slots
    pub fn used(&self) -> usize {
        self.index.len()
    }

    /// Occupied indices in insertion order
    pub fn indices(&self) -> &[usize] {
        &self.index
    }

    /// Stored values, parallel to `indices()`
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    fn slot(&self, i: usize) -> Option<usize> {
        self.slots.get(&i).copied()
    }

    pub fn get(&self, i: usize) -> Result<f64, LinalgError> {
        LinalgError::check_index(i, self.size)?;
        Ok(self.slot(i).map_or(0.0, |s| self.data[s]))
    }

    pub fn set(&mut self, i: usize, value: f64) -> Result<(), LinalgError> {
        LinalgError::check_index(i, self.size)?;
        self.store(i, value);
        Ok(())
    }

    /// Caller guarantees `i < size`
    pub(crate) fn store(&mut self, i: usize, value: f64) {
        match self.slot(i) {
            Some(s) => self.data[s] = value,
            None => self.occupy(i, value),
        }
    }

    pub(crate) fn accumulate(&mut self, i: usize, value: f64) {
        match self.slot(i) {
            Some(s) => self.data[s] += value,
            None => self.occupy(i, value),
        }
    }

    fn occupy(&mut self, i: usize, value: f64) {
        self.slots.insert(i, self.index.len());
        self.index.push(i);
        self.data.push(value);
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.size];
        for (&i, &v) in self.index.iter().zip(&self.data) {
            dense[i] = v;
        }
        dense
    }

    pub fn dot(&self, other: &SparseVector) -> Result<f64, LinalgError> {
        if self.size != other.size {
            return Err(LinalgError::mismatch("dot", self.shape(), other.shape()));
        }
        self.dot_dense(&other.to_dense())
    }

    /// Dot product against a plain dense slice of the same size
    pub fn dot_dense(&self, values: &[f64]) -> Result<f64, LinalgError> {
        if self.size != values.len() {
            return Err(LinalgError::mismatch(
                "dot",
                self.shape(),
                Orientation::Column.shape(values.len()),
            ));
        }
        Ok(self
            .index
            .iter()
            .zip(&self.data)
            .map(|(&i, &v)| v * values[i])
            .sum())
    }

    /// Dense sum. The result keeps the receiver's orientation.
    pub fn add(&self, other: &SparseVector) -> Result<SparseVector, LinalgError> {
        if self.size != other.size {
            return Err(LinalgError::mismatch("add", self.shape(), other.shape()));
        }
        let mut sum = self.clone();
        for (&i, &v) in other.index.iter().zip(&other.data) {
            sum.accumulate(i, v);
        }
        Ok(sum)
    }

    /// Every stored value multiplied by `scalar`; occupied slots are kept as they are
    pub fn scale(&self, scalar: f64) -> SparseVector {
        SparseVector {
            size: self.size,
            orientation: self.orientation,
            index: self.index.clone(),
            data: self.data.iter().map(|v| v * scalar).collect(),
            slots: self.slots.clone(),
        }
    }

    pub fn transpose(&self) -> SparseVector {
        self.clone().with_orientation(self.orientation.flipped())
    }

    /// Vector-by-vector product.
    ///
    /// A row times a column is the 1x1 inner product, a column times a row is the outer
    /// product. Equal orientations have no defined shape.
    pub fn times(&self, other: &SparseVector) -> Result<SparseMatrix, LinalgError> {
        match (self.orientation, other.orientation) {
            (Orientation::Row, Orientation::Column) => {
                if self.size != other.size {
                    return Err(LinalgError::mismatch(
                        "multiply",
                        self.shape(),
                        other.shape(),
                    ));
                }
                let mut product = SparseMatrix::new(1, 1);
                product.insert(0, 0, self.dot(other)?);
                Ok(product)
            }
            (Orientation::Column, Orientation::Row) => {
                let mut product = SparseMatrix::new(self.size, other.size);
                for (&i, &a) in self.index.iter().zip(&self.data) {
                    for (&j, &b) in other.index.iter().zip(&other.data) {
                        product.insert(i, j, a * b);
                    }
                }
                Ok(product)
            }
            (left @ Orientation::Row, right @ Orientation::Row)
            | (left @ Orientation::Column, right @ Orientation::Column) => {
                Err(LinalgError::UnsupportedOrientation { left, right })
            }
        }
    }

    /// Product of this vector, read in its own shape, with a matrix
    pub fn times_matrix(&self, matrix: &SparseMatrix) -> Result<SparseMatrix, LinalgError> {
        self.to_matrix().times(matrix)
    }

    /// This vector as a 1 x n or n x 1 matrix
    pub fn to_matrix(&self) -> SparseMatrix {
        let shape = self.shape();
        let mut matrix = SparseMatrix::new(shape.rows, shape.cols);
        for entry in self.non_zeros() {
            matrix.insert(entry.row, entry.col, entry.value);
        }
        matrix
    }

    /// Stored values in insertion order, with their coordinates in this vector's shape
    pub fn non_zeros(&self) -> NonZeros<'_> {
        NonZeros {
            vector: self,
            position: 0,
        }
    }
}

impl PartialEq for SparseVector {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.to_dense() == other.to_dense()
    }
}

impl From<Vec<f64>> for SparseVector {
    fn from(values: Vec<f64>) -> Self {
        SparseVector {
            size: values.len(),
            orientation: Orientation::Column,
            index: (0..values.len()).collect(),
            slots: (0..values.len()).map(|i| (i, i)).collect(),
            data: values,
        }
    }
}

impl From<&[f64]> for SparseVector {
    fn from(values: &[f64]) -> Self {
        SparseVector::from_dense(values)
    }
}

/// Iterator over the occupied slots of a [`SparseVector`]
pub struct NonZeros<'a> {
    vector: &'a SparseVector,
    position: usize,
}

impl Iterator for NonZeros<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        let index = *self.vector.index.get(self.position)?;
        let value = self.vector.data[self.position];
        self.position += 1;
        Some(match self.vector.orientation {
            Orientation::Row => Entry {
                row: 0,
                col: index,
                value,
            },
            Orientation::Column => Entry {
                row: index,
                col: 0,
                value,
            },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.used() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NonZeros<'_> {}

impl FusedIterator for NonZeros<'_> {}
