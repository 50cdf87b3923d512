use crate::error::LinalgError;
use crate::shape::{Entry, Orientation, Shape};
use crate::vector::SparseVector;

/// Sparse matrix stored as one row-oriented [`SparseVector`] per row
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<SparseVector>,
}

impl SparseMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: (0..rows)
                .map(|_| SparseVector::new(cols).with_orientation(Orientation::Row))
                .collect(),
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut identity = Self::new(n, n);
        for i in 0..n {
            identity.insert(i, i, 1.0);
        }
        identity
    }

    /// Builds a matrix from dense rows, storing only the nonzero cells.
    /// All rows must have the same length.
    pub fn from_dense(rows: &[Vec<f64>]) -> Result<Self, LinalgError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut matrix = Self::new(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(LinalgError::mismatch(
                    "from_dense",
                    Shape::new(1, cols),
                    Shape::new(1, row.len()),
                ));
            }
            for (j, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    matrix.insert(i, j, value);
                }
            }
        }
        Ok(matrix)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    /// Row `i` as a row-oriented vector of size `cols()`
    pub fn row(&self, i: usize) -> Result<&SparseVector, LinalgError> {
        LinalgError::check_index(i, self.rows)?;
        Ok(&self.data[i])
    }

    /// Occupied storage slots over all rows
    pub fn used(&self) -> usize {
        self.data.iter().map(SparseVector::used).sum()
    }

    pub fn get(&self, i: usize, j: usize) -> Result<f64, LinalgError> {
        LinalgError::check_index(i, self.rows)?;
        self.data[i].get(j)
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<(), LinalgError> {
        LinalgError::check_index(i, self.rows)?;
        LinalgError::check_index(j, self.cols)?;
        self.insert(i, j, value);
        Ok(())
    }

    /// Caller guarantees `(i, j)` is inside the declared shape
    pub(crate) fn insert(&mut self, i: usize, j: usize, value: f64) {
        self.data[i].store(j, value);
    }

    pub fn transpose(&self) -> SparseMatrix {
        let mut transposed = SparseMatrix::new(self.cols, self.rows);
        for entry in self.non_zeros() {
            transposed.insert(entry.col, entry.row, entry.value);
        }
        transposed
    }

    /// Standard sum-of-products matrix multiplication
    pub fn times(&self, other: &SparseMatrix) -> Result<SparseMatrix, LinalgError> {
        if self.cols != other.rows {
            return Err(LinalgError::mismatch(
                "multiply",
                self.shape(),
                other.shape(),
            ));
        }
        let mut product = SparseMatrix::new(self.rows, other.cols);
        for (row, target) in self.data.iter().zip(product.data.iter_mut()) {
            for (&k, &a) in row.indices().iter().zip(row.values()) {
                let other_row = &other.data[k];
                for (&j, &b) in other_row.indices().iter().zip(other_row.values()) {
                    target.accumulate(j, a * b);
                }
            }
        }
        Ok(product)
    }

    /// Product with a vector read in its own shape (n x 1 for columns, 1 x n for rows)
    pub fn times_vector(&self, vector: &SparseVector) -> Result<SparseMatrix, LinalgError> {
        self.times(&vector.to_matrix())
    }

    pub fn add(&self, other: &SparseMatrix) -> Result<SparseMatrix, LinalgError> {
        if self.shape() != other.shape() {
            return Err(LinalgError::mismatch("add", self.shape(), other.shape()));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a.add(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SparseMatrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    pub fn scale(&self, scalar: f64) -> SparseMatrix {
        SparseMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|row| row.scale(scalar)).collect(),
        }
    }

    /// Principal block over rows and columns `start..end`
    pub fn submatrix(&self, start: usize, end: usize) -> Result<SparseMatrix, LinalgError> {
        let limit = self.rows.min(self.cols);
        if end > limit {
            return Err(LinalgError::IndexOutOfRange {
                index: end,
                size: limit,
            });
        }
        if start > end {
            return Err(LinalgError::IndexOutOfRange {
                index: start,
                size: end,
            });
        }

        let mut block = SparseMatrix::new(end - start, end - start);
        for (offset, row) in self.data[start..end].iter().enumerate() {
            for entry in row.non_zeros() {
                if (start..end).contains(&entry.col) {
                    block.insert(offset, entry.col - start, entry.value);
                }
            }
        }
        Ok(block)
    }

    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        self.data.iter().map(SparseVector::to_dense).collect()
    }

    /// Stored cells, row by row, in storage order within each row
    pub fn non_zeros(&self) -> impl Iterator<Item = Entry> + '_ {
        self.data.iter().enumerate().flat_map(|(i, row)| {
            row.non_zeros().map(move |entry| Entry { row: i, ..entry })
        })
    }
}

impl PartialEq for SparseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_2x2(offset: usize) -> SparseMatrix {
        let mut m = SparseMatrix::new(5, 5);
        m.set(offset, offset, 1.0).unwrap();
        m.set(offset, offset + 1, 2.0).unwrap();
        m.set(offset + 1, offset, 3.0).unwrap();
        m.set(offset + 1, offset + 1, 4.0).unwrap();
        m
    }

    fn counting_3x3() -> SparseMatrix {
        let mut b = SparseMatrix::new(5, 5);
        let mut value = 1.0;
        for i in 0..3 {
            for j in 0..3 {
                b.set(i, j, value).unwrap();
                value += 1.0;
            }
        }
        b
    }

    #[test]
    fn test_identity_and_transpose() {
        let e5 = SparseMatrix::identity(5);
        assert_eq!(e5, e5);
        assert_eq!(e5, e5.transpose());

        let a = SparseMatrix::new(5, 5);
        assert_eq!(a.rows(), 5);
        assert_eq!(a.cols(), 5);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(a.get(i, j).unwrap(), 0.0);
            }
        }
    }

    #[test]
    fn test_identity_multiplication() {
        let e5 = SparseMatrix::identity(5);
        let a = block_2x2(1);

        assert_eq!(a, a.times(&e5).unwrap());
        assert_eq!(a, e5.times(&a).unwrap());
    }

    #[test]
    fn test_transpose_values() {
        let a = block_2x2(1);
        let mut at = SparseMatrix::new(5, 5);
        at.set(1, 1, 1.0).unwrap();
        at.set(1, 2, 3.0).unwrap();
        at.set(2, 1, 2.0).unwrap();
        at.set(2, 2, 4.0).unwrap();

        assert_eq!(a, at.transpose());
        assert_eq!(at, a.transpose());
        assert_eq!(a, a.transpose().transpose());

        let wide = SparseMatrix::from_dense(&[vec![1.0, 2.0, 3.0]]).unwrap();
        let tall = wide.transpose();
        assert_eq!(tall.shape(), Shape::new(3, 1));
        assert_eq!(tall.get(2, 0).unwrap(), 3.0);
        assert_eq!(wide.shape(), Shape::new(1, 3));
    }

    #[test]
    fn test_disjoint_blocks_multiply_to_zero() {
        let a = block_2x2(1);
        let b = block_2x2(3);
        let zero = SparseMatrix::new(5, 5);
        assert_eq!(zero, a.times(&b).unwrap());
        assert_eq!(zero, b.times(&a).unwrap());
    }

    #[test]
    fn test_times_rectangular() {
        let a = SparseMatrix::from_dense(&[vec![1.0, 2.0, 0.0], vec![0.0, 1.0, 4.0]]).unwrap();
        let b = SparseMatrix::from_dense(&[vec![1.0], vec![1.0], vec![2.0]]).unwrap();
        let product = a.times(&b).unwrap();
        assert_eq!(product.shape(), Shape::new(2, 1));
        assert_eq!(product.to_dense(), vec![vec![3.0], vec![9.0]]);

        assert!(matches!(
            b.times(&b),
            Err(LinalgError::DimensionMismatch { op: "multiply", .. })
        ));
    }

    #[test]
    fn test_times_vector_by_orientation() {
        let a = SparseMatrix::from_dense(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let x = SparseVector::from_dense(&[1.0, 1.0]);

        let column = a.times_vector(&x).unwrap();
        assert_eq!(column.shape(), Shape::new(2, 1));
        assert_eq!(column.to_dense(), vec![vec![3.0], vec![7.0]]);

        // 2x2 times 1x2 has no matching inner dimension
        assert!(a.times_vector(&x.transpose()).is_err());

        let row = x.transpose().times_matrix(&a).unwrap();
        assert_eq!(row.to_dense(), vec![vec![4.0, 6.0]]);
    }

    #[test]
    fn test_get_set_out_of_range() {
        let mut m = SparseMatrix::new(2, 3);
        assert!(m.get(2, 0).is_err());
        assert!(m.get(0, 3).is_err());
        assert_eq!(
            m.set(0, 3, 1.0),
            Err(LinalgError::IndexOutOfRange { index: 3, size: 3 })
        );
        m.set(1, 2, 5.0).unwrap();
        assert_eq!(m.get(1, 2).unwrap(), 5.0);
        assert_eq!(m.used(), 1);
    }

    #[test]
    fn test_equality_requires_declared_shape() {
        let mut a = SparseMatrix::new(4, 4);
        let mut b = SparseMatrix::new(5, 5);
        a.set(0, 0, 1.0).unwrap();
        b.set(0, 0, 1.0).unwrap();
        assert_ne!(a, b);

        // Zeroed slots compare as zeros
        let mut c = SparseMatrix::new(4, 4);
        c.set(0, 0, 1.0).unwrap();
        c.set(3, 3, 9.0).unwrap();
        c.set(3, 3, 0.0).unwrap();
        assert_eq!(a, c);
        assert_ne!(a.used(), c.used());
    }

    #[test]
    fn test_submatrix() {
        let mut a = SparseMatrix::new(5, 5);
        a.set(0, 0, 1.0).unwrap();
        a.set(0, 1, 2.0).unwrap();
        a.set(1, 0, 3.0).unwrap();
        a.set(1, 1, 4.0).unwrap();

        assert_eq!(SparseMatrix::new(3, 3), a.submatrix(2, 5).unwrap());

        let mut small_a = SparseMatrix::new(3, 3);
        small_a.set(0, 0, 4.0).unwrap();
        assert_eq!(small_a, a.submatrix(1, 4).unwrap());

        let b = counting_3x3();
        let small_b = SparseMatrix::from_dense(&[vec![5.0, 6.0], vec![8.0, 9.0]]).unwrap();
        assert_eq!(small_b, b.submatrix(1, 3).unwrap());
        let small_b = SparseMatrix::from_dense(&[vec![1.0, 2.0], vec![4.0, 5.0]]).unwrap();
        assert_eq!(small_b, b.submatrix(0, 2).unwrap());

        assert_eq!(a.submatrix(2, 2).unwrap().shape(), Shape::new(0, 0));
        assert!(a.submatrix(3, 6).is_err());
        assert!(a.submatrix(4, 2).is_err());
    }

    #[test]
    fn test_add() {
        let a = block_2x2(3);
        let b = counting_3x3();

        let mut result = b.clone();
        assert_eq!(result, b);
        result.set(3, 3, 1.0).unwrap();
        result.set(3, 4, 2.0).unwrap();
        result.set(4, 3, 3.0).unwrap();
        result.set(4, 4, 4.0).unwrap();

        assert_eq!(result, a.add(&b).unwrap());
        assert_eq!(
            result.submatrix(0, 3).unwrap(),
            b.submatrix(0, 3).unwrap()
        );
        assert_eq!(
            result.submatrix(3, 5).unwrap(),
            a.submatrix(3, 5).unwrap()
        );

        assert!(matches!(
            a.add(&SparseMatrix::new(5, 4)),
            Err(LinalgError::DimensionMismatch { op: "add", .. })
        ));
    }

    #[test]
    fn test_from_dense_rejects_ragged_rows() {
        assert!(SparseMatrix::from_dense(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        let empty = SparseMatrix::from_dense(&[]).unwrap();
        assert_eq!(empty.shape(), Shape::new(0, 0));
    }

    #[test]
    fn test_non_zeros_row_major() {
        let mut m = SparseMatrix::new(3, 3);
        m.set(2, 0, 7.0).unwrap();
        m.set(0, 2, 1.0).unwrap();
        m.set(0, 1, 2.0).unwrap();
        let entries: Vec<(usize, usize, f64)> =
            m.non_zeros().map(|e| (e.row, e.col, e.value)).collect();
        assert_eq!(entries, vec![(0, 2, 1.0), (0, 1, 2.0), (2, 0, 7.0)]);

        let scaled = m.scale(2.0);
        assert_eq!(scaled.get(2, 0).unwrap(), 14.0);
    }
}
