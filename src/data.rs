//! Data
//!
//! Dataset containers used throughout the `conformal` crate.
use serde::{Deserialize, Serialize};

/// Contiguous row major matrix data container.
///
/// This structure holds a dense matrix of values in a single contiguous
/// memory block, in row-major order: objects (feature vectors) are stored
/// one per row, so a row can be handed out as a plain slice. This is the
/// layout the conformal predictor consumes, since the leave-one-out loop
/// repeatedly views individual objects.
///
/// # Type Parameters
/// * `T` - The numeric type of the data (e.g., `f32`, `f64`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix<T> {
    /// The raw data in row-major order.
    pub data: Vec<T>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<T> Matrix<T> {
    /// Create a new Matrix.
    ///
    /// * `data` - The values in row-major order, of length `rows * cols`.
    /// * `rows` - Number of rows in the matrix.
    /// * `cols` - Number of columns in the matrix.
    pub fn new(data: Vec<T>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "data length must equal rows * cols");
        Matrix { data, rows, cols }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[i * self.cols + j]
    }

    /// Get a row of the matrix as a slice.
    ///
    /// * `row` - The index of the row to get.
    pub fn get_row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over the rows of the matrix, each as a slice.
    pub fn row_iter(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.cols)
    }

    /// Add rows to the matrix, this can be multiple
    /// rows, if they are in sequential order in the items.
    pub fn append_row(&mut self, items: Vec<T>) {
        assert!(items.len().is_multiple_of(self.cols));
        let new_rows = items.len() / self.cols;
        self.rows += new_rows;
        self.data.extend(items);
    }
}

impl<T> Matrix<T>
where
    T: Clone,
{
    /// Generate a matrix from a slice of equal-length row vectors.
    pub fn from_vecs(vecs: &[Vec<T>]) -> Self {
        let cols = vecs.first().map_or(0, |v| v.len());
        let mut data = Vec::with_capacity(vecs.len() * cols);
        for vec in vecs {
            assert_eq!(vec.len(), cols, "all rows must have the same length");
            data.extend_from_slice(vec);
        }
        Matrix {
            data,
            rows: vecs.len(),
            cols,
        }
    }
}
