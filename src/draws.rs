use arrow::array::{FixedSizeListArray, FixedSizeListBuilder, Float64Builder};
use faer::Mat;

/// Draws collected by the sampler, one row per recorded point.
#[derive(Debug, Clone, PartialEq)]
pub struct Draws {
    dim: usize,
    values: Vec<f64>,
}

impl Draws {
    pub(crate) fn with_capacity(dim: usize, rows: usize) -> Self {
        assert!(dim > 0);
        Draws {
            dim,
            values: Vec::with_capacity(dim * rows),
        }
    }

    pub(crate) fn push(&mut self, point: &[f64]) {
        assert!(point.len() == self.dim);
        self.values.extend_from_slice(point);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of draws.
    pub fn len(&self) -> usize {
        self.values.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(number of draws, dimension)`
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.dim)
    }

    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        if idx >= self.len() {
            return None;
        }
        Some(&self.values[idx * self.dim..(idx + 1) * self.dim])
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.values.chunks_exact(self.dim)
    }

    /// All draws in row-major order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Copy the draws into a dense `(draws, dim)` matrix.
    pub fn to_mat(&self) -> Mat<f64> {
        Mat::from_fn(self.len(), self.dim, |i, j| self.values[i * self.dim + j])
    }

    /// Copy the draws into an arrow list array with one fixed size entry
    /// per draw.
    pub fn to_arrow(&self) -> FixedSizeListArray {
        let mut builder = FixedSizeListBuilder::with_capacity(
            Float64Builder::with_capacity(self.values.len()),
            self.dim as i32,
            self.len(),
        );
        for row in self.rows() {
            builder.values().append_slice(row);
            builder.append(true);
        }
        builder.finish()
    }
}
