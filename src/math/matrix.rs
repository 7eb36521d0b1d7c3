use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Dense row-major matrix of `f64`.
///
/// Rows are examples and columns are units everywhere in this crate, so the
/// shape-checked operations below are written for that orientation. Every
/// operation that combines two matrices returns `Error::ShapeMismatch` instead
/// of panicking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from row vectors. All rows must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(Error::shape(
                "from_data",
                format!("{} columns in every row", cols),
                format!("{} columns in row {}", row.len(), i),
            ));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a `rows × cols` matrix from a flat row-major buffer.
    pub fn from_flat(rows: usize, cols: usize, flat: &[f64]) -> Result<Matrix> {
        if flat.len() != rows * cols {
            return Err(Error::shape(
                "from_flat",
                format!("{} values for {}x{}", rows * cols, rows, cols),
                format!("{} values", flat.len()),
            ));
        }
        let data = if cols == 0 {
            vec![Vec::new(); rows]
        } else {
            flat.chunks_exact(cols).map(|chunk| chunk.to_vec()).collect()
        };
        Ok(Matrix { rows, cols, data })
    }

    /// Uniform samples in `[-epsilon, epsilon]`.
    pub fn random_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, epsilon: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = rng.gen::<f64>() * 2.0 * epsilon - epsilon;
            }
        }
        res
    }

    /// Standard normal samples, N(0, 1).
    pub fn standard_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = Matrix::sample_standard_normal(rng);
            }
        }
        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // 1 - U keeps both samples in (0, 1] so ln() stays finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }
        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// `self · rhs`
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::shape(
                "dot",
                format!("lhs cols == rhs rows ({})", self.cols),
                format!("{}x{} · {}x{}", self.rows, self.cols, rhs.rows, rhs.cols),
            ));
        }
        let mut res = Matrix::zeros(self.rows, rhs.cols);
        for (out_row, lhs_row) in res.data.iter_mut().zip(self.data.iter()) {
            for (&a, rhs_row) in lhs_row.iter().zip(rhs.data.iter()) {
                for (o, &b) in out_row.iter_mut().zip(rhs_row.iter()) {
                    *o += a * b;
                }
            }
        }
        Ok(res)
    }

    /// `self · rhsᵀ` without materialising the transpose.
    pub fn dot_transposed(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.cols {
            return Err(Error::shape(
                "dot_transposed",
                format!("lhs cols == rhs cols ({})", self.cols),
                format!("{}x{} · ({}x{})ᵀ", self.rows, self.cols, rhs.rows, rhs.cols),
            ));
        }
        let data = self
            .data
            .iter()
            .map(|lhs_row| {
                rhs.data
                    .iter()
                    .map(|rhs_row| lhs_row.iter().zip(rhs_row.iter()).map(|(a, b)| a * b).sum())
                    .collect()
            })
            .collect();
        Ok(Matrix { rows: self.rows, cols: rhs.rows, data })
    }

    /// `selfᵀ · rhs` without materialising the transpose.
    pub fn transposed_dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.rows != rhs.rows {
            return Err(Error::shape(
                "transposed_dot",
                format!("lhs rows == rhs rows ({})", self.rows),
                format!("({}x{})ᵀ · {}x{}", self.rows, self.cols, rhs.rows, rhs.cols),
            ));
        }
        let mut res = Matrix::zeros(self.cols, rhs.cols);
        for (lhs_row, rhs_row) in self.data.iter().zip(rhs.data.iter()) {
            for (out_row, &a) in res.data.iter_mut().zip(lhs_row.iter()) {
                for (o, &b) in out_row.iter_mut().zip(rhs_row.iter()) {
                    *o += a * b;
                }
            }
        }
        Ok(res)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    /// Element-wise `self - rhs`.
    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("sub", rhs, |a, b| a - b)
    }

    /// In-place `self -= scale * rhs`.
    pub fn sub_scaled_assign(&mut self, rhs: &Matrix, scale: f64) -> Result<()> {
        self.check_same_shape("sub_scaled_assign", rhs)?;
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, &g) in row.iter_mut().zip(rhs_row.iter()) {
                *x -= scale * g;
            }
        }
        Ok(())
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().flat_map(|row| row.iter()).sum()
    }

    /// Returns `[1 | self]`: a column of ones followed by the original columns.
    pub fn prepend_ones_column(&self) -> Matrix {
        let data = self
            .data
            .iter()
            .map(|row| {
                let mut augmented = Vec::with_capacity(row.len() + 1);
                augmented.push(1.0);
                augmented.extend_from_slice(row);
                augmented
            })
            .collect();
        Matrix { rows: self.rows, cols: self.cols + 1, data }
    }

    /// Returns the matrix without its first column.
    pub fn drop_first_column(&self) -> Result<Matrix> {
        if self.cols == 0 {
            return Err(Error::shape("drop_first_column", "at least 1 column", "0 columns"));
        }
        let data = self.data.iter().map(|row| row[1..].to_vec()).collect();
        Ok(Matrix { rows: self.rows, cols: self.cols - 1, data })
    }

    /// Index of the largest value in every row. Ties resolve to the lowest
    /// index; NaN never wins a comparison.
    pub fn row_argmax(&self) -> Vec<usize> {
        self.data
            .iter()
            .map(|row| {
                let mut best = 0;
                for (j, &value) in row.iter().enumerate().skip(1) {
                    if value > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.check_same_shape(op, rhs)?;
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(&a, &b)| f(a, b)).collect())
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    /// Checks that `data` really holds `rows` rows of `cols` values each.
    /// Only needed for matrices that did not come from a constructor, such as
    /// deserialized ones.
    pub(crate) fn check_consistent(&self, op: &'static str) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(Error::shape(
                op,
                format!("{} rows", self.rows),
                format!("{} rows of data", self.data.len()),
            ));
        }
        if let Some((i, row)) = self.data.iter().enumerate().find(|(_, row)| row.len() != self.cols) {
            return Err(Error::shape(
                op,
                format!("{} columns in every row", self.cols),
                format!("{} columns in row {}", row.len(), i),
            ));
        }
        Ok(())
    }

    fn check_same_shape(&self, op: &'static str, rhs: &Matrix) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(Error::shape(
                op,
                format!("{}x{}", self.rows, self.cols),
                format!("{}x{}", rhs.rows, rhs.cols),
            ));
        }
        Ok(())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
