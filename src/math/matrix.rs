use rand::prelude::*;
use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};

/// Dense `rows × cols` grid of `f64`.
///
/// Every transform returns a new `Matrix`; nothing mutates an existing one.
/// Rows always share the same width, which is checked whenever a matrix is
/// built from caller-supplied data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    /// Builds a matrix from explicit rows.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = match data.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(Error::EmptyMatrix),
        };
        if let Some((row, found)) = data.iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != cols)
        {
            return Err(Error::RaggedRows { row, expected: cols, found });
        }

        Ok(Matrix { rows: data.len(), cols, data })
    }

    /// Single-row matrix, the shape every sample travels through the network in.
    pub fn row(values: Vec<f64>) -> Result<Matrix> {
        Matrix::from_data(vec![values])
    }

    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 1.0)
    }

    /// `n × n` matrix with ones on the diagonal.
    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        res
    }

    /// Uniform samples in `[0, 1)` drawn from the thread-local generator.
    pub fn random(rows: usize, cols: usize) -> Matrix {
        Matrix::random_with(&mut rand::thread_rng(), rows, cols)
    }

    /// Uniform samples in `[0, 1)` drawn from `rng`.
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, rows: usize, cols: usize) -> Matrix {
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| rng.gen::<f64>()).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix { rows, cols, data: vec![vec![value; cols]; rows] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn into_data(self) -> Vec<Vec<f64>> {
        self.data
    }

    pub fn add_scalar(&self, scalar: f64) -> Matrix {
        self.apply(|x| x + scalar)
    }

    pub fn sub_scalar(&self, scalar: f64) -> Matrix {
        self.add_scalar(-scalar)
    }

    pub fn mul_scalar(&self, scalar: f64) -> Matrix {
        self.apply(|x| x * scalar)
    }

    /// Element-wise map.
    pub fn apply<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        let data = self.data.iter()
            .map(|row| row.iter().map(|&x| functor(x)).collect())
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    /// Standard matrix product. Requires `self.cols == other.rows`.
    pub fn mul_matrix(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(self.mismatch("mul_matrix", other));
        }

        let mut res = Matrix::zeros(self.rows, other.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * other.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn mul_matrix_elem(&self, other: &Matrix) -> Result<Matrix> {
        if self.dims() != other.dims() {
            return Err(self.mismatch("mul_matrix_elem", other));
        }
        Ok(self.zip_with(other, None, |a, b| a * b))
    }

    /// Element-wise sum. With `broadcast_row = Some(r)`, every row of `self`
    /// is combined with row `r` of `other` (bias broadcast over a batch).
    pub fn add_matrix(&self, other: &Matrix, broadcast_row: Option<usize>) -> Result<Matrix> {
        self.check_combinable("add_matrix", other, broadcast_row)?;
        Ok(self.zip_with(other, broadcast_row, |a, b| a + b))
    }

    /// Element-wise difference, with the same broadcasting rule as `add_matrix`.
    pub fn sub_matrix(&self, other: &Matrix, broadcast_row: Option<usize>) -> Result<Matrix> {
        self.check_combinable("sub_matrix", other, broadcast_row)?;
        Ok(self.zip_with(other, broadcast_row, |a, b| a - b))
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

    /// Arithmetic mean of all entries.
    pub fn mean(&self) -> f64 {
        let count = self.rows * self.cols;
        if count == 0 {
            return 0.0;
        }
        self.data.iter().flatten().sum::<f64>() / count as f64
    }

    /// Column sums as a `1 × cols` matrix.
    pub fn sum_rows(&self) -> Matrix {
        let sums = (0..self.cols)
            .map(|j| self.data.iter().map(|row| row[j]).sum())
            .collect();
        Matrix { rows: 1, cols: self.cols, data: vec![sums] }
    }

    /// Index and value of the largest entry in row `row`.
    pub fn argmax_row(&self, row: usize) -> Option<(usize, f64)> {
        self.data.get(row)?
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, x)| match best {
                Some((_, v)) if v >= x => best,
                _ => Some((i, x)),
            })
    }

    fn check_combinable(&self, op: &'static str, other: &Matrix, broadcast_row: Option<usize>) -> Result<()> {
        let compatible = match broadcast_row {
            Some(r) => r < other.rows && self.cols == other.cols,
            None => self.dims() == other.dims(),
        };
        if compatible { Ok(()) } else { Err(self.mismatch(op, other)) }
    }

    fn zip_with<F>(&self, other: &Matrix, broadcast_row: Option<usize>, op: F) -> Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        let data = self.data.iter().enumerate()
            .map(|(i, row)| {
                let rhs = &other.data[broadcast_row.unwrap_or(i)];
                row.iter().zip(rhs.iter()).map(|(&a, &b)| op(a, b)).collect()
            })
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    fn mismatch(&self, op: &'static str, other: &Matrix) -> Error {
        Error::DimensionMismatch { op, left: self.dims(), right: other.dims() }
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = Error;

    fn try_from(data: Vec<Vec<f64>>) -> Result<Matrix> {
        Matrix::from_data(data)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Self {
        matrix.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    const TOL: f64 = 1e-9;

    fn assert_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.dims(), b.dims());
        for (ra, rb) in a.data().iter().zip(b.data()) {
            for (x, y) in ra.iter().zip(rb) {
                assert!((x - y).abs() < TOL, "{x} != {y}");
            }
        }
    }

    fn sample(rows: usize, cols: usize, seed: u64) -> Matrix {
        Matrix::random_with(&mut StdRng::seed_from_u64(seed), rows, cols).mul_scalar(10.0)
    }

    #[test]
    fn from_data_rejects_ragged_rows() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::RaggedRows { row: 1, expected: 2, found: 1 }));
        assert!(matches!(Matrix::from_data(vec![]), Err(Error::EmptyMatrix)));
        assert!(matches!(Matrix::from_data(vec![vec![]]), Err(Error::EmptyMatrix)));
    }

    #[test]
    fn product_has_expected_shape_and_values() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let b = Matrix::from_data(vec![vec![1.0, 0.0, 2.0, 1.0], vec![0.0, 1.0, 1.0, 3.0]]).unwrap();
        let c = a.mul_matrix(&b).unwrap();
        assert_eq!(c.dims(), (3, 4));
        assert_eq!(c.data()[0], vec![1.0, 2.0, 4.0, 7.0]);
        assert_eq!(c.data()[2], vec![5.0, 6.0, 16.0, 23.0]);
    }

    #[test]
    fn product_with_identity_is_noop() {
        let a = sample(4, 3, 7);
        assert_close(&a.mul_matrix(&Matrix::identity(3)).unwrap(), &a);
    }

    #[test]
    fn product_rejects_incompatible_shapes() {
        let err = Matrix::ones(2, 3).mul_matrix(&Matrix::ones(2, 3)).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { op: "mul_matrix", left: (2, 3), right: (2, 3) }
        ));
    }

    #[test]
    fn double_transpose_round_trips() {
        let a = sample(3, 5, 11);
        assert_eq!(a.transpose().dims(), (5, 3));
        assert_close(&a.transpose().transpose(), &a);
    }

    #[test]
    fn scalar_add_then_sub_round_trips() {
        let a = sample(2, 6, 3);
        assert_close(&a.add_scalar(5.0).sub_scalar(5.0), &a);
        assert_close(&a.mul_scalar(2.0), &a.add_matrix(&a, None).unwrap());
    }

    #[test]
    fn broadcast_row_combines_every_row_with_one_row() {
        let batch = Matrix::from_data(vec![vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap();
        let bias = Matrix::from_data(vec![vec![10.0, 20.0]]).unwrap();
        let sum = batch.add_matrix(&bias, Some(0)).unwrap();
        assert_eq!(sum.data(), &[vec![11.0, 21.0], vec![12.0, 22.0]]);
        let diff = batch.sub_matrix(&bias, Some(0)).unwrap();
        assert_eq!(diff.data(), &[vec![-9.0, -19.0], vec![-8.0, -18.0]]);

        assert!(batch.add_matrix(&bias, None).is_err());
        assert!(batch.add_matrix(&bias, Some(1)).is_err());
    }

    #[test]
    fn elementwise_product_requires_same_shape() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let sq = a.mul_matrix_elem(&a).unwrap();
        assert_eq!(sq.data(), &[vec![1.0, 4.0], vec![9.0, 16.0]]);
        assert!(a.mul_matrix_elem(&Matrix::ones(1, 2)).is_err());
    }

    #[test]
    fn mean_and_generators() {
        assert_eq!(Matrix::ones(3, 4).mean(), 1.0);
        assert_eq!(Matrix::zeros(2, 2).mean(), 0.0);
        let r = Matrix::random(5, 5);
        assert!(r.data().iter().flatten().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn argmax_picks_first_maximum() {
        let m = Matrix::row(vec![0.2, 0.9, 0.9, -1.0]).unwrap();
        assert_eq!(m.argmax_row(0), Some((1, 0.9)));
        assert_eq!(m.argmax_row(1), None);
    }

    #[test]
    fn serde_rejects_ragged_json() {
        let m: Matrix = serde_json::from_str("[[1.0, 2.0], [3.0, 4.0]]").unwrap();
        assert_eq!(m.dims(), (2, 2));
        assert!(serde_json::from_str::<Matrix>("[[1.0, 2.0], [3.0]]").is_err());
    }
}
