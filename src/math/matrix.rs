//! Row/column-indexed `f32` matrix and its linear-algebra primitives.
//!
//! Indexing convention, fixed once and used everywhere in the crate:
//! a matrix is `rows × cols`, indexed `data[row][col]`, row-major. A dense
//! layer's weight matrix is `(output_size × input_size)`, so the forward
//! pass is `W · x` ([`Matrix::mul_vec`]) and backward delta propagation is
//! `Wᵀ · δ` (transpose, then `mul_vec`). The weight gradient is
//! `outer(δ, activations)`, which already has the weight matrix's shape.
//!
//! All loops are plain sequential accumulation; nothing parallelizes
//! internally.

use crate::error::{NetError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f32>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from rows, validating that they are rectangular.
    pub fn from_rows(data: Vec<Vec<f32>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |r| r.len());
        for row in &data {
            if row.len() != cols {
                return Err(NetError::shape(
                    "matrix::from_rows",
                    format!("row of length {cols}"),
                    row.len().to_string(),
                ));
            }
        }
        Ok(Matrix { rows, cols, data })
    }

    fn dims(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }

    /// Standard matrix product; `self.cols` must equal `rhs.rows`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        let mut out = Matrix::zeros(self.rows, rhs.cols);
        self.matmul_into(rhs, &mut out)?;
        Ok(out)
    }

    pub fn matmul_into(&self, rhs: &Matrix, out: &mut Matrix) -> Result<()> {
        if self.cols != rhs.rows {
            return Err(NetError::shape(
                "matrix::matmul",
                format!("{}x*", self.cols),
                rhs.dims(),
            ));
        }
        if out.rows != self.rows || out.cols != rhs.cols {
            return Err(NetError::shape(
                "matrix::matmul (destination)",
                format!("{}x{}", self.rows, rhs.cols),
                out.dims(),
            ));
        }
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }
                out.data[i][j] = sum;
            }
        }
        Ok(())
    }

    /// `M · v`; `v.len()` must equal `self.cols`, output length `self.rows`.
    pub fn mul_vec(&self, v: &[f32]) -> Result<Vec<f32>> {
        let mut out = vec![0.0; self.rows];
        self.mul_vec_into(v, &mut out)?;
        Ok(out)
    }

    pub fn mul_vec_into(&self, v: &[f32], out: &mut [f32]) -> Result<()> {
        if v.len() != self.cols {
            return Err(NetError::shape(
                "matrix::mul_vec",
                self.cols.to_string(),
                v.len().to_string(),
            ));
        }
        if out.len() != self.rows {
            return Err(NetError::shape(
                "matrix::mul_vec (destination)",
                self.rows.to_string(),
                out.len().to_string(),
            ));
        }
        for i in 0..self.rows {
            let mut sum = 0.0;
            for j in 0..self.cols {
                sum += self.data[i][j] * v[j];
            }
            out[i] = sum;
        }
        Ok(())
    }

    /// `v · M` (the other contraction orientation); `v.len()` must equal
    /// `self.rows`, output length `self.cols`. Equivalent to `Mᵀ · v`
    /// without materializing the transpose.
    pub fn vec_mul(&self, v: &[f32]) -> Result<Vec<f32>> {
        if v.len() != self.rows {
            return Err(NetError::shape(
                "matrix::vec_mul",
                self.rows.to_string(),
                v.len().to_string(),
            ));
        }
        let mut out = vec![0.0; self.cols];
        for j in 0..self.cols {
            let mut sum = 0.0;
            for i in 0..self.rows {
                sum += v[i] * self.data[i][j];
            }
            out[j] = sum;
        }
        Ok(out)
    }

    /// Outer product of two vectors: `out[i][j] = u[i] * v[j]`,
    /// shape `(u.len() × v.len())`.
    pub fn outer(u: &[f32], v: &[f32]) -> Matrix {
        let mut out = Matrix::zeros(u.len(), v.len());
        for i in 0..u.len() {
            for j in 0..v.len() {
                out.data[i][j] = u[i] * v[j];
            }
        }
        out
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..out.rows {
            for j in 0..out.cols {
                out.data[i][j] = self.data[j][i];
            }
        }
        out
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.check_same_shape("matrix::add", rhs)?;
        let mut out = Matrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[i][j] = self.data[i][j] + rhs.data[i][j];
            }
        }
        Ok(out)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix> {
        self.check_same_shape("matrix::sub", rhs)?;
        let mut out = Matrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }
        Ok(out)
    }

    /// `self -= rhs`, in place. Used for the weight update.
    pub fn sub_assign(&mut self, rhs: &Matrix) -> Result<()> {
        self.check_same_shape("matrix::sub_assign", rhs)?;
        for i in 0..self.rows {
            for j in 0..self.cols {
                self.data[i][j] -= rhs.data[i][j];
            }
        }
        Ok(())
    }

    pub fn scale(&self, s: f32) -> Matrix {
        let mut out = self.clone();
        out.scale_in_place(s);
        out
    }

    pub fn scale_in_place(&mut self, s: f32) {
        for row in self.data.iter_mut() {
            for x in row.iter_mut() {
                *x *= s;
            }
        }
    }

    /// Clamps every component into `[lo, hi]`, in place.
    pub fn clamp(&mut self, lo: f32, hi: f32) {
        for row in self.data.iter_mut() {
            for x in row.iter_mut() {
                *x = x.clamp(lo, hi);
            }
        }
    }

    fn check_same_shape(&self, op: &'static str, rhs: &Matrix) -> Result<()> {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            return Err(NetError::shape(op, self.dims(), rhs.dims()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn m(rows: Vec<Vec<f32>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert!(Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn matmul_dimension_contract() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = m(vec![vec![1.0], vec![1.0]]);
        let c = a.matmul(&b).unwrap();
        assert_eq!((c.rows, c.cols), (2, 1));
        assert_eq!(c.data, vec![vec![3.0], vec![7.0]]);
        assert!(b.matmul(&a).is_err());
    }

    #[test]
    fn matmul_associates_with_vector_contraction() {
        // (A×B)×v == A×(B×v) within float tolerance.
        let a = m(vec![vec![1.0, 2.0, 0.5], vec![-1.0, 0.0, 3.0]]);
        let b = m(vec![vec![2.0, 1.0], vec![0.0, -1.0], vec![1.0, 1.0]]);
        let v = [3.0, -2.0];

        let left = a.matmul(&b).unwrap().mul_vec(&v).unwrap();
        let right = a.mul_vec(&b.mul_vec(&v).unwrap()).unwrap();
        for (l, r) in left.iter().zip(right.iter()) {
            assert_relative_eq!(*l, *r, max_relative = 1e-5);
        }
    }

    #[test]
    fn transpose_is_its_own_inverse() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(a.transpose().transpose(), a);
    }

    #[test]
    fn vec_mul_matches_transpose_mul_vec() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let v = [1.0, -1.0, 2.0];
        assert_eq!(a.vec_mul(&v).unwrap(), a.transpose().mul_vec(&v).unwrap());
    }

    #[test]
    fn outer_product_shape_and_values() {
        let u = [1.0, 2.0, 3.0];
        let v = [4.0, 5.0];
        let o = Matrix::outer(&u, &v);
        assert_eq!((o.rows, o.cols), (3, 2));
        for i in 0..3 {
            for j in 0..2 {
                assert_eq!(o.data[i][j], u[i] * v[j]);
            }
        }
    }

    #[test]
    fn add_sub_and_shape_errors() {
        let a = m(vec![vec![1.0, 2.0]]);
        let b = m(vec![vec![3.0, 4.0]]);
        assert_eq!(a.add(&b).unwrap().data, vec![vec![4.0, 6.0]]);
        assert_eq!(b.sub(&a).unwrap().data, vec![vec![2.0, 2.0]]);
        let c = Matrix::zeros(2, 2);
        assert!(a.add(&c).is_err());
        let mut d = m(vec![vec![1.0, 2.0]]);
        d.sub_assign(&b).unwrap();
        assert_eq!(d.data, vec![vec![-2.0, -2.0]]);
    }

    #[test]
    fn clamp_and_scale() {
        let mut a = m(vec![vec![-100.0, 2.0], vec![7.0, 0.0]]);
        a.clamp(-5.0, 5.0);
        assert_eq!(a.data, vec![vec![-5.0, 2.0], vec![5.0, 0.0]]);
        a.scale_in_place(2.0);
        assert_eq!(a.data, vec![vec![-10.0, 4.0], vec![10.0, 0.0]]);
    }
}
