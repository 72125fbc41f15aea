//! Diagonal linear operators.
//!
//! Output type of the per-shell memory kernels and the normalized form of
//! multiplicative equation coefficients paired with a vector field.

use mct_types::error::{MctError, MctResult};
use ndarray::{Array1, Array2, ArrayView1};

#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalOperator {
    diag: Array1<f64>,
}

impl DiagonalOperator {
    pub fn new(diag: Array1<f64>) -> Self {
        DiagonalOperator { diag }
    }

    pub fn zeros(n: usize) -> Self {
        DiagonalOperator {
            diag: Array1::zeros(n),
        }
    }

    /// `value * I` of size `n`.
    pub fn scaled_identity(n: usize, value: f64) -> Self {
        DiagonalOperator {
            diag: Array1::from_elem(n, value),
        }
    }

    pub fn len(&self) -> usize {
        self.diag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    pub fn diag(&self) -> &Array1<f64> {
        &self.diag
    }

    pub fn diag_mut(&mut self) -> &mut Array1<f64> {
        &mut self.diag
    }

    /// y = D x
    pub fn apply(&self, x: ArrayView1<f64>) -> MctResult<Array1<f64>> {
        if x.len() != self.diag.len() {
            return Err(MctError::ShapeMismatch {
                what: "diagonal operator input".to_string(),
                expected: format!("length {}", self.diag.len()),
                got: format!("length {}", x.len()),
            });
        }
        Ok(&self.diag * &x)
    }

    pub fn to_dense(&self) -> Array2<f64> {
        Array2::from_diag(&self.diag)
    }
}
