//! Evaluation contract between memory kernels and the external solver.

use mct_math::diagonal::DiagonalOperator;
use mct_types::error::MctResult;
use ndarray::Array1;

/// Shape of a field value, used to normalize equation coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Scalar,
    Vector(usize),
}

/// A field the solver advances: a scalar correlator or one value per shell.
pub trait Field: Clone {
    fn field_shape(&self) -> FieldShape;
}

impl Field for f64 {
    fn field_shape(&self) -> FieldShape {
        FieldShape::Scalar
    }
}

impl Field for Array1<f64> {
    fn field_shape(&self) -> FieldShape {
        FieldShape::Vector(self.len())
    }
}

/// A memory kernel K(F, t).
///
/// Evaluation takes `&mut self` because kernels own reusable scratch
/// buffers; one instance must not serve two overlapping calls.
pub trait MemoryKernel {
    type Field: Field;
    type Output: Clone;

    /// Allocate an output buffer matching `field`.
    fn output_for(&self, field: &Self::Field) -> Self::Output;

    /// Evaluate into a caller-owned buffer.
    fn evaluate_into(
        &mut self,
        out: &mut Self::Output,
        field: &Self::Field,
        t: f64,
    ) -> MctResult<()>;

    fn evaluate(&mut self, field: &Self::Field, t: f64) -> MctResult<Self::Output> {
        let mut out = self.output_for(field);
        self.evaluate_into(&mut out, field, t)?;
        Ok(out)
    }
}

/// Output buffer for per-shell kernels.
pub(crate) fn diagonal_output(field: &Array1<f64>) -> DiagonalOperator {
    DiagonalOperator::zeros(field.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_shapes() {
        assert_eq!(1.5f64.field_shape(), FieldShape::Scalar);
        assert_eq!(Array1::<f64>::zeros(7).field_shape(), FieldShape::Vector(7));
        // Inherent ndarray shape is untouched.
        assert_eq!(Array1::<f64>::zeros(7).shape(), &[7]);
        assert_eq!(diagonal_output(&Array1::zeros(3)).len(), 3);
    }
}
