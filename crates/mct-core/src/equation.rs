// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — Linear Equation Container
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Container for the memory equation
//!
//!   α F̈ + β Ḟ + γ F + δ + ∫₀ᵗ K(t − τ) Ḟ(τ) dτ = 0
//!
//! Coefficients are normalized once against the shape of F₀: multiplicative
//! ones become diagonal (or dense) operators for vector fields, the additive
//! one is broadcast. The container does no time stepping.

use crate::kernel::{Field, FieldShape, MemoryKernel};
use mct_math::diagonal::DiagonalOperator;
use mct_types::error::{MctError, MctResult};
use ndarray::{Array1, Array2, ArrayView1};

/// Coefficient as supplied by the caller.
#[derive(Debug, Clone)]
pub enum Coefficient {
    Scalar(f64),
    Vector(Array1<f64>),
    Diagonal(DiagonalOperator),
    Operator(Array2<f64>),
}

impl From<f64> for Coefficient {
    fn from(value: f64) -> Self {
        Coefficient::Scalar(value)
    }
}

impl From<Array1<f64>> for Coefficient {
    fn from(value: Array1<f64>) -> Self {
        Coefficient::Vector(value)
    }
}

impl From<DiagonalOperator> for Coefficient {
    fn from(value: DiagonalOperator) -> Self {
        Coefficient::Diagonal(value)
    }
}

impl From<Array2<f64>> for Coefficient {
    fn from(value: Array2<f64>) -> Self {
        Coefficient::Operator(value)
    }
}

impl Coefficient {
    fn describe(&self) -> String {
        match self {
            Coefficient::Scalar(_) => "scalar".to_string(),
            Coefficient::Vector(v) => format!("vector of length {}", v.len()),
            Coefficient::Diagonal(d) => format!("diagonal operator of size {}", d.len()),
            Coefficient::Operator(m) => format!("operator {}x{}", m.nrows(), m.ncols()),
        }
    }
}

fn incompatible(name: &str, coefficient: &Coefficient, shape: FieldShape) -> MctError {
    let expected = match shape {
        FieldShape::Scalar => "scalar (field is scalar)".to_string(),
        FieldShape::Vector(n) => format!("coefficient compatible with field of length {n}"),
    };
    log::warn!("coefficient {name} rejected: {}", coefficient.describe());
    MctError::ShapeMismatch {
        what: format!("coefficient {name}"),
        expected,
        got: coefficient.describe(),
    }
}

/// Normalized multiplicative coefficient (α, β, γ).
#[derive(Debug, Clone, PartialEq)]
pub enum MultiplicativeCoefficient {
    Scalar(f64),
    Diagonal(DiagonalOperator),
    Dense(Array2<f64>),
}

impl MultiplicativeCoefficient {
    pub fn normalize(name: &str, coefficient: Coefficient, shape: FieldShape) -> MctResult<Self> {
        match (coefficient, shape) {
            (Coefficient::Scalar(a), FieldShape::Scalar) => Ok(Self::Scalar(a)),
            (Coefficient::Scalar(a), FieldShape::Vector(n)) => {
                Ok(Self::Diagonal(DiagonalOperator::scaled_identity(n, a)))
            }
            (Coefficient::Vector(v), FieldShape::Vector(n)) if v.len() == n => {
                Ok(Self::Diagonal(DiagonalOperator::new(v)))
            }
            (Coefficient::Diagonal(d), FieldShape::Vector(n)) if d.len() == n => {
                Ok(Self::Diagonal(d))
            }
            (Coefficient::Operator(m), FieldShape::Vector(n)) if m.dim() == (n, n) => {
                Ok(Self::Dense(m))
            }
            (other, shape) => Err(incompatible(name, &other, shape)),
        }
    }

    fn shape_ok(&self, shape: FieldShape) -> bool {
        match (self, shape) {
            (Self::Scalar(_), FieldShape::Scalar) => true,
            (Self::Diagonal(d), FieldShape::Vector(n)) => d.len() == n,
            (Self::Dense(m), FieldShape::Vector(n)) => m.dim() == (n, n),
            _ => false,
        }
    }

    /// Action on a vector field.
    pub fn apply(&self, x: ArrayView1<f64>) -> MctResult<Array1<f64>> {
        match self {
            Self::Scalar(a) => Ok(x.mapv(|v| a * v)),
            Self::Diagonal(d) => d.apply(x),
            Self::Dense(m) => {
                if m.ncols() != x.len() {
                    return Err(MctError::ShapeMismatch {
                        what: "dense coefficient input".to_string(),
                        expected: format!("length {}", m.ncols()),
                        got: format!("length {}", x.len()),
                    });
                }
                Ok(m.dot(&x))
            }
        }
    }

    /// Action on a scalar field.
    pub fn apply_scalar(&self, x: f64) -> MctResult<f64> {
        match self {
            Self::Scalar(a) => Ok(a * x),
            _ => Err(MctError::ShapeMismatch {
                what: "coefficient applied to scalar".to_string(),
                expected: "scalar coefficient".to_string(),
                got: "operator coefficient".to_string(),
            }),
        }
    }
}

/// Normalized additive coefficient (δ), same type as F.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditiveCoefficient {
    Scalar(f64),
    Vector(Array1<f64>),
}

impl AdditiveCoefficient {
    pub fn normalize(name: &str, coefficient: Coefficient, shape: FieldShape) -> MctResult<Self> {
        match (coefficient, shape) {
            (Coefficient::Scalar(d), FieldShape::Scalar) => Ok(Self::Scalar(d)),
            (Coefficient::Scalar(d), FieldShape::Vector(n)) => {
                Ok(Self::Vector(Array1::from_elem(n, d)))
            }
            (Coefficient::Vector(v), FieldShape::Vector(n)) if v.len() == n => Ok(Self::Vector(v)),
            (other, shape) => Err(incompatible(name, &other, shape)),
        }
    }

    fn shape_ok(&self, shape: FieldShape) -> bool {
        match (self, shape) {
            (Self::Scalar(_), FieldShape::Scalar) => true,
            (Self::Vector(v), FieldShape::Vector(n)) => v.len() == n,
            _ => false,
        }
    }

    /// x + δ for a vector field.
    pub fn add_to(&self, x: ArrayView1<f64>) -> MctResult<Array1<f64>> {
        match self {
            Self::Scalar(d) => Ok(x.mapv(|v| v + d)),
            Self::Vector(d) if d.len() == x.len() => Ok(&x + d),
            Self::Vector(d) => Err(MctError::ShapeMismatch {
                what: "additive coefficient".to_string(),
                expected: format!("length {}", d.len()),
                got: format!("length {}", x.len()),
            }),
        }
    }

    /// x + δ for a scalar field.
    pub fn add_to_scalar(&self, x: f64) -> MctResult<f64> {
        match self {
            Self::Scalar(d) => Ok(x + d),
            Self::Vector(_) => Err(MctError::ShapeMismatch {
                what: "additive coefficient applied to scalar".to_string(),
                expected: "scalar coefficient".to_string(),
                got: "vector coefficient".to_string(),
            }),
        }
    }
}

/// α, β, γ, δ after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients {
    pub alpha: MultiplicativeCoefficient,
    pub beta: MultiplicativeCoefficient,
    pub gamma: MultiplicativeCoefficient,
    pub delta: AdditiveCoefficient,
}

impl Coefficients {
    pub fn normalize(
        alpha: Coefficient,
        beta: Coefficient,
        gamma: Coefficient,
        delta: Coefficient,
        shape: FieldShape,
    ) -> MctResult<Self> {
        Ok(Coefficients {
            alpha: MultiplicativeCoefficient::normalize("alpha", alpha, shape)?,
            beta: MultiplicativeCoefficient::normalize("beta", beta, shape)?,
            gamma: MultiplicativeCoefficient::normalize("gamma", gamma, shape)?,
            delta: AdditiveCoefficient::normalize("delta", delta, shape)?,
        })
    }

    /// Re-check shapes, e.g. after a user update.
    pub fn check(&self, shape: FieldShape) -> MctResult<()> {
        for (name, ok) in [
            ("alpha", self.alpha.shape_ok(shape)),
            ("beta", self.beta.shape_ok(shape)),
            ("gamma", self.gamma.shape_ok(shape)),
            ("delta", self.delta.shape_ok(shape)),
        ] {
            if !ok {
                return Err(MctError::ShapeMismatch {
                    what: format!("coefficient {name} after update"),
                    expected: format!("{shape:?}-compatible coefficient"),
                    got: "incompatible shape".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Time-dependent coefficient update, called as `update(coefficients, t)`.
pub type CoefficientUpdate = Box<dyn FnMut(&mut Coefficients, f64) + Send>;

pub struct LinearEquation<K: MemoryKernel> {
    coefficients: Coefficients,
    shape: FieldShape,
    f0: K::Field,
    df0: K::Field,
    k0: K::Output,
    kernel: K,
    update: Option<CoefficientUpdate>,
}

impl<K: MemoryKernel> LinearEquation<K> {
    /// Normalize coefficients against F₀ and evaluate K₀ = K(F₀, 0).
    pub fn new(
        alpha: impl Into<Coefficient>,
        beta: impl Into<Coefficient>,
        gamma: impl Into<Coefficient>,
        delta: impl Into<Coefficient>,
        f0: K::Field,
        df0: K::Field,
        mut kernel: K,
    ) -> MctResult<Self> {
        let shape = f0.field_shape();
        if df0.field_shape() != shape {
            return Err(MctError::ShapeMismatch {
                what: "initial derivative".to_string(),
                expected: format!("{shape:?}"),
                got: format!("{:?}", df0.field_shape()),
            });
        }
        let coefficients = Coefficients::normalize(
            alpha.into(),
            beta.into(),
            gamma.into(),
            delta.into(),
            shape,
        )?;
        let k0 = kernel.evaluate(&f0, 0.0)?;
        log::debug!("linear MCT equation built for field shape {shape:?}");
        Ok(LinearEquation {
            coefficients,
            shape,
            f0,
            df0,
            k0,
            kernel,
            update: None,
        })
    }

    /// Attach a coefficient update; it runs once at t = 0 immediately.
    pub fn with_coefficient_update(mut self, update: CoefficientUpdate) -> MctResult<Self> {
        self.update = Some(update);
        self.refresh_coefficients(0.0)?;
        Ok(self)
    }

    /// Run the update procedure (if any) for time `t`.
    ///
    /// The update works on a copy; a result with incompatible shapes is
    /// discarded and the previous coefficients stay in place.
    pub fn refresh_coefficients(&mut self, t: f64) -> MctResult<()> {
        if let Some(update) = self.update.as_mut() {
            let mut next = self.coefficients.clone();
            update(&mut next, t);
            if let Err(err) = next.check(self.shape) {
                log::warn!("coefficient update at t={t} rejected, keeping previous values");
                return Err(err);
            }
            self.coefficients = next;
        }
        Ok(())
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    pub fn field_shape(&self) -> FieldShape {
        self.shape
    }

    pub fn initial_field(&self) -> &K::Field {
        &self.f0
    }

    pub fn initial_derivative(&self) -> &K::Field {
        &self.df0
    }

    pub fn initial_kernel(&self) -> &K::Output {
        &self.k0
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    pub fn has_coefficient_update(&self) -> bool {
        self.update.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode_coupling::ModeCouplingKernel;
    use crate::schematic::{SchematicDiagonalKernel, SchematicF2Kernel};
    use mct_types::config::KernelParams;
    use mct_types::state::{StructureFactor, WavenumberGrid};
    use ndarray::array;

    #[test]
    fn test_scalar_alpha_becomes_scaled_identity() {
        let n = 5;
        let kernel = SchematicDiagonalKernel::new(Array1::ones(n)).unwrap();
        let eq = LinearEquation::new(
            2.5,
            1.0,
            1.0,
            0.0,
            Array1::ones(n),
            Array1::zeros(n),
            kernel,
        )
        .unwrap();

        assert_eq!(
            eq.coefficients().alpha,
            MultiplicativeCoefficient::Diagonal(DiagonalOperator::scaled_identity(n, 2.5))
        );
        let x = array![1.0, -2.0, 3.0, 0.5, 0.0];
        let y = eq.coefficients().alpha.apply(x.view()).unwrap();
        for i in 0..n {
            assert!((y[i] - 2.5 * x[i]).abs() < 1e-15);
        }
        assert_eq!(
            eq.coefficients().delta,
            AdditiveCoefficient::Vector(Array1::zeros(n))
        );
    }

    #[test]
    fn test_scalar_equation() {
        let kernel = SchematicF2Kernel::new(3.0).unwrap();
        let eq = LinearEquation::new(1.0, 0.0, 1.0, 0.0, 1.0, 0.0, kernel).unwrap();
        assert_eq!(eq.field_shape(), FieldShape::Scalar);
        assert!((eq.initial_kernel() - 3.0).abs() < 1e-15);
        assert_eq!(eq.coefficients().gamma, MultiplicativeCoefficient::Scalar(1.0));
        assert!((eq.coefficients().gamma.apply_scalar(4.0).unwrap() - 4.0).abs() < 1e-15);
    }

    #[test]
    fn test_vector_and_operator_coefficients() {
        let n = 3;
        let kernel = SchematicDiagonalKernel::new(Array1::ones(n)).unwrap();
        let dense = Array2::from_shape_fn((n, n), |(i, j)| (i + 2 * j) as f64);
        let eq = LinearEquation::new(
            array![1.0, 2.0, 3.0],
            DiagonalOperator::new(array![0.1, 0.2, 0.3]),
            dense.clone(),
            array![4.0, 5.0, 6.0],
            Array1::ones(n),
            Array1::zeros(n),
            kernel,
        )
        .unwrap();
        let x = array![1.0, 1.0, 1.0];
        let gx = eq.coefficients().gamma.apply(x.view()).unwrap();
        assert_eq!(gx, dense.dot(&x));
        assert_eq!(
            eq.coefficients().alpha.apply(x.view()).unwrap(),
            array![1.0, 2.0, 3.0]
        );
        assert_eq!(
            eq.coefficients().delta.add_to(x.view()).unwrap(),
            array![5.0, 6.0, 7.0]
        );
        assert!(eq.coefficients().delta.add_to_scalar(1.0).is_err());
    }

    #[test]
    fn test_incompatible_shapes_rejected() {
        let n = 4;
        let make = || SchematicDiagonalKernel::new(Array1::ones(n)).unwrap();

        // Vector of wrong length
        let err = LinearEquation::new(
            array![1.0, 2.0],
            1.0,
            1.0,
            0.0,
            Array1::ones(n),
            Array1::zeros(n),
            make(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, MctError::ShapeMismatch { .. }));

        // Operator as additive coefficient
        let err = LinearEquation::new(
            1.0,
            1.0,
            1.0,
            Array2::<f64>::eye(n),
            Array1::ones(n),
            Array1::zeros(n),
            make(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, MctError::ShapeMismatch { .. }));

        // Derivative of different length
        let err = LinearEquation::new(
            1.0,
            1.0,
            1.0,
            0.0,
            Array1::ones(n),
            Array1::zeros(n + 1),
            make(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, MctError::ShapeMismatch { .. }));

        // Vector coefficient with scalar field
        let err = LinearEquation::new(
            array![1.0],
            1.0,
            1.0,
            0.0,
            1.0,
            0.0,
            SchematicF2Kernel::new(1.0).unwrap(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, MctError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_coefficient_update_runs_at_zero_and_on_refresh() {
        let kernel = SchematicF2Kernel::new(1.0).unwrap();
        let eq = LinearEquation::new(0.0, 1.0, 1.0, 0.0, 1.0, 0.0, kernel).unwrap();
        let mut eq = eq
            .with_coefficient_update(Box::new(|c: &mut Coefficients, t: f64| {
                c.gamma = MultiplicativeCoefficient::Scalar(1.0 + t);
            }))
            .unwrap();
        assert!(eq.has_coefficient_update());
        assert_eq!(eq.coefficients().gamma, MultiplicativeCoefficient::Scalar(1.0));

        eq.refresh_coefficients(2.0).unwrap();
        assert_eq!(eq.coefficients().gamma, MultiplicativeCoefficient::Scalar(3.0));
        // Initial conditions are untouched
        assert_eq!(*eq.initial_field(), 1.0);
        assert_eq!(*eq.initial_derivative(), 0.0);
    }

    #[test]
    fn test_bad_update_is_rejected() {
        let kernel = SchematicF2Kernel::new(1.0).unwrap();
        let eq = LinearEquation::new(0.0, 1.0, 1.0, 0.0, 1.0, 0.0, kernel).unwrap();
        let result = eq.with_coefficient_update(Box::new(|c: &mut Coefficients, _t: f64| {
            c.delta = AdditiveCoefficient::Vector(Array1::zeros(3));
        }));
        assert!(matches!(result, Err(MctError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_failed_refresh_keeps_previous_coefficients() {
        let kernel = SchematicF2Kernel::new(1.0).unwrap();
        let eq = LinearEquation::new(0.0, 1.0, 1.0, 0.0, 1.0, 0.0, kernel).unwrap();
        let mut eq = eq
            .with_coefficient_update(Box::new(|c: &mut Coefficients, t: f64| {
                c.gamma = MultiplicativeCoefficient::Scalar(1.0 + t);
                if t > 1.0 {
                    c.delta = AdditiveCoefficient::Vector(Array1::zeros(3));
                }
            }))
            .unwrap();
        eq.refresh_coefficients(0.5).unwrap();
        let before = eq.coefficients().clone();

        let result = eq.refresh_coefficients(2.0);
        assert!(matches!(result, Err(MctError::ShapeMismatch { .. })));
        assert_eq!(eq.coefficients(), &before);
        assert_eq!(eq.coefficients().delta, AdditiveCoefficient::Scalar(0.0));
        assert_eq!(eq.coefficients().gamma, MultiplicativeCoefficient::Scalar(1.5));

        // A later valid time still refreshes normally.
        eq.refresh_coefficients(0.75).unwrap();
        assert_eq!(eq.coefficients().gamma, MultiplicativeCoefficient::Scalar(1.75));
    }

    #[test]
    fn test_mode_coupling_equation_initial_kernel() {
        let params = KernelParams::new(1.0, 1.0, 1.0);
        let grid = WavenumberGrid::uniform(20, 0.4).unwrap();
        let sk = StructureFactor::constant(&grid, 2.0);
        let mut reference = ModeCouplingKernel::new(params, grid.clone(), &sk).unwrap();
        let kernel = ModeCouplingKernel::new(params, grid, &sk).unwrap();

        let f0 = Array1::ones(20);
        let eq = LinearEquation::new(1.0, 0.0, 1.0, 0.0, f0.clone(), Array1::zeros(20), kernel)
            .unwrap();
        let expected = reference.evaluate(&f0, 0.0).unwrap();
        assert_eq!(eq.initial_kernel(), &expected);
        assert!(eq.initial_kernel().diag().iter().all(|&v| v > 0.0));
    }
}
