//! Schematic memory kernels.
//!
//! Low-dimensional models of the MCT feedback (F1, F2, F12-type). Useful
//! on their own and as cheap kernels for the equation container.

use crate::kernel::{diagonal_output, MemoryKernel};
use mct_math::diagonal::DiagonalOperator;
use mct_types::error::{MctError, MctResult};
use ndarray::{Array1, Zip};

fn check_finite(name: &str, value: f64) -> MctResult<()> {
    if !value.is_finite() {
        return Err(MctError::ConfigError(format!(
            "schematic kernel parameter {name} must be finite, got {value}"
        )));
    }
    Ok(())
}

/// K(t) = ν exp(−t/τ), independent of F.
#[derive(Debug, Clone, Copy)]
pub struct ExponentiallyDecayingKernel {
    nu: f64,
    tau: f64,
}

impl ExponentiallyDecayingKernel {
    pub fn new(nu: f64, tau: f64) -> MctResult<Self> {
        check_finite("nu", nu)?;
        check_finite("tau", tau)?;
        if tau <= 0.0 {
            return Err(MctError::ConfigError(format!(
                "decay time tau must be > 0, got {tau}"
            )));
        }
        Ok(ExponentiallyDecayingKernel { nu, tau })
    }
}

impl MemoryKernel for ExponentiallyDecayingKernel {
    type Field = f64;
    type Output = f64;

    fn output_for(&self, _field: &f64) -> f64 {
        0.0
    }

    fn evaluate_into(&mut self, out: &mut f64, _field: &f64, t: f64) -> MctResult<()> {
        *out = self.nu * (-t / self.tau).exp();
        Ok(())
    }
}

/// K = ν F.
#[derive(Debug, Clone, Copy)]
pub struct SchematicF1Kernel {
    nu: f64,
}

impl SchematicF1Kernel {
    pub fn new(nu: f64) -> MctResult<Self> {
        check_finite("nu", nu)?;
        Ok(SchematicF1Kernel { nu })
    }
}

impl MemoryKernel for SchematicF1Kernel {
    type Field = f64;
    type Output = f64;

    fn output_for(&self, _field: &f64) -> f64 {
        0.0
    }

    fn evaluate_into(&mut self, out: &mut f64, field: &f64, _t: f64) -> MctResult<()> {
        *out = self.nu * field;
        Ok(())
    }
}

/// K = ν F².
#[derive(Debug, Clone, Copy)]
pub struct SchematicF2Kernel {
    nu: f64,
}

impl SchematicF2Kernel {
    pub fn new(nu: f64) -> MctResult<Self> {
        check_finite("nu", nu)?;
        Ok(SchematicF2Kernel { nu })
    }
}

impl MemoryKernel for SchematicF2Kernel {
    type Field = f64;
    type Output = f64;

    fn output_for(&self, _field: &f64) -> f64 {
        0.0
    }

    fn evaluate_into(&mut self, out: &mut f64, field: &f64, _t: f64) -> MctResult<()> {
        *out = self.nu * field * field;
        Ok(())
    }
}

/// K = ν₁ F + ν₂ F² + ν₃ F³.
#[derive(Debug, Clone, Copy)]
pub struct SchematicF123Kernel {
    nu1: f64,
    nu2: f64,
    nu3: f64,
}

impl SchematicF123Kernel {
    pub fn new(nu1: f64, nu2: f64, nu3: f64) -> MctResult<Self> {
        check_finite("nu1", nu1)?;
        check_finite("nu2", nu2)?;
        check_finite("nu3", nu3)?;
        Ok(SchematicF123Kernel { nu1, nu2, nu3 })
    }
}

impl MemoryKernel for SchematicF123Kernel {
    type Field = f64;
    type Output = f64;

    fn output_for(&self, _field: &f64) -> f64 {
        0.0
    }

    fn evaluate_into(&mut self, out: &mut f64, field: &f64, _t: f64) -> MctResult<()> {
        let f = *field;
        *out = f * (self.nu1 + f * (self.nu2 + f * self.nu3));
        Ok(())
    }
}

/// Independent F2 models per component: K = diag(ν_i F_i²).
#[derive(Debug, Clone)]
pub struct SchematicDiagonalKernel {
    nu: Array1<f64>,
}

impl SchematicDiagonalKernel {
    pub fn new(nu: Array1<f64>) -> MctResult<Self> {
        if nu.iter().any(|v| !v.is_finite()) {
            return Err(MctError::ConfigError(
                "schematic diagonal kernel coefficients must be finite".to_string(),
            ));
        }
        Ok(SchematicDiagonalKernel { nu })
    }
}

impl MemoryKernel for SchematicDiagonalKernel {
    type Field = Array1<f64>;
    type Output = DiagonalOperator;

    fn output_for(&self, field: &Array1<f64>) -> DiagonalOperator {
        diagonal_output(field)
    }

    fn evaluate_into(
        &mut self,
        out: &mut DiagonalOperator,
        field: &Array1<f64>,
        _t: f64,
    ) -> MctResult<()> {
        if field.len() != self.nu.len() || out.len() != self.nu.len() {
            return Err(MctError::ShapeMismatch {
                what: "schematic diagonal kernel".to_string(),
                expected: format!("{} components", self.nu.len()),
                got: format!("field {}, output {}", field.len(), out.len()),
            });
        }
        Zip::from(out.diag_mut())
            .and(&self.nu)
            .and(field)
            .for_each(|o, &nu, &f| *o = nu * f * f);
        Ok(())
    }
}
