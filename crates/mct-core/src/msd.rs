//! Mean-squared-displacement memory kernel.
//!
//! K(t) = Δk ρ kBT / (6π² m) · Σ_q q⁴ c(q)² F(q, t) Fs(q, t)
//!
//! A single O(Nk) sum; both correlators come from solved trajectories.
//! The MSD value passed to `evaluate` does not enter the kernel.

use crate::coupling::coupling_coefficients;
use crate::kernel::MemoryKernel;
use crate::trajectory::Trajectory;
use mct_types::config::KernelParams;
use mct_types::error::{MctError, MctResult};
use mct_types::state::{StructureFactor, WavenumberGrid};
use ndarray::{Array1, Zip};
use std::f64::consts::PI;
use std::sync::Arc;

pub struct MsdModeCouplingKernel {
    params: KernelParams,
    grid: WavenumberGrid,
    /// q⁴ c(q)², precomputed.
    weights: Array1<f64>,
    prefactor: f64,
    coherent: Arc<Trajectory<Array1<f64>>>,
    tagged: Arc<Trajectory<Array1<f64>>>,
}

impl MsdModeCouplingKernel {
    pub fn new(
        params: KernelParams,
        grid: WavenumberGrid,
        sk: &StructureFactor,
        coherent: Arc<Trajectory<Array1<f64>>>,
        tagged: Arc<Trajectory<Array1<f64>>>,
    ) -> MctResult<Self> {
        params.validate()?;
        sk.ensure_matches(&grid)?;
        let ck = coupling_coefficients(sk, params.density)?;
        let mut weights = grid.values().mapv(|q| q.powi(4));
        weights *= &ck.mapv(|c| c * c);
        let prefactor = grid.dk() * params.density * params.thermal_energy
            / (6.0 * PI * PI * params.particle_mass);
        log::debug!("MSD kernel: nk={}, prefactor={prefactor:e}", grid.len());
        Ok(MsdModeCouplingKernel {
            params,
            grid,
            weights,
            prefactor,
            coherent,
            tagged,
        })
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    pub fn grid(&self) -> &WavenumberGrid {
        &self.grid
    }

    fn sample<'a>(
        &self,
        trajectory: &'a Trajectory<Array1<f64>>,
        name: &str,
        t: f64,
    ) -> MctResult<&'a Array1<f64>> {
        let snapshot = trajectory.snapshot(t)?;
        if snapshot.len() != self.grid.len() {
            return Err(MctError::ShapeMismatch {
                what: format!("{name} snapshot at t={t}"),
                expected: format!("{} shells", self.grid.len()),
                got: format!("{} values", snapshot.len()),
            });
        }
        Ok(snapshot)
    }
}

impl MemoryKernel for MsdModeCouplingKernel {
    type Field = f64;
    type Output = f64;

    fn output_for(&self, _field: &f64) -> f64 {
        0.0
    }

    fn evaluate_into(&mut self, out: &mut f64, _msd: &f64, t: f64) -> MctResult<()> {
        let f = self.sample(&self.coherent, "coherent", t)?;
        let fs = self.sample(&self.tagged, "tagged", t)?;
        let mut sum = 0.0;
        Zip::from(&self.weights)
            .and(f)
            .and(fs)
            .for_each(|&w, &f, &fs| sum += w * f * fs);
        *out = self.prefactor * sum;
        Ok(())
    }
}
