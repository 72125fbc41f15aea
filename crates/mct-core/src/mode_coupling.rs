// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — Mode-Coupling Kernel
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coherent mode-coupling memory kernel.
//!
//! K(k, t) = k·T1 + T2/k³ + T3/k, where T_i are the Bengtzelius sums of
//! A_i\[q, p\] = V_i\[q, p\] F(q, t) F(p, t). O(Nk²) per evaluation.

use crate::coupling::coupling_coefficients;
use crate::interaction::{InteractionArrays, ShellAccumulators};
use crate::kernel::{diagonal_output, MemoryKernel};
use crate::vertex::VertexMatrices;
use mct_math::diagonal::DiagonalOperator;
use mct_types::config::{KernelConfig, KernelParams};
use mct_types::error::{MctError, MctResult};
use mct_types::state::{StructureFactor, WavenumberGrid};
use ndarray::Array1;

pub struct ModeCouplingKernel {
    params: KernelParams,
    grid: WavenumberGrid,
    ck: Array1<f64>,
    vertex: VertexMatrices,
    arrays: InteractionArrays,
    acc: ShellAccumulators,
}

impl ModeCouplingKernel {
    pub fn new(
        params: KernelParams,
        grid: WavenumberGrid,
        sk: &StructureFactor,
    ) -> MctResult<Self> {
        params.validate()?;
        sk.ensure_matches(&grid)?;
        let ck = coupling_coefficients(sk, params.density)?;
        let vertex = VertexMatrices::coherent(&params, &grid, &ck)?;
        let nk = grid.len();
        log::debug!(
            "coherent MCT kernel: nk={nk}, dk={}, rho={}, kBT={}, m={}",
            grid.dk(),
            params.density,
            params.thermal_energy,
            params.particle_mass
        );
        Ok(ModeCouplingKernel {
            params,
            grid,
            ck,
            vertex,
            arrays: InteractionArrays::zeros(nk),
            acc: ShellAccumulators::zeros(nk),
        })
    }

    pub fn from_config(config: &KernelConfig, sk: &StructureFactor) -> MctResult<Self> {
        config.validate()?;
        Self::new(config.params, config.create_grid()?, sk)
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    pub fn grid(&self) -> &WavenumberGrid {
        &self.grid
    }

    pub fn coupling(&self) -> &Array1<f64> {
        &self.ck
    }

    pub fn vertex(&self) -> &VertexMatrices {
        &self.vertex
    }

    /// Interaction arrays from the most recent evaluation.
    pub fn interaction_arrays(&self) -> &InteractionArrays {
        &self.arrays
    }
}

impl MemoryKernel for ModeCouplingKernel {
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
        if field.len() != self.grid.len() {
            return Err(MctError::ShapeMismatch {
                what: "coherent field".to_string(),
                expected: format!("{} shells", self.grid.len()),
                got: format!("{} values", field.len()),
            });
        }
        self.arrays.fill(&self.vertex, field.view(), field.view())?;
        self.acc.reduce(&self.arrays)?;
        self.acc.combine_into(self.grid.values(), out.diag_mut())
    }
}
