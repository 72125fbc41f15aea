// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — Tagged Mode-Coupling Kernel
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Tagged-particle (self intermediate scattering) memory kernel.
//!
//! A_i\[q, p\] = V_i\[q, p\] F(q, t) Fs(p, t) with F read from a previously
//! solved coherent trajectory. Only sampled times of that trajectory can
//! be evaluated.

use crate::coupling::coupling_coefficients;
use crate::interaction::{InteractionArrays, ShellAccumulators};
use crate::kernel::{diagonal_output, MemoryKernel};
use crate::trajectory::Trajectory;
use crate::vertex::VertexMatrices;
use mct_math::diagonal::DiagonalOperator;
use mct_types::config::KernelParams;
use mct_types::error::{MctError, MctResult};
use mct_types::state::{StructureFactor, WavenumberGrid};
use ndarray::Array1;
use std::sync::Arc;

pub struct TaggedModeCouplingKernel {
    params: KernelParams,
    grid: WavenumberGrid,
    vertex: VertexMatrices,
    coherent: Arc<Trajectory<Array1<f64>>>,
    arrays: InteractionArrays,
    acc: ShellAccumulators,
}

impl TaggedModeCouplingKernel {
    pub fn new(
        params: KernelParams,
        grid: WavenumberGrid,
        sk: &StructureFactor,
        coherent: Arc<Trajectory<Array1<f64>>>,
    ) -> MctResult<Self> {
        params.validate()?;
        sk.ensure_matches(&grid)?;
        let ck = coupling_coefficients(sk, params.density)?;
        let vertex = VertexMatrices::tagged(&params, &grid, &ck)?;
        let nk = grid.len();
        log::debug!(
            "tagged MCT kernel: nk={nk}, dk={}, {} coherent samples",
            grid.dk(),
            coherent.len()
        );
        Ok(TaggedModeCouplingKernel {
            params,
            grid,
            vertex,
            coherent,
            arrays: InteractionArrays::zeros(nk),
            acc: ShellAccumulators::zeros(nk),
        })
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    pub fn grid(&self) -> &WavenumberGrid {
        &self.grid
    }

    pub fn vertex(&self) -> &VertexMatrices {
        &self.vertex
    }

    pub fn coherent_trajectory(&self) -> &Arc<Trajectory<Array1<f64>>> {
        &self.coherent
    }
}

impl MemoryKernel for TaggedModeCouplingKernel {
    type Field = Array1<f64>;
    type Output = DiagonalOperator;

    fn output_for(&self, field: &Array1<f64>) -> DiagonalOperator {
        diagonal_output(field)
    }

    fn evaluate_into(
        &mut self,
        out: &mut DiagonalOperator,
        field: &Array1<f64>,
        t: f64,
    ) -> MctResult<()> {
        let nk = self.grid.len();
        if field.len() != nk {
            return Err(MctError::ShapeMismatch {
                what: "tagged field".to_string(),
                expected: format!("{nk} shells"),
                got: format!("{} values", field.len()),
            });
        }
        let f_coherent = self.coherent.snapshot(t)?;
        if f_coherent.len() != nk {
            return Err(MctError::ShapeMismatch {
                what: format!("coherent snapshot at t={t}"),
                expected: format!("{nk} shells"),
                got: format!("{} values", f_coherent.len()),
            });
        }
        self.arrays.fill(&self.vertex, f_coherent.view(), field.view())?;
        self.acc.reduce(&self.arrays)?;
        self.acc.combine_into(self.grid.values(), out.diag_mut())
    }
}
