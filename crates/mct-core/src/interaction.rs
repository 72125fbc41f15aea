// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — Interaction Arrays
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-call scratch storage: interaction arrays A1..A3 and the shell
//! accumulators T1..T3 produced from them.
//!
//! Both are owned by one kernel instance and overwritten on every call.
//! A kernel with scratch buffers is single owner, single in-flight call.

use crate::vertex::VertexMatrices;
use mct_math::bengtzelius::bengtzelius3;
use mct_types::error::{MctError, MctResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1, Zip};

/// Grids at least this large fill rows in parallel via Rayon.
const PARALLEL_ROW_THRESHOLD: usize = 128;

#[derive(Debug, Clone)]
pub struct InteractionArrays {
    pub a1: Array2<f64>,
    pub a2: Array2<f64>,
    pub a3: Array2<f64>,
}

impl InteractionArrays {
    pub fn zeros(nk: usize) -> Self {
        if nk >= PARALLEL_ROW_THRESHOLD {
            log::debug!(
                "interaction fill: {nk} rows split across {} rayon threads",
                rayon::current_num_threads().max(1)
            );
        }
        InteractionArrays {
            a1: Array2::zeros((nk, nk)),
            a2: Array2::zeros((nk, nk)),
            a3: Array2::zeros((nk, nk)),
        }
    }

    pub fn len(&self) -> usize {
        self.a1.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.a1.is_empty()
    }

    /// A_i\[q, p\] = V_i\[q, p\] · left\[q\] · right\[p\]
    ///
    /// Coherent kernel: left = right = F. Tagged kernel: left = F(t)
    /// from the coherent trajectory, right = Fs.
    pub fn fill(
        &mut self,
        vertex: &VertexMatrices,
        left: ArrayView1<f64>,
        right: ArrayView1<f64>,
    ) -> MctResult<()> {
        let nk = self.len();
        if vertex.len() != nk || left.len() != nk || right.len() != nk {
            return Err(MctError::ShapeMismatch {
                what: "interaction fill".to_string(),
                expected: format!("{nk} shells"),
                got: format!(
                    "vertex {}, left {}, right {}",
                    vertex.len(),
                    left.len(),
                    right.len()
                ),
            });
        }
        let parallel = nk >= PARALLEL_ROW_THRESHOLD;
        fill_channel(&mut self.a1, &vertex.v1, left, right, parallel);
        fill_channel(&mut self.a2, &vertex.v2, left, right, parallel);
        fill_channel(&mut self.a3, &vertex.v3, left, right, parallel);
        Ok(())
    }
}

fn fill_channel(
    a: &mut Array2<f64>,
    v: &Array2<f64>,
    left: ArrayView1<f64>,
    right: ArrayView1<f64>,
    parallel: bool,
) {
    let nk = right.len();
    if parallel && nk > 0 {
        if let (Some(a_flat), Some(v_flat)) = (a.as_slice_mut(), v.as_slice()) {
            // Row-major storage: one chunk per q row.
            use rayon::prelude::*;
            a_flat
                .par_chunks_mut(nk)
                .zip(v_flat.par_chunks(nk))
                .enumerate()
                .for_each(|(iq, (a_row, v_row))| {
                    let fq = left[iq];
                    for ((a, &v), &fp) in a_row.iter_mut().zip(v_row).zip(right.iter()) {
                        *a = v * fq * fp;
                    }
                });
            return;
        }
    }
    Zip::from(a.rows_mut())
        .and(v.rows())
        .and(&left)
        .for_each(|a_row, v_row, &fq| fill_row(a_row, v_row, fq, right));
}

#[inline]
fn fill_row(a_row: ArrayViewMut1<f64>, v_row: ArrayView1<f64>, fq: f64, right: ArrayView1<f64>) {
    Zip::from(a_row)
        .and(v_row)
        .and(right)
        .for_each(|a, &v, &fp| *a = v * fq * fp);
}

/// T1..T3, one value per shell.
#[derive(Debug, Clone)]
pub struct ShellAccumulators {
    pub t1: Array1<f64>,
    pub t2: Array1<f64>,
    pub t3: Array1<f64>,
}

impl ShellAccumulators {
    pub fn zeros(nk: usize) -> Self {
        ShellAccumulators {
            t1: Array1::zeros(nk),
            t2: Array1::zeros(nk),
            t3: Array1::zeros(nk),
        }
    }

    /// Run the three-channel recurrence over `arrays`.
    pub fn reduce(&mut self, arrays: &InteractionArrays) -> MctResult<()> {
        bengtzelius3(
            &arrays.a1,
            &arrays.a2,
            &arrays.a3,
            &mut self.t1,
            &mut self.t2,
            &mut self.t3,
        )
    }

    /// out\[k\] = k·T1\[k\] + T2\[k\]/k³ + T3\[k\]/k
    pub fn combine_into(&self, k: &Array1<f64>, out: &mut Array1<f64>) -> MctResult<()> {
        if k.len() != self.t1.len() || out.len() != self.t1.len() {
            return Err(MctError::ShapeMismatch {
                what: "kernel output".to_string(),
                expected: format!("{} shells", self.t1.len()),
                got: format!("grid {}, output {}", k.len(), out.len()),
            });
        }
        Zip::from(out)
            .and(k)
            .and(&self.t1)
            .and(&self.t2)
            .and(&self.t3)
            .for_each(|o, &k, &t1, &t2, &t3| *o = k * t1 + t2 / (k * k * k) + t3 / k);
        Ok(())
    }
}
