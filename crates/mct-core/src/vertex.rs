// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — Vertex Matrices
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Precomputed vertex matrices for the three symmetry channels.
//!
//! With p = |k − q| and the cell-centered triangle sum handled by the
//! Bengtzelius recurrence, the squared vertex splits into powers of k:
//!
//!   channel 1 → multiplied by k
//!   channel 2 → multiplied by 1/k³, carries (q² − p²)²
//!   channel 3 → multiplied by 1/k,  carries (q² − p²)
//!
//! Coherent and tagged vertices are separate derivations: different
//! angular prefactor (8π² vs 4π²) and different c-polynomials.

use mct_types::config::KernelParams;
use mct_types::error::MctResult;
use mct_types::state::WavenumberGrid;
use ndarray::{Array1, Array2};
use std::f64::consts::PI;

/// Immutable V1, V2, V3 (Nk×Nk each), indexed `[q, p]`.
#[derive(Debug, Clone)]
pub struct VertexMatrices {
    pub v1: Array2<f64>,
    pub v2: Array2<f64>,
    pub v3: Array2<f64>,
}

impl VertexMatrices {
    /// Coherent (self) vertex: prefactor D₀ρΔk² / (8π²).
    pub fn coherent(
        params: &KernelParams,
        grid: &WavenumberGrid,
        ck: &Array1<f64>,
    ) -> MctResult<Self> {
        params.validate()?;
        let prefactor =
            params.diffusion_scale() * params.density * grid.dk() * grid.dk() / (8.0 * PI * PI);
        let k = grid.values();
        let nk = grid.len();

        let mut v1 = Array2::zeros((nk, nk));
        let mut v2 = Array2::zeros((nk, nk));
        let mut v3 = Array2::zeros((nk, nk));
        for iq in 0..nk {
            let q = k[iq];
            let cq = ck[iq];
            for ip in 0..nk {
                let p = k[ip];
                let cp = ck[ip];
                let pq = p * q * prefactor;
                let dsq = q * q - p * p;
                v1[[iq, ip]] = pq * (cp + cq).powi(2) / 4.0;
                v2[[iq, ip]] = pq * dsq * dsq * (cq - cp).powi(2) / 4.0;
                v3[[iq, ip]] = pq * dsq * (cq * cq - cp * cp) / 2.0;
            }
        }
        Ok(VertexMatrices { v1, v2, v3 })
    }

    /// Tagged (cross) vertex: prefactor D₀ρΔk² / (4π²), only c(q) enters.
    ///
    /// `q` indexes the coherent field, `p` the tagged field.
    pub fn tagged(
        params: &KernelParams,
        grid: &WavenumberGrid,
        ck: &Array1<f64>,
    ) -> MctResult<Self> {
        params.validate()?;
        let prefactor =
            params.diffusion_scale() * params.density * grid.dk() * grid.dk() / (4.0 * PI * PI);
        let k = grid.values();
        let nk = grid.len();

        let mut v1 = Array2::zeros((nk, nk));
        let mut v2 = Array2::zeros((nk, nk));
        let mut v3 = Array2::zeros((nk, nk));
        for iq in 0..nk {
            let q = k[iq];
            let cq2 = ck[iq] * ck[iq];
            for ip in 0..nk {
                let p = k[ip];
                let pq = p * q * prefactor;
                let dsq = q * q - p * p;
                v1[[iq, ip]] = pq * cq2 / 4.0;
                v2[[iq, ip]] = pq * dsq * dsq * cq2 / 4.0;
                v3[[iq, ip]] = pq * dsq * cq2 / 2.0;
            }
        }
        Ok(VertexMatrices { v1, v2, v3 })
    }

    pub fn len(&self) -> usize {
        self.v1.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.v1.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupling::coupling_coefficients;
    use mct_types::error::MctError;
    use mct_types::state::StructureFactor;

    fn setup(nk: usize, dk: f64) -> (KernelParams, WavenumberGrid, Array1<f64>) {
        let params = KernelParams::new(1.0, 1.0, 1.0);
        let grid = WavenumberGrid::uniform(nk, dk).unwrap();
        let sk = StructureFactor::new(Array1::from_shape_fn(nk, |i| {
            1.0 + 0.8 * ((i as f64 + 0.5) * dk).sin() / ((i as f64 + 0.5) * dk)
        }));
        let ck = coupling_coefficients(&sk, params.density).unwrap();
        (params, grid, ck)
    }

    #[test]
    fn test_coherent_channels_symmetric() {
        let (params, grid, ck) = setup(30, 0.3);
        let v = VertexMatrices::coherent(&params, &grid, &ck).unwrap();
        for i in 0..30 {
            for j in 0..30 {
                for m in [&v.v1, &v.v2, &v.v3] {
                    let scale = 1e-12 * (1.0 + m[[i, j]].abs());
                    assert!((m[[i, j]] - m[[j, i]]).abs() < scale);
                }
            }
        }
    }

    #[test]
    fn test_coherent_constant_ck() {
        // c ≡ 0.5: channels 2 and 3 vanish, channel 1 = p q c² D₀ρΔk²/(8π²)
        let params = KernelParams::new(1.0, 1.0, 1.0);
        let grid = WavenumberGrid::uniform(100, 0.4).unwrap();
        let ck = Array1::from_elem(100, 0.5);
        let v = VertexMatrices::coherent(&params, &grid, &ck).unwrap();

        let k = grid.values();
        let pref = 0.16 / (8.0 * PI * PI);
        for (iq, ip) in [(0usize, 0usize), (3, 17), (99, 42)] {
            let expected = k[iq] * k[ip] * pref * 0.25;
            assert!((v.v1[[iq, ip]] - expected).abs() < 1e-12 * expected);
            assert_eq!(v.v2[[iq, ip]], 0.0);
            assert_eq!(v.v3[[iq, ip]], 0.0);
        }
        assert!(v.v1.iter().all(|&x| x > 0.0));
    }

    #[test]
    fn test_tagged_depends_only_on_cq() {
        let (params, grid, ck) = setup(12, 0.5);
        let v = VertexMatrices::tagged(&params, &grid, &ck).unwrap();
        let k = grid.values();
        let pref = params.diffusion_scale() * params.density * 0.25 / (4.0 * PI * PI);
        for iq in 0..12 {
            for ip in 0..12 {
                let base = k[iq] * k[ip] * pref * ck[iq] * ck[iq];
                let dsq = k[iq] * k[iq] - k[ip] * k[ip];
                assert!((v.v1[[iq, ip]] - base / 4.0).abs() < 1e-14);
                assert!((v.v2[[iq, ip]] - base * dsq * dsq / 4.0).abs() < 1e-12);
                assert!((v.v3[[iq, ip]] - base * dsq / 2.0).abs() < 1e-12);
            }
        }
        // Diagonal of the difference channels is zero (q = p)
        for i in 0..12 {
            assert_eq!(v.v2[[i, i]], 0.0);
            assert_eq!(v.v3[[i, i]], 0.0);
        }
    }

    #[test]
    fn test_tagged_prefactor_twice_coherent_for_channel_one() {
        // Same c on every shell: (cp + cq)²/4 = c², tagged has c²/4 at 4π².
        let params = KernelParams::new(0.8, 2.0, 1.5);
        let grid = WavenumberGrid::uniform(8, 0.25).unwrap();
        let ck = Array1::from_elem(8, -0.7);
        let coherent = VertexMatrices::coherent(&params, &grid, &ck).unwrap();
        let tagged = VertexMatrices::tagged(&params, &grid, &ck).unwrap();
        for iq in 0..8 {
            for ip in 0..8 {
                let ratio = coherent.v1[[iq, ip]] / tagged.v1[[iq, ip]];
                assert!((ratio - 2.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rejects_non_3d() {
        let (mut params, grid, ck) = setup(4, 1.0);
        params.dims = 2;
        assert!(matches!(
            VertexMatrices::coherent(&params, &grid, &ck),
            Err(MctError::UnsupportedDimension { dims: 2 })
        ));
        assert!(VertexMatrices::tagged(&params, &grid, &ck).is_err());
    }
}
