// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{GRID_RELATIVE_TOLERANCE, MIN_GRID_LEN};
use crate::error::{MctError, MctResult};
use ndarray::Array1;

fn rejected(err: MctError) -> MctError {
    log::warn!("wavenumber grid rejected: {err}");
    err
}

/// Cell-centered uniform wavenumber grid.
///
/// Shell `i` (zero-based) sits at `(i + 1/2) * dk`. Immutable once built.
#[derive(Debug, Clone)]
pub struct WavenumberGrid {
    k: Array1<f64>,
    dk: f64,
}

impl WavenumberGrid {
    /// Validate an explicit list of shell centers.
    ///
    /// Rejects grids shorter than 2, non-uniform spacing and a first
    /// element that is not Δk/2.
    pub fn new(k: Array1<f64>) -> MctResult<Self> {
        if k.len() < MIN_GRID_LEN {
            return Err(rejected(MctError::ConfigError(format!(
                "wavenumber grid needs at least {MIN_GRID_LEN} shells, got {}",
                k.len()
            ))));
        }
        if k.iter().any(|v| !v.is_finite()) {
            return Err(rejected(MctError::ConfigError(
                "wavenumber grid contains non-finite values".to_string(),
            )));
        }
        let dk = k[1] - k[0];
        if dk <= 0.0 {
            return Err(rejected(MctError::ConfigError(format!(
                "wavenumber grid must be strictly increasing, got dk={dk}"
            ))));
        }

        let tol = GRID_RELATIVE_TOLERANCE * dk;
        if (k[0] - 0.5 * dk).abs() > tol {
            return Err(rejected(MctError::GridNotCellCentered {
                first: k[0],
                expected: 0.5 * dk,
            }));
        }
        for i in 1..k.len() {
            let spacing = k[i] - k[i - 1];
            if (spacing - dk).abs() > tol {
                return Err(rejected(MctError::NonUniformGrid {
                    index: i,
                    spacing,
                    expected: dk,
                }));
            }
        }

        Ok(WavenumberGrid { k, dk })
    }

    /// Build `nk` shells of width `dk` starting at `dk / 2`.
    pub fn uniform(nk: usize, dk: f64) -> MctResult<Self> {
        if !dk.is_finite() || dk <= 0.0 {
            return Err(rejected(MctError::ConfigError(format!(
                "grid spacing must be finite and > 0, got {dk}"
            ))));
        }
        Self::new(Array1::from_shape_fn(nk, |i| (i as f64 + 0.5) * dk))
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    pub fn dk(&self) -> f64 {
        self.dk
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.k
    }
}

/// Static structure factor S(k), aligned index-for-index with a grid.
#[derive(Debug, Clone)]
pub struct StructureFactor {
    values: Array1<f64>,
}

impl StructureFactor {
    pub fn new(values: Array1<f64>) -> Self {
        StructureFactor { values }
    }

    /// Same value on every shell of `grid`.
    pub fn constant(grid: &WavenumberGrid, s: f64) -> Self {
        StructureFactor {
            values: Array1::from_elem(grid.len(), s),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn ensure_matches(&self, grid: &WavenumberGrid) -> MctResult<()> {
        if self.values.len() != grid.len() {
            log::warn!(
                "structure factor has {} values for a {}-shell grid",
                self.values.len(),
                grid.len()
            );
            return Err(MctError::ShapeMismatch {
                what: "structure factor".to_string(),
                expected: format!("{} shells", grid.len()),
                got: format!("{} values", self.values.len()),
            });
        }
        Ok(())
    }
}
