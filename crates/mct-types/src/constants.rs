// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Spatial dimensionality supported by the vertex derivations.
pub const SUPPORTED_DIMS: usize = 3;

/// Minimum number of shells; Δk is undefined below this.
pub const MIN_GRID_LEN: usize = 2;

/// Relative tolerance (in units of Δk) for the uniform-spacing and
/// cell-centering checks. Same order as sqrt(f64::EPSILON).
pub const GRID_RELATIVE_TOLERANCE: f64 = 1e-8;
