// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — Bengtzelius Recurrence
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Bengtzelius recurrence for banded double sums on a cell-centered grid.
//!
//! For shell `k` (zero-based) the accumulator is
//!
//!   T\[k\] = Σ A\[q, p\]  over all (q, p) with |q − p| ≤ k and q + p ≥ k
//!
//! which is the discrete image of the triangle condition |q − p| < k < q + p
//! when every wavenumber sits at the center of its shell. Shell `k` differs
//! from shell `k − 1` by one new off-diagonal band (|q − p| = k) and one
//! anti-diagonal that drops out (q + p = k − 1), so the whole table costs
//! O(Nk²) instead of O(Nk³).
//!
//! The recurrence is sequential in `k`. NaN/Inf in `A` propagate.

use mct_types::error::{MctError, MctResult};
use ndarray::{Array1, Array2};

fn check_shapes(a: &Array2<f64>, t: &Array1<f64>, channel: usize) -> MctResult<usize> {
    let (rows, cols) = a.dim();
    if rows != cols || t.len() != rows {
        return Err(MctError::ShapeMismatch {
            what: format!("bengtzelius channel {channel}"),
            expected: format!("square array with accumulator of length {rows}"),
            got: format!("array {rows}x{cols}, accumulator {}", t.len()),
        });
    }
    Ok(rows)
}

/// Single-channel recurrence: reduce `a` (Nk×Nk) into `t` (Nk).
pub fn bengtzelius1(a: &Array2<f64>, t: &mut Array1<f64>) -> MctResult<()> {
    let nk = check_shapes(a, t, 1)?;
    if nk == 0 {
        return Ok(());
    }

    let mut acc = 0.0;
    for iq in 0..nk {
        acc += a[[iq, iq]];
    }
    t[0] = acc;

    for ik in 1..nk {
        // New band |q - p| = ik, both orderings.
        for iq in 0..nk - ik {
            let ip = iq + ik;
            acc += a[[iq, ip]] + a[[ip, iq]];
        }
        // Anti-diagonal q + p = ik - 1 leaves the window.
        for iq in 0..ik {
            acc -= a[[iq, ik - 1 - iq]];
        }
        t[ik] = acc;
    }
    Ok(())
}

/// Three-channel recurrence sharing the index arithmetic.
///
/// Same result as calling [`bengtzelius1`] on each pair separately.
pub fn bengtzelius3(
    a1: &Array2<f64>,
    a2: &Array2<f64>,
    a3: &Array2<f64>,
    t1: &mut Array1<f64>,
    t2: &mut Array1<f64>,
    t3: &mut Array1<f64>,
) -> MctResult<()> {
    let nk = check_shapes(a1, t1, 1)?;
    if check_shapes(a2, t2, 2)? != nk || check_shapes(a3, t3, 3)? != nk {
        return Err(MctError::ShapeMismatch {
            what: "bengtzelius channels".to_string(),
            expected: format!("all channels of size {nk}"),
            got: format!("sizes {nk}, {}, {}", a2.nrows(), a3.nrows()),
        });
    }
    if nk == 0 {
        return Ok(());
    }

    let (mut acc1, mut acc2, mut acc3) = (0.0, 0.0, 0.0);
    for iq in 0..nk {
        acc1 += a1[[iq, iq]];
        acc2 += a2[[iq, iq]];
        acc3 += a3[[iq, iq]];
    }
    t1[0] = acc1;
    t2[0] = acc2;
    t3[0] = acc3;

    for ik in 1..nk {
        for iq in 0..nk - ik {
            let ip = iq + ik;
            acc1 += a1[[iq, ip]] + a1[[ip, iq]];
            acc2 += a2[[iq, ip]] + a2[[ip, iq]];
            acc3 += a3[[iq, ip]] + a3[[ip, iq]];
        }
        for iq in 0..ik {
            let ip = ik - 1 - iq;
            acc1 -= a1[[iq, ip]];
            acc2 -= a2[[iq, ip]];
            acc3 -= a3[[iq, ip]];
        }
        t1[ik] = acc1;
        t2[ik] = acc2;
        t3[ik] = acc3;
    }
    Ok(())
}

/// Direct O(Nk³) evaluation of the banded sums. Reference for tests and
/// benchmarks; never used on the evaluation path.
pub fn banded_sum_reference(a: &Array2<f64>) -> Array1<f64> {
    let nk = a.nrows().min(a.ncols());
    let mut t = Array1::zeros(nk);
    for ik in 0..nk {
        let mut sum = 0.0;
        for iq in 0..nk {
            for ip in 0..nk {
                if iq.abs_diff(ip) <= ik && iq + ip >= ik {
                    sum += a[[iq, ip]];
                }
            }
        }
        t[ik] = sum;
    }
    t
}
