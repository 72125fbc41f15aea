//! Direct-correlation proxy c(k) = (S(k) − 1) / (ρ S(k)).

use mct_types::error::{MctError, MctResult};
use mct_types::state::StructureFactor;
use ndarray::Array1;

pub fn coupling_coefficients(sk: &StructureFactor, density: f64) -> MctResult<Array1<f64>> {
    if !density.is_finite() || density <= 0.0 {
        return Err(MctError::ConfigError(format!(
            "density must be finite and > 0, got {density}"
        )));
    }
    let ck = sk.values().mapv(|s| (s - 1.0) / (density * s));
    if let Some(i) = ck.iter().position(|c| !c.is_finite()) {
        log::warn!("structure factor S[{i}]={} gives non-finite c(k)", sk.values()[i]);
        return Err(MctError::ConfigError(format!(
            "coupling coefficient at shell {i} is non-finite (S={})",
            sk.values()[i]
        )));
    }
    Ok(ck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_constant_structure_factor() {
        let sk = StructureFactor::new(Array1::from_elem(100, 2.0));
        let ck = coupling_coefficients(&sk, 1.0).unwrap();
        assert!(ck.iter().all(|&c| (c - 0.5).abs() < 1e-15));
    }

    #[test]
    fn test_ideal_gas_has_no_coupling() {
        let sk = StructureFactor::new(Array1::ones(8));
        let ck = coupling_coefficients(&sk, 0.7).unwrap();
        assert!(ck.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn test_density_scaling() {
        let sk = StructureFactor::new(array![0.5, 2.0, 4.0]);
        let ck = coupling_coefficients(&sk, 2.0).unwrap();
        assert!((ck[0] - (-0.5)).abs() < 1e-15);
        assert!((ck[1] - 0.25).abs() < 1e-15);
        assert!((ck[2] - 0.375).abs() < 1e-15);
    }

    #[test]
    fn test_rejects_zero_structure_factor() {
        let sk = StructureFactor::new(array![1.0, 0.0, 1.0]);
        assert!(matches!(
            coupling_coefficients(&sk, 1.0),
            Err(MctError::ConfigError(_))
        ));
        let sk = StructureFactor::new(array![1.0]);
        assert!(coupling_coefficients(&sk, 0.0).is_err());
    }
}
