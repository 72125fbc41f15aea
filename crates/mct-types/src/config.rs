// ─────────────────────────────────────────────────────────────────────
// SCPN MCT Kernels — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::SUPPORTED_DIMS;
use crate::error::{MctError, MctResult};
use crate::state::WavenumberGrid;
use serde::{Deserialize, Serialize};

/// Physical parameters shared by the mode-coupling kernels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KernelParams {
    /// Number density ρ.
    pub density: f64,
    /// Thermal energy kBT.
    #[serde(rename = "kBT")]
    pub thermal_energy: f64,
    /// Particle mass m.
    pub particle_mass: f64,
    /// Spatial dimensionality. Only 3 is supported.
    #[serde(default = "default_dims")]
    pub dims: usize,
}

fn default_dims() -> usize {
    SUPPORTED_DIMS
}

impl KernelParams {
    /// Three-dimensional parameter set.
    pub fn new(density: f64, thermal_energy: f64, particle_mass: f64) -> Self {
        KernelParams {
            density,
            thermal_energy,
            particle_mass,
            dims: SUPPORTED_DIMS,
        }
    }

    pub fn validate(&self) -> MctResult<()> {
        if self.dims != SUPPORTED_DIMS {
            log::warn!("rejecting kernel parameters with dims={}", self.dims);
            return Err(MctError::UnsupportedDimension { dims: self.dims });
        }
        for (name, value) in [
            ("density", self.density),
            ("kBT", self.thermal_energy),
            ("particle_mass", self.particle_mass),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MctError::ConfigError(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Diffusion scale D₀ = kBT / m.
    pub fn diffusion_scale(&self) -> f64 {
        self.thermal_energy / self.particle_mass
    }
}

/// Cell-centered grid description: `nk` shells of width `dk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSpec {
    pub nk: usize,
    pub dk: f64,
}

/// Top-level kernel configuration, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(flatten)]
    pub params: KernelParams,
    pub grid: GridSpec,
}

impl KernelConfig {
    pub fn new(params: KernelParams, grid: GridSpec) -> Self {
        KernelConfig { params, grid }
    }

    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> MctResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MctResult<()> {
        self.params.validate()
    }

    pub fn create_grid(&self) -> MctResult<WavenumberGrid> {
        WavenumberGrid::uniform(self.grid.nk, self.grid.dk)
    }
}
