use thiserror::Error;

#[derive(Error, Debug)]
pub enum MctError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported dimensionality: dims={dims} (only 3 is supported)")]
    UnsupportedDimension { dims: usize },

    #[error("Wavenumber grid is not uniform at index {index}: spacing={spacing}, expected={expected}")]
    NonUniformGrid {
        index: usize,
        spacing: f64,
        expected: f64,
    },

    #[error("Wavenumber grid is not cell-centered: first={first}, expected dk/2={expected}")]
    GridNotCellCentered { first: f64, expected: f64 },

    #[error("Shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: String,
        expected: String,
        got: String,
    },

    #[error("Time t={t} is not a sampled point of the trajectory")]
    TimeNotSampled { t: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type MctResult<T> = Result<T, MctError>;
