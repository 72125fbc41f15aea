//! Mode-coupling memory kernels and the linear equation container.
//!
//! Construction: grid + S(k) → coupling coefficients → vertex matrices.
//! Per call: field → interaction arrays → Bengtzelius recurrence → kernel.

pub mod coupling;
pub mod equation;
pub mod interaction;
pub mod kernel;
pub mod mode_coupling;
pub mod msd;
pub mod schematic;
pub mod tagged;
pub mod trajectory;
pub mod vertex;
