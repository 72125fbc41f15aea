//! Mathematical primitives for SCPN MCT Kernels.

pub mod bengtzelius;
pub mod diagonal;
