pub mod preflight;
pub mod types;

pub use preflight::{clamp_gas, decide, run_preflight};
pub use types::{PreflightConfig, PreflightReport};
