// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;
pub mod constants;

// Re-export public types for convenient access via `qaoa2sat::core::TypeName`
pub use error::{QaoaError, QubitId, Result};
pub use state::StateVector;
pub use constants::qaoa_constants::{AMPLITUDE_TOLERANCE, NORM_TOLERANCE, PI};
