// src/lib.rs

//! `qaoa2sat` - Single-layer QAOA for small Max-2-SAT instances
//!
//! This library builds the phase separator for a fixed set of boolean
//! expressions, wraps it in a QAOA circuit (uniform superposition, separator,
//! `Rx` mixer) and samples that circuit on a local state-vector simulator,
//! with or without a device-like noise model.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod validation;
pub mod separator;
pub mod qaoa;
pub mod sampling;
pub mod config;

// Re-export the most common types for easier top-level use
pub use core::{QaoaError, QubitId, Result, StateVector};
pub use operations::Operation;
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{
    Backend, BackendKind, MeasurementResult, NoiseProfile, NoisySimulator, RunResult, StatevectorSimulator,
};
pub use validation::{check_normalization, check_qubit_bounds};
pub use separator::{BooleanExpression, SeparatorBuilder, SeparatorCircuit};
pub use qaoa::QaoaAssembler;
pub use sampling::{SamplingEvaluator, SamplingReport};
pub use config::QaoaConfig;

// Example 1: Deterministic single-literal run
// With gamma = pi/2 the separator turns |+> into (|0> - i|1>)/sqrt(2), and a
// mixer angle of beta = pi/4 rotates that exactly onto |1>.
/// ```
/// use qaoa2sat::{BooleanExpression, QaoaAssembler, QaoaError, SeparatorBuilder};
/// use std::f64::consts::PI;
///
/// fn main() -> Result<(), QaoaError> {
///     let separator = SeparatorBuilder::build(BooleanExpression::SingleLiteral, PI / 2.0)?;
///     let assembler = QaoaAssembler::with_seed(Some(7));
///
///     let (circuit, bits) = assembler.assemble_and_run(&separator, 1, PI / 4.0, false)?;
///     println!("Circuit:\n{}", circuit);
///     assert_eq!(bits.as_str(), "1");
///
///     // Rotating the other way lands on |0>
///     let (_, bits) = assembler.assemble_and_run(&separator, 1, 3.0 * PI / 4.0, false)?;
///     assert_eq!(bits.as_str(), "0");
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Four-clause chain, parsed from text
/// ```
/// use qaoa2sat::{QaoaAssembler, QaoaError, SeparatorBuilder};
/// use std::f64::consts::PI;
///
/// fn main() -> Result<(), QaoaError> {
///     let separator = SeparatorBuilder::build_from_str(
///         "(x_0 ^ x_1) ^ (x_1 ^ x_2) ^ (x_2 ^ x_3) ^ (x_3 ^ x_4)",
///         PI / 4.0,
///     )?;
///     assert_eq!(separator.num_qubits(), 6);
///
///     let (_, bits) = QaoaAssembler::new().assemble_and_run(&separator, 5, PI / 2.0, false)?;
///     assert_eq!(bits.len(), 5);
///     assert!(bits.as_str().chars().all(|c| c == '0' || c == '1'));
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = ();
