// src/validation/mod.rs

//! Consistency checks on states and operations.

use crate::core::{QaoaError, QubitId, Result, StateVector, NORM_TOLERANCE};
use crate::operations::Operation;
use std::collections::HashSet;

/// Checks that the squared state norm is 1 within `tolerance`
/// (defaults to [`NORM_TOLERANCE`]).
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QaoaError::Incoherence)` otherwise.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(QaoaError::Incoherence {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that every qubit in `ops` lies inside a register of `num_qubits`.
pub fn check_qubit_bounds(ops: &[Operation], num_qubits: usize) -> Result<()> {
    for op in ops {
        if let Some(qubit) = op.involved_qubits().into_iter().find(|q| q.index() >= num_qubits) {
            return Err(QaoaError::InvalidQubit { qubit, num_qubits });
        }
    }
    Ok(())
}

/// Validates a single operation against the register it is placed in:
/// qubit bounds, classical slot bounds and repeated qubits within one gate.
pub fn check_operation(op: &Operation, num_qubits: usize, num_clbits: usize) -> Result<()> {
    let qubits = op.involved_qubits();
    if let Some(qubit) = qubits.iter().find(|q| q.index() >= num_qubits) {
        return Err(QaoaError::InvalidQubit { qubit: *qubit, num_qubits });
    }

    let mut seen: HashSet<QubitId> = HashSet::with_capacity(qubits.len());
    if let Some(dup) = qubits.iter().find(|q| !seen.insert(**q)) {
        return Err(QaoaError::invalid_operation(format!(
            "Qubit {} appears more than once in '{}'",
            dup,
            op.name()
        )));
    }

    match op {
        Operation::Measure { clbit, .. } if *clbit >= num_clbits => Err(QaoaError::invalid_operation(format!(
            "Classical slot {} out of range for {} slots",
            clbit, num_clbits
        ))),
        Operation::Rx { theta, .. } | Operation::MultiControlledPhase { theta, .. } if !theta.is_finite() => {
            Err(QaoaError::invalid_operation(format!("Angle {} for '{}' is not finite", theta, op.name())))
        }
        _ => Ok(()),
    }
}
