//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Index of a qubit inside a circuit register.
/// Qubit `0` is the first primary qubit; the helper qubit of a QAOA circuit
/// is always the last index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl QubitId {
    /// Position of this qubit in the register.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, QaoaError>;

/// Errors raised while building or running QAOA circuits.
///
/// Every variant is terminal for the invocation that produced it; nothing in
/// the crate retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QaoaError {
    /// The expression identifier has no entry in the separator table.
    #[error("Unsupported boolean expression: '{expression}'")]
    UnsupportedExpression {
        /// The expression as supplied by the caller
        expression: String,
    },

    /// The declared number of primary qubits disagrees with the separator.
    #[error("Qubit count mismatch: separator expects {expected} primary qubits, got {actual}")]
    QubitCountMismatch {
        /// Primary qubits implied by the separator (its width minus the helper)
        expected: usize,
        /// Primary qubits requested by the caller
        actual: usize,
    },

    /// The simulation backend failed or returned no sample.
    #[error("Backend failure: {message}")]
    BackendFailure {
        /// What the backend reported
        message: String,
    },

    /// An operation references a qubit outside the register.
    #[error("Invalid qubit {qubit}: register has only {num_qubits} qubits")]
    InvalidQubit {
        /// Offending qubit
        qubit: QubitId,
        /// Width of the register
        num_qubits: usize,
    },

    /// An operation is malformed for the circuit it is placed in.
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// The state vector lost its normalization during simulation.
    #[error("Incoherence: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },
}

impl QaoaError {
    /// Wraps any displayable backend problem as a `BackendFailure`.
    pub fn backend(message: impl Into<String>) -> Self {
        QaoaError::BackendFailure { message: message.into() }
    }

    /// Creates an `InvalidOperation` error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        QaoaError::InvalidOperation { message: message.into() }
    }
}
