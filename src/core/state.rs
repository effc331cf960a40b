// src/core/state.rs

use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// Amplitudes of an `n`-qubit register over the computational basis.
///
/// Basis index `k` encodes qubit `i` in bit `i` of `k`, so qubit 0 is the
/// least significant bit. This is the same ordering the classical register
/// uses when it is rendered as a bitstring (slot 0 rightmost).
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
    num_qubits: usize,
}

impl StateVector {
    /// Creates a state from raw amplitudes. The length must be `2^num_qubits`;
    /// callers inside the crate guarantee this.
    pub(crate) fn new(amplitudes: Vec<Complex<f64>>, num_qubits: usize) -> Self {
        debug_assert_eq!(amplitudes.len(), 1usize << num_qubits);
        Self { amplitudes, num_qubits }
    }

    /// The all-zero basis state |0...0>.
    pub(crate) fn zero_state(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex::zero(); 1usize << num_qubits];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Self { amplitudes, num_qubits }
    }

    /// Provides read-only access to the amplitudes.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Provides mutable access for the simulation engine to modify the state.
    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Number of basis states (`2^n`).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits the state describes.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Probability of observing qubit `qubit` in |1>.
    pub fn probability_of_one(&self, qubit: usize) -> f64 {
        let mask = 1usize << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(k, _)| k & mask != 0)
            .map(|(_, c)| c.norm_sqr())
            .sum()
    }

    /// Squared norm, which stays 1 for every valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}
