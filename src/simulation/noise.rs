//! Noise model used by the noisy backend.
//!
//! Noise is sampled per trajectory (Monte Carlo) instead of evolving a density
//! matrix: after each gate every touched qubit independently suffers a
//! depolarizing Pauli error, and every measured bit may be flipped by an
//! asymmetric readout error.

use crate::core::{QaoaError, Result};

/// Pauli error sampled from a depolarizing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauliError {
    /// No error
    Identity,
    /// Bit flip
    X,
    /// Bit and phase flip
    Y,
    /// Phase flip
    Z,
}

/// Depolarizing channel with total error probability `p`, split evenly
/// between X, Y and Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepolarizingError {
    error_prob: f64,
}

impl DepolarizingError {
    /// Creates the channel, rejecting probabilities outside `[0, 1]`.
    pub fn new(error_prob: f64) -> Result<Self> {
        check_probability("depolarizing error", error_prob)?;
        Ok(Self { error_prob })
    }

    /// Total error probability.
    pub fn error_probability(&self) -> f64 {
        self.error_prob
    }

    /// Maps a uniform sample from `[0, 1)` to the Pauli error it selects.
    pub fn sample(&self, random_value: f64) -> PauliError {
        let p = self.error_prob;
        if random_value < 1.0 - p {
            PauliError::Identity
        } else if random_value < 1.0 - p + p / 3.0 {
            PauliError::X
        } else if random_value < 1.0 - p + 2.0 * p / 3.0 {
            PauliError::Y
        } else {
            PauliError::Z
        }
    }
}

/// Classical readout error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadoutError {
    /// P(read 1 | state is 0)
    p01: f64,
    /// P(read 0 | state is 1)
    p10: f64,
}

impl ReadoutError {
    /// Creates the error, rejecting probabilities outside `[0, 1]`.
    pub fn new(p01: f64, p10: f64) -> Result<Self> {
        check_probability("readout p01", p01)?;
        check_probability("readout p10", p10)?;
        Ok(Self { p01, p10 })
    }

    /// P(read 1 | state is 0)
    pub fn p01(&self) -> f64 {
        self.p01
    }

    /// P(read 0 | state is 1)
    pub fn p10(&self) -> f64 {
        self.p10
    }

    /// Whether a measured `bit` gets flipped for the given uniform sample.
    pub fn should_flip(&self, bit: u8, random_value: f64) -> bool {
        if bit == 1 {
            random_value < self.p10
        } else {
            random_value < self.p01
        }
    }
}

/// Fixed error rates of a simulated device.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseProfile {
    name: String,
    num_qubits: usize,
    single_qubit: DepolarizingError,
    multi_qubit: DepolarizingError,
    readout: ReadoutError,
}

impl NoiseProfile {
    /// Builds a custom profile.
    pub fn new(
        name: impl Into<String>,
        num_qubits: usize,
        single_qubit_error: f64,
        multi_qubit_error: f64,
        readout: ReadoutError,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            num_qubits,
            single_qubit: DepolarizingError::new(single_qubit_error)?,
            multi_qubit: DepolarizingError::new(multi_qubit_error)?,
            readout,
        })
    }

    /// Error rates in the range of a small 7-qubit superconducting device:
    /// 0.05% single-qubit gate error, 1% multi-qubit gate error and a few
    /// percent readout error biased towards decaying 1 -> 0.
    pub fn seven_qubit_device() -> Self {
        Self {
            name: "fake_7q_device".to_string(),
            num_qubits: 7,
            single_qubit: DepolarizingError { error_prob: 0.0005 },
            multi_qubit: DepolarizingError { error_prob: 0.01 },
            readout: ReadoutError { p01: 0.02, p10: 0.04 },
        }
    }

    /// Device name reported by the backend.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits the device has.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Channel applied after single-qubit gates.
    pub fn single_qubit_error(&self) -> &DepolarizingError {
        &self.single_qubit
    }

    /// Channel applied after multi-qubit gates.
    pub fn multi_qubit_error(&self) -> &DepolarizingError {
        &self.multi_qubit
    }

    /// Readout error applied to every measured bit.
    pub fn readout_error(&self) -> &ReadoutError {
        &self.readout
    }
}

fn check_probability(what: &str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(QaoaError::invalid_operation(format!("{} must be in [0,1], got {}", what, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depolarizing_sample_partitions() -> Result<()> {
        let channel = DepolarizingError::new(0.3)?;
        assert_eq!(channel.sample(0.0), PauliError::Identity);
        assert_eq!(channel.sample(0.69), PauliError::Identity);
        assert_eq!(channel.sample(0.75), PauliError::X);
        assert_eq!(channel.sample(0.85), PauliError::Y);
        assert_eq!(channel.sample(0.95), PauliError::Z);
        Ok(())
    }

    #[test]
    fn test_readout_error_should_flip() -> Result<()> {
        let channel = ReadoutError::new(0.1, 0.2)?;
        assert!(channel.should_flip(0, 0.05));
        assert!(!channel.should_flip(0, 0.15));
        assert!(channel.should_flip(1, 0.15));
        assert!(!channel.should_flip(1, 0.25));
        Ok(())
    }

    #[test]
    fn test_invalid_probabilities() {
        assert!(DepolarizingError::new(1.5).is_err());
        assert!(ReadoutError::new(-0.1, 0.1).is_err());
    }

    #[test]
    fn test_seven_qubit_device_fits_largest_separator() {
        let profile = NoiseProfile::seven_qubit_device();
        assert!(profile.num_qubits() >= 6);
        assert!(profile.multi_qubit_error().error_probability() > profile.single_qubit_error().error_probability());
    }
}
