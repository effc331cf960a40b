// src/simulation/engine.rs
use crate::core::{QaoaError, Result, StateVector, AMPLITUDE_TOLERANCE};
use crate::operations::Operation;
use crate::simulation::noise::PauliError;
use num_complex::Complex;
use num_traits::Zero; // For Complex::zero()
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::trace;

/// Largest register the dense engine accepts; 2^24 amplitudes is ~256 MiB.
pub(crate) const MAX_QUBITS: usize = 24;

type Matrix2 = [[Complex<f64>; 2]; 2];

/// Dense state-vector engine holding the quantum state and the classical
/// register of one shot. (Internal visibility)
#[derive(Debug)]
pub(crate) struct SimulationEngine {
    state: StateVector,
    num_qubits: usize,
    clbits: Vec<u8>,
}

impl SimulationEngine {
    /// Initializes the engine in |0...0> with all classical slots cleared.
    pub(crate) fn init(num_qubits: usize, num_clbits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QaoaError::invalid_operation("Cannot initialize simulation engine with zero qubits"));
        }
        if num_qubits > MAX_QUBITS {
            return Err(QaoaError::backend(format!(
                "{} qubits exceed the dense simulator limit of {}",
                num_qubits, MAX_QUBITS
            )));
        }

        Ok(Self {
            state: StateVector::zero_state(num_qubits),
            num_qubits,
            clbits: vec![0; num_clbits],
        })
    }

    // Add a crate-visible method to set the state directly for testing
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<()> {
        if state.dim() != self.state.dim() {
            Err(QaoaError::backend(format!(
                "Cannot set state: provided dimension {} does not match engine dimension {}",
                state.dim(),
                self.state.dim()
            )))
        } else {
            self.state = state;
            Ok(())
        }
    }

    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    /// The classical register, slot 0 first.
    pub(crate) fn classical_bits(&self) -> &[u8] {
        &self.clbits
    }

    /// Applies one operation. Measurements record their outcome directly into
    /// the classical register; callers that need to post-process readout
    /// should use [`SimulationEngine::measure`] and [`SimulationEngine::record`].
    pub(crate) fn apply_operation(&mut self, op: &Operation, rng: &mut StdRng) -> Result<()> {
        trace!(gate = op.name(), qubits = ?op.involved_qubits(), "applying operation");
        match op {
            Operation::Reset { targets } => {
                for q in targets {
                    self.reset(self.checked_index(q.index())?, rng)?;
                }
            }
            Operation::Hadamard { target } => {
                self.apply_single_qubit_gate(self.checked_index(target.index())?, &hadamard_matrix());
            }
            Operation::PauliX { target } => {
                self.apply_single_qubit_gate(self.checked_index(target.index())?, &pauli_x_matrix());
            }
            Operation::Rx { target, theta } => {
                self.apply_single_qubit_gate(self.checked_index(target.index())?, &rx_matrix(*theta));
            }
            Operation::MultiControlledPhase { controls, target, theta } => {
                let mut mask = 1usize << self.checked_index(target.index())?;
                for c in controls {
                    mask |= 1usize << self.checked_index(c.index())?;
                }
                self.apply_controlled_phase(mask, *theta);
            }
            Operation::Measure { qubit, clbit } => {
                let outcome = self.measure(qubit.index(), rng)?;
                self.record(*clbit, outcome)?;
            }
            Operation::Barrier { .. } => {}
        }
        Ok(())
    }

    /// Applies a Pauli error to `target`.
    pub(crate) fn apply_pauli(&mut self, target: usize, pauli: PauliError) -> Result<()> {
        let target = self.checked_index(target)?;
        match pauli {
            PauliError::Identity => {}
            PauliError::X => self.apply_single_qubit_gate(target, &pauli_x_matrix()),
            PauliError::Y => self.apply_single_qubit_gate(target, &pauli_y_matrix()),
            PauliError::Z => self.apply_controlled_phase(1usize << target, std::f64::consts::PI),
        }
        Ok(())
    }

    /// Projective measurement of `qubit` in the computational basis.
    ///
    /// Samples the outcome from the Born distribution, collapses the state
    /// onto it and renormalizes. Returns the outcome bit.
    pub(crate) fn measure(&mut self, qubit: usize, rng: &mut StdRng) -> Result<u8> {
        let qubit = self.checked_index(qubit)?;
        let p_one = self.state.probability_of_one(qubit);
        let outcome: u8 = if uniform(rng) < p_one { 1 } else { 0 };
        let p_outcome = if outcome == 1 { p_one } else { 1.0 - p_one };

        if p_outcome < AMPLITUDE_TOLERANCE {
            return Err(QaoaError::Incoherence {
                message: format!("Measured outcome {} on qubit {} has vanishing probability {}", outcome, qubit, p_outcome),
            });
        }

        let mask = 1usize << qubit;
        let scale = 1.0 / p_outcome.sqrt();
        for (k, amp) in self.state.vector_mut().iter_mut().enumerate() {
            let bit = u8::from(k & mask != 0);
            if bit == outcome {
                *amp *= scale;
            } else {
                *amp = Complex::zero();
            }
        }
        Ok(outcome)
    }

    /// Writes `value` into classical slot `clbit`.
    pub(crate) fn record(&mut self, clbit: usize, value: u8) -> Result<()> {
        let len = self.clbits.len();
        let slot = self.clbits.get_mut(clbit).ok_or_else(|| {
            QaoaError::invalid_operation(format!("Classical slot {} out of range for {} slots", clbit, len))
        })?;
        *slot = value;
        Ok(())
    }

    /// Measure-and-flip reset: leaves `qubit` in |0> whatever it was.
    fn reset(&mut self, qubit: usize, rng: &mut StdRng) -> Result<()> {
        if self.state.probability_of_one(qubit) < AMPLITUDE_TOLERANCE {
            return Ok(()); // Already |0>; skip the random draw
        }
        if self.measure(qubit, rng)? == 1 {
            self.apply_single_qubit_gate(qubit, &pauli_x_matrix());
        }
        Ok(())
    }

    fn checked_index(&self, qubit: usize) -> Result<usize> {
        if qubit < self.num_qubits {
            Ok(qubit)
        } else {
            Err(QaoaError::InvalidQubit { qubit: crate::core::QubitId(qubit), num_qubits: self.num_qubits })
        }
    }

    /// Applies a 2x2 matrix to qubit `target` in place.
    fn apply_single_qubit_gate(&mut self, target: usize, matrix: &Matrix2) {
        let k_mask = 1usize << target;
        let lower_mask = k_mask - 1;
        let dim = self.state.dim();
        let amps = self.state.vector_mut();

        // Iterate over pairs of basis states differing only at the target qubit
        for i in 0..dim / 2 {
            let i0 = ((i & !lower_mask) << 1) | (i & lower_mask);
            let i1 = i0 | k_mask;

            let psi_0 = amps[i0];
            let psi_1 = amps[i1];
            amps[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            amps[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Multiplies every basis state whose bits cover `mask` by `e^(i theta)`.
    fn apply_controlled_phase(&mut self, mask: usize, theta: f64) {
        let phase = Complex::from_polar(1.0, theta);
        for (k, amp) in self.state.vector_mut().iter_mut().enumerate() {
            if k & mask == mask {
                *amp *= phase;
            }
        }
    }
}

/// Draws a uniform sample from `[0, 1)`.
pub(crate) fn uniform(rng: &mut StdRng) -> f64 {
    StandardUniform.sample(rng)
}

fn hadamard_matrix() -> Matrix2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn pauli_x_matrix() -> Matrix2 {
    [
        [Complex::zero(), Complex::new(1.0, 0.0)],
        [Complex::new(1.0, 0.0), Complex::zero()],
    ]
}

fn pauli_y_matrix() -> Matrix2 {
    let i = Complex::i();
    [[Complex::zero(), -i], [i, Complex::zero()]]
}

/// Rx(theta) = [[cos(a), -i*sin(a)], [-i*sin(a), cos(a)]] where a = theta/2
fn rx_matrix(theta: f64) -> Matrix2 {
    let (sin_a, cos_a) = (theta / 2.0).sin_cos();
    let i = Complex::i();
    [
        [Complex::new(cos_a, 0.0), -i * sin_a],
        [-i * sin_a, Complex::new(cos_a, 0.0)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QubitId;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Asserts that two complex state vectors are approximately equal component-wise.
    fn assert_complex_vec_approx_equal(actual: &[Complex<f64>], expected: &[Complex<f64>], context: &str) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i, actual[i], expected[i], context
            );
        }
    }

    #[test]
    fn test_hadamard_creates_plus_state() -> Result<()> {
        let mut engine = SimulationEngine::init(1, 0)?;
        engine.apply_operation(&Operation::Hadamard { target: QubitId(0) }, &mut rng())?;
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_complex_vec_approx_equal(engine.state().vector(), &[h, h], "H|0>");
        Ok(())
    }

    #[test]
    fn test_pauli_x_on_second_qubit_sets_bit_one() -> Result<()> {
        let mut engine = SimulationEngine::init(2, 0)?;
        engine.apply_operation(&Operation::PauliX { target: QubitId(1) }, &mut rng())?;
        // Qubit 1 is bit 1, so the state is basis index 2
        let expected = [Complex::zero(), Complex::zero(), Complex::new(1.0, 0.0), Complex::zero()];
        assert_complex_vec_approx_equal(engine.state().vector(), &expected, "X on q1");
        Ok(())
    }

    #[test]
    fn test_rx_pi_flips_qubit() -> Result<()> {
        let mut engine = SimulationEngine::init(1, 1)?;
        let mut rng = rng();
        engine.apply_operation(&Operation::Rx { target: QubitId(0), theta: PI }, &mut rng)?;
        engine.apply_operation(&Operation::Measure { qubit: QubitId(0), clbit: 0 }, &mut rng)?;
        assert_eq!(engine.classical_bits(), &[1]);
        Ok(())
    }

    #[test]
    fn test_controlled_phase_only_touches_all_ones() -> Result<()> {
        let mut engine = SimulationEngine::init(2, 0)?;
        let mut rng = rng();
        for q in 0..2 {
            engine.apply_operation(&Operation::Hadamard { target: QubitId(q) }, &mut rng)?;
        }
        engine.apply_operation(
            &Operation::MultiControlledPhase { controls: vec![QubitId(0)], target: QubitId(1), theta: PI },
            &mut rng,
        )?;
        let half = Complex::new(0.5, 0.0);
        assert_complex_vec_approx_equal(engine.state().vector(), &[half, half, half, -half], "CP(pi) on |++>");
        Ok(())
    }

    #[test]
    fn test_measure_collapses_and_renormalizes() -> Result<()> {
        let mut engine = SimulationEngine::init(2, 2)?;
        let mut rng = rng();
        engine.apply_operation(&Operation::Hadamard { target: QubitId(0) }, &mut rng)?;
        let outcome = engine.measure(0, &mut rng)?;
        assert_abs_diff_eq!(engine.state().norm_sqr(), 1.0, epsilon = TEST_TOLERANCE);
        assert_abs_diff_eq!(engine.state().probability_of_one(0), f64::from(outcome), epsilon = TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_reset_returns_qubit_to_zero() -> Result<()> {
        let mut engine = SimulationEngine::init(1, 0)?;
        let mut rng = rng();
        engine.set_state(StateVector::new(vec![Complex::zero(), Complex::new(1.0, 0.0)], 1))?;
        engine.apply_operation(&Operation::Reset { targets: vec![QubitId(0)] }, &mut rng)?;
        assert_complex_vec_approx_equal(
            engine.state().vector(),
            &[Complex::new(1.0, 0.0), Complex::zero()],
            "reset |1>",
        );
        Ok(())
    }

    #[test]
    fn test_pauli_z_error_flips_sign_of_one() -> Result<()> {
        let mut engine = SimulationEngine::init(1, 0)?;
        engine.apply_operation(&Operation::Hadamard { target: QubitId(0) }, &mut rng())?;
        engine.apply_pauli(0, PauliError::Z)?;
        let h = Complex::new(FRAC_1_SQRT_2, 0.0);
        assert_complex_vec_approx_equal(engine.state().vector(), &[h, -h], "Z|+>");
        Ok(())
    }

    #[test]
    fn test_init_rejects_zero_qubits() {
        assert!(matches!(SimulationEngine::init(0, 0), Err(QaoaError::InvalidOperation { .. })));
        assert!(matches!(SimulationEngine::init(MAX_QUBITS + 1, 0), Err(QaoaError::BackendFailure { .. })));
    }

    #[test]
    fn test_out_of_range_qubit_is_reported() -> Result<()> {
        let mut engine = SimulationEngine::init(2, 0)?;
        let result = engine.apply_operation(&Operation::Hadamard { target: QubitId(5) }, &mut rng());
        assert_eq!(result, Err(QaoaError::InvalidQubit { qubit: QubitId(5), num_qubits: 2 }));
        Ok(())
    }
}
