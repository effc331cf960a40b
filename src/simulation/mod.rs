// src/simulation/mod.rs

//! Local simulation backends for `qaoa2sat::circuits::Circuit`.
//!
//! The QAOA layer only sees the [`Backend`] trait. Two implementations exist:
//! an exact state-vector simulator and a noisy simulator driven by a fixed
//! [`NoiseProfile`]. Nothing in this crate talks to quantum hardware.

mod results;
pub(crate) mod engine;
pub mod noise;

pub use noise::{DepolarizingError, NoiseProfile, PauliError, ReadoutError};
pub use results::{MeasurementResult, RunResult};

use crate::circuits::Circuit;
use crate::core::{QaoaError, Result};
use crate::operations::Operation;
use crate::validation::check_normalization;
use engine::{uniform, SimulationEngine};
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use results::format_bits;
use tracing::{debug, info};

/// Something that can execute a circuit and return sampled bitstrings.
pub trait Backend: Send {
    /// Name reported in results and logs.
    fn name(&self) -> &str;

    /// Executes `circuit` `shots` times. When `memory` is true the result
    /// keeps every shot's bitstring in order.
    fn run(&mut self, circuit: &Circuit, shots: usize, memory: bool) -> Result<RunResult>;
}

/// Which local backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Noiseless state-vector simulation.
    Exact,
    /// Simulation with the fixed device noise profile.
    Noisy,
}

impl BackendKind {
    /// `Noisy` when `noise_enabled`, otherwise `Exact`.
    pub fn from_noise_flag(noise_enabled: bool) -> Self {
        if noise_enabled { BackendKind::Noisy } else { BackendKind::Exact }
    }

    /// Creates a fresh backend of this kind. `seed` makes sampling reproducible.
    pub fn create(self, seed: Option<u64>) -> Box<dyn Backend> {
        match self {
            BackendKind::Exact => Box::new(StatevectorSimulator::with_seed(seed)),
            BackendKind::Noisy => Box::new(NoisySimulator::with_seed(NoiseProfile::seven_qubit_device(), seed)),
        }
    }
}

/// Exact state-vector simulator.
#[derive(Debug)]
pub struct StatevectorSimulator {
    rng: StdRng,
}

impl StatevectorSimulator {
    /// Creates a simulator seeded from OS randomness.
    pub fn new() -> Self {
        Self::with_seed(None)
    }

    /// Creates a simulator; `Some(seed)` gives reproducible samples.
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self { rng: make_rng(seed) }
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StatevectorSimulator {
    fn name(&self) -> &str {
        "statevector_simulator"
    }

    fn run(&mut self, circuit: &Circuit, shots: usize, memory: bool) -> Result<RunResult> {
        debug!(backend = self.name(), qubits = circuit.num_qubits(), ops = circuit.len(), shots, "running circuit");
        let mut result = RunResult::new(self.name(), memory);
        for _ in 0..shots {
            let clbits = execute_shot(circuit, &mut self.rng, None)?;
            result.record_shot(format_bits(&clbits));
        }
        Ok(result)
    }
}

/// Trajectory-sampling simulator with a fixed device noise profile.
#[derive(Debug)]
pub struct NoisySimulator {
    profile: NoiseProfile,
    rng: StdRng,
}

impl NoisySimulator {
    /// Creates a noisy simulator for `profile`, seeded from OS randomness.
    pub fn new(profile: NoiseProfile) -> Self {
        Self::with_seed(profile, None)
    }

    /// Creates a noisy simulator; `Some(seed)` gives reproducible samples.
    pub fn with_seed(profile: NoiseProfile, seed: Option<u64>) -> Self {
        Self { profile, rng: make_rng(seed) }
    }

    /// The device profile in use.
    pub fn profile(&self) -> &NoiseProfile {
        &self.profile
    }
}

impl Backend for NoisySimulator {
    fn name(&self) -> &str {
        self.profile.name()
    }

    fn run(&mut self, circuit: &Circuit, shots: usize, memory: bool) -> Result<RunResult> {
        if circuit.num_qubits() > self.profile.num_qubits() {
            return Err(QaoaError::backend(format!(
                "Circuit needs {} qubits but device '{}' has {}",
                circuit.num_qubits(),
                self.profile.name(),
                self.profile.num_qubits()
            )));
        }
        info!(device = self.profile.name(), "running on a noisy simulator; outcomes include gate and readout errors");
        debug!(backend = self.name(), qubits = circuit.num_qubits(), ops = circuit.len(), shots, "running circuit");

        let mut result = RunResult::new(self.profile.name(), memory);
        for _ in 0..shots {
            let clbits = execute_shot(circuit, &mut self.rng, Some(&self.profile))?;
            result.record_shot(format_bits(&clbits));
        }
        Ok(result)
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| StandardUniform.sample(&mut rand::rng()));
    StdRng::seed_from_u64(seed)
}

/// Runs every operation of `circuit` once on a fresh engine and returns the
/// classical register, slot 0 first.
fn execute_shot(circuit: &Circuit, rng: &mut StdRng, noise: Option<&NoiseProfile>) -> Result<Vec<u8>> {
    let mut engine = SimulationEngine::init(circuit.num_qubits(), circuit.num_clbits())?;

    for op in circuit.operations() {
        match (op, noise) {
            (Operation::Measure { qubit, clbit }, Some(profile)) => {
                let mut bit = engine.measure(qubit.index(), rng)?;
                if profile.readout_error().should_flip(bit, uniform(rng)) {
                    bit ^= 1;
                }
                engine.record(*clbit, bit)?;
            }
            (_, Some(profile)) if op.is_gate() => {
                engine.apply_operation(op, rng)?;
                let channel = if op.is_multi_qubit() {
                    profile.multi_qubit_error()
                } else {
                    profile.single_qubit_error()
                };
                for q in op.involved_qubits() {
                    engine.apply_pauli(q.index(), channel.sample(uniform(rng)))?;
                }
            }
            _ => engine.apply_operation(op, rng)?,
        }
    }

    check_normalization(engine.state(), None)?;
    Ok(engine.classical_bits().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::QubitId;

    fn bell_circuit() -> Result<Circuit> {
        // H on q0, then a CNOT built as H-CZ-H on q1: a Bell pair
        CircuitBuilder::new(2, 2)
            .add_op(Operation::Hadamard { target: QubitId(0) })
            .add_op(Operation::Hadamard { target: QubitId(1) })
            .add_op(Operation::MultiControlledPhase {
                controls: vec![QubitId(0)],
                target: QubitId(1),
                theta: std::f64::consts::PI,
            })
            .add_op(Operation::Hadamard { target: QubitId(1) })
            .add_op(Operation::Measure { qubit: QubitId(0), clbit: 0 })
            .add_op(Operation::Measure { qubit: QubitId(1), clbit: 1 })
            .build()
    }

    #[test]
    fn test_exact_backend_produces_correlated_bits() -> Result<()> {
        let mut backend = StatevectorSimulator::with_seed(Some(11));
        let result = backend.run(&bell_circuit()?, 200, true)?;
        assert_eq!(result.shots(), 200);
        for bits in result.get_memory()? {
            assert!(bits == "00" || bits == "11", "unexpected outcome {}", bits);
        }
        Ok(())
    }

    #[test]
    fn test_seeded_backends_are_reproducible() -> Result<()> {
        let circuit = bell_circuit()?;
        let first = StatevectorSimulator::with_seed(Some(3)).run(&circuit, 50, true)?;
        let second = StatevectorSimulator::with_seed(Some(3)).run(&circuit, 50, true)?;
        assert_eq!(first.get_memory()?, second.get_memory()?);
        Ok(())
    }

    #[test]
    fn test_noisy_backend_rejects_wide_circuits() -> Result<()> {
        let circuit = CircuitBuilder::new(8, 0)
            .add_op(Operation::Hadamard { target: QubitId(7) })
            .build()?;
        let mut backend = NoisySimulator::with_seed(NoiseProfile::seven_qubit_device(), Some(1));
        assert!(matches!(backend.run(&circuit, 1, true), Err(QaoaError::BackendFailure { .. })));
        Ok(())
    }

    #[test]
    fn test_noisy_backend_certain_readout_error_flips_every_bit() -> Result<()> {
        let profile = NoiseProfile::new("always_flip", 2, 0.0, 0.0, ReadoutError::new(1.0, 1.0)?)?;
        let circuit = CircuitBuilder::new(1, 1)
            .add_op(Operation::Measure { qubit: QubitId(0), clbit: 0 })
            .build()?;
        let result = NoisySimulator::with_seed(profile, Some(5)).run(&circuit, 20, false)?;
        assert_eq!(result.get_counts().get("1"), Some(&20));
        Ok(())
    }

    #[test]
    fn test_backend_kind_selection() {
        assert_eq!(BackendKind::from_noise_flag(false), BackendKind::Exact);
        assert_eq!(BackendKind::from_noise_flag(true), BackendKind::Noisy);
        assert_eq!(BackendKind::Exact.create(Some(0)).name(), "statevector_simulator");
        assert_eq!(BackendKind::Noisy.create(Some(0)).name(), "fake_7q_device");
    }
}
