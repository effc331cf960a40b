// src/qaoa/mod.rs

//! Assembly and execution of single-layer QAOA circuits.
//!
//! The assembled circuit for `n` primary qubits and a separator over `n + 1`
//! qubits is, in order:
//!
//! 1. reset all `n + 1` qubits,
//! 2. `H` on qubits `0..n`,
//! 3. `X` on the helper qubit `n`,
//! 4. the separator on qubits `0..=n`,
//! 5. the mixer `Rx(2β)` on qubits `0..n`,
//! 6. measure qubit `i` into classical slot `i` for `i < n`.
//!
//! The mixer is exactly `exp(-iβ Σ X_k)` because the X terms commute.
//! The helper qubit is never measured.

use crate::circuits::Circuit;
use crate::core::{QaoaError, QubitId, Result};
use crate::operations::Operation;
use crate::separator::SeparatorCircuit;
use crate::simulation::{Backend, BackendKind, MeasurementResult};
use tracing::debug;

/// Builds QAOA circuits around a separator and runs them for one shot.
#[derive(Debug, Clone, Default)]
pub struct QaoaAssembler {
    seed: Option<u64>,
}

impl QaoaAssembler {
    /// Assembler whose backends draw from OS randomness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembler whose backends are seeded with `seed`. Every call builds a
    /// fresh backend, so repeated calls with the same inputs give the same bitstring.
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Assembles the full QAOA circuit without running it.
    ///
    /// # Errors
    /// `QubitCountMismatch` if `n` is zero or differs from the separator's
    /// primary qubit count.
    pub fn assemble(&self, separator: &SeparatorCircuit, n: usize, beta: f64) -> Result<Circuit> {
        let expected = separator.num_primary_qubits();
        if n == 0 || n != expected {
            return Err(QaoaError::QubitCountMismatch { expected, actual: n });
        }

        let primaries: Vec<QubitId> = (0..n).map(QubitId).collect();
        let helper = QubitId(n);
        let all: Vec<QubitId> = (0..=n).map(QubitId).collect();

        let mut circuit = Circuit::new(n + 1, n);
        circuit.set_name("QAOA");

        circuit.add_operation(Operation::Reset { targets: all.clone() })?;
        circuit.add_operations(primaries.iter().map(|q| Operation::Hadamard { target: *q }))?;
        circuit.add_operation(Operation::PauliX { target: helper })?;
        circuit.add_operation(Operation::Barrier { targets: all.clone() })?;

        circuit.append(separator.as_circuit(), &all)?;
        circuit.add_operation(Operation::Barrier { targets: all.clone() })?;

        circuit.add_operations(primaries.iter().map(|q| Operation::Rx { target: *q, theta: 2.0 * beta }))?;
        circuit.add_operation(Operation::Barrier { targets: all })?;

        circuit.add_operations(primaries.iter().map(|q| Operation::Measure { qubit: *q, clbit: q.index() }))?;

        debug!(n, beta, ops = circuit.len(), expression = %separator.expression(), "assembled QAOA circuit");
        Ok(circuit)
    }

    /// Assembles the circuit and samples it once on the backend picked by
    /// `noise_enabled`.
    ///
    /// Returns the circuit and the single measured bitstring of length `n`,
    /// exactly as the backend reported it.
    pub fn assemble_and_run(
        &self,
        separator: &SeparatorCircuit,
        n: usize,
        beta: f64,
        noise_enabled: bool,
    ) -> Result<(Circuit, MeasurementResult)> {
        let kind = BackendKind::from_noise_flag(noise_enabled);
        let mut backend = kind.create(self.seed);
        debug!(?kind, backend = backend.name(), "selected backend");
        self.run_with(backend.as_mut(), separator, n, beta)
    }

    /// Like [`QaoaAssembler::assemble_and_run`] but on a caller-supplied backend.
    pub fn run_with(
        &self,
        backend: &mut dyn Backend,
        separator: &SeparatorCircuit,
        n: usize,
        beta: f64,
    ) -> Result<(Circuit, MeasurementResult)> {
        let circuit = self.assemble(separator, n, beta)?;
        let result = backend.run(&circuit, 1, true).map_err(|e| match e {
            QaoaError::BackendFailure { .. } => e,
            other => QaoaError::backend(format!("{} failed: {}", backend.name(), other)),
        })?;

        let bits = result
            .get_memory()?
            .first()
            .cloned()
            .ok_or_else(|| QaoaError::backend(format!("{} returned no sample", backend.name())))?;
        let measurement = MeasurementResult::new(bits)?;
        if measurement.len() != n {
            return Err(QaoaError::backend(format!(
                "{} returned {} bits for {} classical slots",
                backend.name(),
                measurement.len(),
                n
            )));
        }
        Ok((circuit, measurement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::separator::{BooleanExpression, SeparatorBuilder};
    use crate::simulation::RunResult;

    /// Backend that always fails, to check error mapping.
    struct BrokenBackend;

    impl Backend for BrokenBackend {
        fn name(&self) -> &str {
            "broken"
        }

        fn run(&mut self, _circuit: &Circuit, _shots: usize, _memory: bool) -> Result<RunResult> {
            Err(QaoaError::Incoherence { message: "lost it".to_string() })
        }
    }

    #[test]
    fn test_assembled_layout_follows_fixed_order() -> Result<()> {
        let sep = SeparatorBuilder::build(BooleanExpression::OneClause, 0.5)?;
        let circuit = QaoaAssembler::new().assemble(&sep, 2, 0.25)?;
        let ops = circuit.operations();

        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(ops[0], Operation::Reset { targets: vec![QubitId(0), QubitId(1), QubitId(2)] });
        assert_eq!(ops[1], Operation::Hadamard { target: QubitId(0) });
        assert_eq!(ops[2], Operation::Hadamard { target: QubitId(1) });
        assert_eq!(ops[3], Operation::PauliX { target: QubitId(2) });
        assert!(matches!(ops[4], Operation::Barrier { .. }));
        assert_eq!(
            ops[5],
            Operation::MultiControlledPhase { controls: vec![QubitId(0), QubitId(1)], target: QubitId(2), theta: -0.5 }
        );
        assert!(matches!(ops[6], Operation::Barrier { .. }));
        assert_eq!(ops[7], Operation::Rx { target: QubitId(0), theta: 0.5 });
        assert_eq!(ops[8], Operation::Rx { target: QubitId(1), theta: 0.5 });
        assert!(matches!(ops[9], Operation::Barrier { .. }));
        assert_eq!(ops[10], Operation::Measure { qubit: QubitId(0), clbit: 0 });
        assert_eq!(ops[11], Operation::Measure { qubit: QubitId(1), clbit: 1 });
        assert_eq!(ops.len(), 12);
        Ok(())
    }

    #[test]
    fn test_helper_is_never_measured() -> Result<()> {
        let sep = SeparatorBuilder::build(BooleanExpression::FourClauseChain, 0.5)?;
        let circuit = QaoaAssembler::new().assemble(&sep, 5, 0.25)?;
        let measured: Vec<QubitId> = circuit
            .operations()
            .iter()
            .filter_map(|op| match op {
                Operation::Measure { qubit, .. } => Some(*qubit),
                _ => None,
            })
            .collect();
        assert_eq!(measured, (0..5).map(QubitId).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_zero_qubits_is_a_mismatch() -> Result<()> {
        let sep = SeparatorBuilder::build(BooleanExpression::SingleLiteral, 0.5)?;
        assert_eq!(
            QaoaAssembler::new().assemble(&sep, 0, 0.1),
            Err(QaoaError::QubitCountMismatch { expected: 1, actual: 0 })
        );
        Ok(())
    }

    #[test]
    fn test_backend_errors_become_backend_failure() -> Result<()> {
        let sep = SeparatorBuilder::build(BooleanExpression::SingleLiteral, 0.5)?;
        let result = QaoaAssembler::new().run_with(&mut BrokenBackend, &sep, 1, 0.1);
        match result {
            Err(QaoaError::BackendFailure { message }) => assert!(message.contains("broken")),
            other => panic!("Expected BackendFailure, got {:?}", other),
        }
        Ok(())
    }
}
