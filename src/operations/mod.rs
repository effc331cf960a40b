// src/operations/mod.rs

//! Defines the gate-level operations a QAOA circuit is made of.
//!
//! Only the gates a single-layer QAOA circuit uses are modelled.

use crate::core::QubitId;

/// A single step of a circuit.
#[derive(Debug, Clone, PartialEq)] // f64 fields rule out Eq
pub enum Operation {
    /// Returns each target qubit to |0>.
    Reset {
        /// Qubits to reset.
        targets: Vec<QubitId>,
    },

    /// Hadamard gate.
    Hadamard {
        /// The qubit to act on.
        target: QubitId,
    },

    /// Pauli X (bit flip).
    PauliX {
        /// The qubit to act on.
        target: QubitId,
    },

    /// Rotation about the X axis, `exp(-i theta X / 2)`.
    Rx {
        /// The qubit to act on.
        target: QubitId,
        /// Rotation angle in radians.
        theta: f64,
    },

    /// Multi-controlled phase rotation.
    ///
    /// Multiplies every basis state in which all `controls` and the `target`
    /// are |1> by `e^(i theta)`. The gate is symmetric in its qubits; the
    /// control/target split only matters for rendering. With no controls it
    /// degenerates to a plain phase gate on `target`.
    MultiControlledPhase {
        /// Qubits that must all be |1>.
        controls: Vec<QubitId>,
        /// The qubit receiving the phase.
        target: QubitId,
        /// Phase angle in radians.
        theta: f64,
    },

    /// Measures `qubit` in the computational basis into classical slot `clbit`.
    Measure {
        /// The measured qubit.
        qubit: QubitId,
        /// Index of the classical slot receiving the outcome.
        clbit: usize,
    },

    /// Visual separator between circuit stages. No effect on the state.
    Barrier {
        /// Qubits the barrier spans.
        targets: Vec<QubitId>,
    },
}

impl Operation {
    /// Returns every qubit the operation mentions.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Reset { targets } | Operation::Barrier { targets } => targets.clone(),
            Operation::Hadamard { target }
            | Operation::PauliX { target }
            | Operation::Rx { target, .. } => vec![*target],
            Operation::MultiControlledPhase { controls, target, .. } => {
                let mut qubits = controls.clone();
                qubits.push(*target);
                qubits
            }
            Operation::Measure { qubit, .. } => vec![*qubit],
        }
    }

    /// Short gate name used in logs and diagrams.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Reset { .. } => "reset",
            Operation::Hadamard { .. } => "h",
            Operation::PauliX { .. } => "x",
            Operation::Rx { .. } => "rx",
            Operation::MultiControlledPhase { controls, .. } => match controls.len() {
                0 => "p",
                1 => "cp",
                _ => "mcp",
            },
            Operation::Measure { .. } => "measure",
            Operation::Barrier { .. } => "barrier",
        }
    }

    /// True for gates that act on more than one qubit.
    pub fn is_multi_qubit(&self) -> bool {
        matches!(self, Operation::MultiControlledPhase { controls, .. } if !controls.is_empty())
    }

    /// True for unitary gates, i.e. everything except reset, measure and barrier.
    pub fn is_gate(&self) -> bool {
        !matches!(
            self,
            Operation::Reset { .. } | Operation::Measure { .. } | Operation::Barrier { .. }
        )
    }

    /// Rewrites the qubit indices through `layout`, where `layout[i]` is the
    /// qubit that local qubit `i` lands on. Classical slots are unchanged.
    /// Returns `None` if an index has no entry in `layout`.
    pub fn remapped(&self, layout: &[QubitId]) -> Option<Operation> {
        let map = |q: &QubitId| layout.get(q.index()).copied();
        let map_all = |qs: &[QubitId]| qs.iter().map(map).collect::<Option<Vec<_>>>();

        Some(match self {
            Operation::Reset { targets } => Operation::Reset { targets: map_all(targets)? },
            Operation::Barrier { targets } => Operation::Barrier { targets: map_all(targets)? },
            Operation::Hadamard { target } => Operation::Hadamard { target: map(target)? },
            Operation::PauliX { target } => Operation::PauliX { target: map(target)? },
            Operation::Rx { target, theta } => Operation::Rx { target: map(target)?, theta: *theta },
            Operation::MultiControlledPhase { controls, target, theta } => {
                Operation::MultiControlledPhase {
                    controls: map_all(controls)?,
                    target: map(target)?,
                    theta: *theta,
                }
            }
            Operation::Measure { qubit, clbit } => Operation::Measure { qubit: map(qubit)?, clbit: *clbit },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involved_qubits_of_controlled_phase() {
        let op = Operation::MultiControlledPhase {
            controls: vec![QubitId(0), QubitId(1)],
            target: QubitId(5),
            theta: 0.3,
        };
        assert_eq!(op.involved_qubits(), vec![QubitId(0), QubitId(1), QubitId(5)]);
        assert_eq!(op.name(), "mcp");
        assert!(op.is_multi_qubit());
    }

    #[test]
    fn test_remapped_shifts_indices() {
        let op = Operation::MultiControlledPhase {
            controls: vec![QubitId(0)],
            target: QubitId(1),
            theta: -1.0,
        };
        let layout = [QubitId(3), QubitId(4)];
        assert_eq!(
            op.remapped(&layout),
            Some(Operation::MultiControlledPhase {
                controls: vec![QubitId(3)],
                target: QubitId(4),
                theta: -1.0,
            })
        );
        assert_eq!(op.remapped(&layout[..1]), None);
    }
}
