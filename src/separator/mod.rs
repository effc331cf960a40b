// src/separator/mod.rs

//! Separator (phase-oracle) construction for the supported Max-2-SAT instances.
//!
//! Each [`BooleanExpression`] maps to a fixed table of [`PhaseTerm`]s. A term
//! becomes one multi-controlled phase gate whose target is the helper qubit
//! (the last qubit of the separator). The helper is prepared in |1> by the
//! QAOA assembler, so a gate fires exactly when all its primary qubits are
//! |1>, kicking the phase back onto that assignment.

use crate::circuits::Circuit;
use crate::core::{QaoaError, QubitId, Result};
use crate::operations::Operation;
use crate::validation::check_qubit_bounds;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// One of the boolean expressions the separator table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BooleanExpression {
    /// `x0`
    SingleLiteral,
    /// `(x0 ^ x1)`
    OneClause,
    /// `(x0 ^ x1) ^ (x1 ^ x2)`
    TwoClauseChain,
    /// `(x0 ^ x1) ^ (x1 ^ x2) ^ (x2 ^ x3)`
    ThreeClauseChain,
    /// `(x0 ^ x1) ^ (x1 ^ x2) ^ (x2 ^ x3) ^ (x3 ^ x4)`
    FourClauseChain,
}

/// A row of the separator table: emit a phase of `sign * gamma` on `target`,
/// controlled by every qubit in `controls`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTerm {
    /// Multiplier applied to gamma.
    pub sign: f64,
    /// Control qubit indices.
    pub controls: &'static [usize],
    /// Target qubit index (the helper).
    pub target: usize,
}

const fn term(controls: &'static [usize], target: usize) -> PhaseTerm {
    PhaseTerm { sign: -1.0, controls, target }
}

const SINGLE_LITERAL: &[PhaseTerm] = &[term(&[0], 1)];
const ONE_CLAUSE: &[PhaseTerm] = &[term(&[0, 1], 2)];
const TWO_CLAUSE_CHAIN: &[PhaseTerm] = &[term(&[1, 2], 3), term(&[0, 1], 3), term(&[0, 1, 2], 3)];
// The third clause is laid out as two singly-controlled phases, one per literal.
const THREE_CLAUSE_CHAIN: &[PhaseTerm] = &[term(&[0, 1], 4), term(&[1, 2], 4), term(&[2], 4), term(&[3], 4)];
const FOUR_CLAUSE_CHAIN: &[PhaseTerm] = &[term(&[0, 1], 5), term(&[1, 2], 5), term(&[2, 3], 5), term(&[3, 4], 5)];

impl BooleanExpression {
    /// Every supported expression, smallest first.
    pub const ALL: [BooleanExpression; 5] = [
        BooleanExpression::SingleLiteral,
        BooleanExpression::OneClause,
        BooleanExpression::TwoClauseChain,
        BooleanExpression::ThreeClauseChain,
        BooleanExpression::FourClauseChain,
    ];

    /// Canonical text form of the expression.
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanExpression::SingleLiteral => "x0",
            BooleanExpression::OneClause => "(x0 ^ x1)",
            BooleanExpression::TwoClauseChain => "(x0 ^ x1) ^ (x1 ^ x2)",
            BooleanExpression::ThreeClauseChain => "(x0 ^ x1) ^ (x1 ^ x2) ^ (x2 ^ x3)",
            BooleanExpression::FourClauseChain => "(x0 ^ x1) ^ (x1 ^ x2) ^ (x2 ^ x3) ^ (x3 ^ x4)",
        }
    }

    /// Gate layout of the separator.
    pub fn phase_terms(&self) -> &'static [PhaseTerm] {
        match self {
            BooleanExpression::SingleLiteral => SINGLE_LITERAL,
            BooleanExpression::OneClause => ONE_CLAUSE,
            BooleanExpression::TwoClauseChain => TWO_CLAUSE_CHAIN,
            BooleanExpression::ThreeClauseChain => THREE_CLAUSE_CHAIN,
            BooleanExpression::FourClauseChain => FOUR_CLAUSE_CHAIN,
        }
    }

    /// Boolean variables referenced, which is also the primary qubit count.
    pub fn num_variables(&self) -> usize {
        match self {
            BooleanExpression::SingleLiteral => 1,
            BooleanExpression::OneClause => 2,
            BooleanExpression::TwoClauseChain => 3,
            BooleanExpression::ThreeClauseChain => 4,
            BooleanExpression::FourClauseChain => 5,
        }
    }

    /// Width of the separator circuit: the variables plus the helper.
    pub fn num_qubits(&self) -> usize {
        self.num_variables() + 1
    }

    /// Clauses as lists of variable indices; a clause holds when all its
    /// variables are true.
    pub fn clauses(&self) -> Vec<Vec<usize>> {
        match self {
            BooleanExpression::SingleLiteral => vec![vec![0]],
            _ => (0..self.num_variables() - 1).map(|i| vec![i, i + 1]).collect(),
        }
    }

    /// Number of clauses satisfied by `assignment` (variable `i` at index `i`).
    /// Variables missing from `assignment` count as false.
    pub fn satisfied_clauses(&self, assignment: &[bool]) -> usize {
        self.clauses()
            .iter()
            .filter(|clause| clause.iter().all(|v| assignment.get(*v).copied().unwrap_or(false)))
            .count()
    }
}

impl fmt::Display for BooleanExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BooleanExpression {
    type Err = QaoaError;

    /// Accepts the canonical form, with or without underscores in variable
    /// names (`x_0` and `x0` are the same variable) and with any spacing.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace() && *c != '_').collect();
        BooleanExpression::ALL
            .into_iter()
            .find(|expr| expr.as_str().replace(' ', "") == normalized)
            .ok_or_else(|| QaoaError::UnsupportedExpression { expression: s.to_string() })
    }
}

/// Phase-oracle circuit for one expression and one gamma.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparatorCircuit {
    expression: BooleanExpression,
    gamma: f64,
    circuit: Circuit,
}

impl SeparatorCircuit {
    /// The expression this separator encodes.
    pub fn expression(&self) -> BooleanExpression {
        self.expression
    }

    /// The phase angle it was built with.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Width including the helper qubit.
    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    /// Primary qubits (the width minus the helper).
    pub fn num_primary_qubits(&self) -> usize {
        self.circuit.num_qubits() - 1
    }

    /// The phase operations in order.
    pub fn operations(&self) -> &[Operation] {
        self.circuit.operations()
    }

    /// The underlying circuit (no classical slots).
    pub fn as_circuit(&self) -> &Circuit {
        &self.circuit
    }
}

/// Builds separators from the static table.
pub struct SeparatorBuilder;

impl SeparatorBuilder {
    /// Emits one `MultiControlledPhase` with angle `sign * gamma` per table row.
    pub fn build(expression: BooleanExpression, gamma: f64) -> Result<SeparatorCircuit> {
        let num_qubits = expression.num_qubits();
        let mut circuit = Circuit::new(num_qubits, 0);
        circuit.set_name("Separator");

        let ops: Vec<Operation> = expression
            .phase_terms()
            .iter()
            .map(|t| Operation::MultiControlledPhase {
                controls: t.controls.iter().map(|c| QubitId(*c)).collect(),
                target: QubitId(t.target),
                theta: t.sign * gamma,
            })
            .collect();
        check_qubit_bounds(&ops, num_qubits)?;
        circuit.add_operations(ops)?;

        debug!(%expression, gamma, gates = circuit.len(), qubits = num_qubits, "built separator");
        Ok(SeparatorCircuit { expression, gamma, circuit })
    }

    /// Parses `expression` and builds its separator.
    ///
    /// # Errors
    /// `UnsupportedExpression` when the text matches no table entry.
    pub fn build_from_str(expression: &str, gamma: f64) -> Result<SeparatorCircuit> {
        Self::build(expression.parse()?, gamma)
    }
}
