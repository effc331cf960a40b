// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! operations (`qaoa2sat::operations::Operation`).
//!
//! A `Circuit` owns a fixed quantum register and a fixed classical register.
//! Every operation added to it is checked against both, so a circuit that
//! exists is always well formed.

use crate::core::{QaoaError, QubitId, Result};
use crate::operations::Operation;
use crate::validation::check_operation;
use std::fmt;

/// An ordered sequence of operations over `num_qubits` qubits and
/// `num_clbits` classical slots. Operations run in insertion order.
#[derive(Clone, PartialEq)] // PartialEq useful for testing circuits
pub struct Circuit {
    name: Option<String>,
    num_qubits: usize,
    num_clbits: usize,
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates an empty circuit with the given register sizes.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            name: None,
            num_qubits,
            num_clbits,
            operations: Vec::new(),
        }
    }

    /// Appends one operation after validating it against the registers.
    pub fn add_operation(&mut self, op: Operation) -> Result<()> {
        check_operation(&op, self.num_qubits, self.num_clbits)?;
        self.operations.push(op);
        Ok(())
    }

    /// Appends every operation yielded by `ops`, stopping at the first invalid one.
    pub fn add_operations<I>(&mut self, ops: I) -> Result<()>
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op)?;
        }
        Ok(())
    }

    /// Appends all operations of `other`, relocating its qubit `i` onto
    /// `layout[i]`. `layout` must cover every qubit of `other`.
    pub fn append(&mut self, other: &Circuit, layout: &[QubitId]) -> Result<()> {
        if layout.len() != other.num_qubits {
            return Err(QaoaError::invalid_operation(format!(
                "Layout maps {} qubits but the appended circuit has {}",
                layout.len(),
                other.num_qubits
            )));
        }
        for op in &other.operations {
            let mapped = op.remapped(layout).ok_or_else(|| {
                QaoaError::invalid_operation(format!("'{}' references a qubit outside the layout", op.name()))
            })?;
            self.add_operation(mapped)?;
        }
        Ok(())
    }

    /// Optional label shown in the diagram header.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the label shown in the diagram header.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Width of the quantum register.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Width of the classical register.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of operations with the given gate name, e.g. `"h"` or `"mcp"`.
    pub fn count_ops(&self, name: &str) -> usize {
        self.operations.iter().filter(|op| op.name() == name).count()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
///
/// Validation is deferred to [`CircuitBuilder::build`], so chains stay free of `?`.
pub struct CircuitBuilder {
    name: Option<String>,
    num_qubits: usize,
    num_clbits: usize,
    operations: Vec<Operation>,
}

impl CircuitBuilder {
    /// Creates a builder for a circuit with the given register sizes.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            name: None,
            num_qubits,
            num_clbits,
            operations: Vec::new(),
        }
    }

    /// Labels the circuit.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations.extend(ops);
        self
    }

    /// Validates every operation and returns the finished `Circuit`.
    pub fn build(self) -> Result<Circuit> {
        let mut circuit = Circuit::new(self.num_qubits, self.num_clbits);
        circuit.name = self.name;
        circuit.add_operations(self.operations)?;
        Ok(circuit)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.name.as_deref().unwrap_or("circuit");
        if self.operations.is_empty() || self.num_qubits == 0 {
            return writeln!(f, "{}[0 operations on {} qubits]", title, self.num_qubits);
        }

        let ops = &self.operations;
        let num_ops = ops.len();
        let num_qubits = self.num_qubits;

        let max_label_width = format!("{}", QubitId(num_qubits - 1)).len();
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "

        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────"; // GATE_WIDTH dashes
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_qubits];
        // v_connect[row][time] stores the vertical connector char below this row at this time
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::Reset { targets } => {
                    for q in targets {
                        op_grid[q.index()][t] = format_gate("|0>");
                    }
                }
                Operation::Barrier { targets } => {
                    for q in targets {
                        op_grid[q.index()][t] = format_gate("░");
                    }
                }
                Operation::Hadamard { target } => op_grid[target.index()][t] = format_gate("H"),
                Operation::PauliX { target } => op_grid[target.index()][t] = format_gate("X"),
                Operation::Rx { target, .. } => op_grid[target.index()][t] = format_gate("Rx"),
                Operation::MultiControlledPhase { controls, target, .. } => {
                    for c in controls {
                        op_grid[c.index()][t] = format_gate("@");
                    }
                    op_grid[target.index()][t] = format_gate("P");

                    let rows = controls.iter().chain(std::iter::once(target)).map(|q| q.index());
                    let r_min = rows.clone().min().unwrap_or(target.index());
                    let r_max = rows.max().unwrap_or(target.index());
                    for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                        row_vec[t] = V_WIRE;
                    }
                }
                Operation::Measure { qubit, .. } => op_grid[qubit.index()][t] = format_gate("M"),
            }
        }

        writeln!(
            f,
            "{}[{} operations on {} qubits, {} clbits]",
            title, num_ops, num_qubits, self.num_clbits
        )?;
        for r in 0..num_qubits {
            let label = format!("{}: ", QubitId(r));
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
