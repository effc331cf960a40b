// src/simulation/results.rs
use crate::core::{QaoaError, Result};
use std::collections::HashMap;
use std::fmt;

/// Renders a classical register as a bitstring, highest slot first, so slot 0
/// is the rightmost character.
pub(crate) fn format_bits(clbits: &[u8]) -> String {
    clbits.iter().rev().map(|b| if *b == 1 { '1' } else { '0' }).collect()
}

/// Outcome of one `Backend::run` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    backend: String,
    shots: usize,
    /// Per-shot bitstrings, kept only when memory was requested.
    memory: Option<Vec<String>>,
    counts: HashMap<String, usize>,
}

impl RunResult {
    pub(crate) fn new(backend: impl Into<String>, keep_memory: bool) -> Self {
        Self {
            backend: backend.into(),
            shots: 0,
            memory: keep_memory.then(Vec::new),
            counts: HashMap::new(),
        }
    }

    pub(crate) fn record_shot(&mut self, bits: String) {
        self.shots += 1;
        *self.counts.entry(bits.clone()).or_insert(0) += 1;
        if let Some(memory) = self.memory.as_mut() {
            memory.push(bits);
        }
    }

    /// Name of the backend that produced the result.
    pub fn backend_name(&self) -> &str {
        &self.backend
    }

    /// Number of shots executed.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Per-shot bitstrings in execution order.
    ///
    /// # Errors
    /// `BackendFailure` if the run was not asked to keep memory.
    pub fn get_memory(&self) -> Result<&[String]> {
        self.memory
            .as_deref()
            .ok_or_else(|| QaoaError::backend("No memory for this run; request it with memory = true"))
    }

    /// Histogram of observed bitstrings.
    pub fn get_counts(&self) -> &HashMap<String, usize> {
        &self.counts
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Results ({}, {} shots):", self.backend, self.shots)?;
        if self.counts.is_empty() {
            writeln!(f, "  No outcomes recorded.")?;
        } else {
            // Sort by bitstring for consistent and readable output
            let mut sorted: Vec<_> = self.counts.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            for (bits, count) in sorted {
                writeln!(f, "    {}: {}", bits, count)?;
            }
        }
        Ok(())
    }
}

/// A single sampled assignment of the primary qubits.
///
/// The string is stored exactly as the backend reported it: slot 0 is the
/// rightmost character. Use [`MeasurementResult::bit`] to read by slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MeasurementResult {
    bits: String,
}

impl MeasurementResult {
    /// Wraps a backend bitstring, rejecting anything but `0`/`1` characters.
    pub fn new(bits: impl Into<String>) -> Result<Self> {
        let bits = bits.into();
        if let Some(c) = bits.chars().find(|c| *c != '0' && *c != '1') {
            return Err(QaoaError::backend(format!("Unexpected character '{}' in bitstring '{}'", c, bits)));
        }
        Ok(Self { bits })
    }

    /// The raw bitstring.
    pub fn as_str(&self) -> &str {
        &self.bits
    }

    /// Number of measured slots.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when nothing was measured.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Value of classical slot `slot`, or `None` if out of range.
    pub fn bit(&self, slot: usize) -> Option<bool> {
        let len = self.bits.len();
        if slot >= len {
            return None;
        }
        self.bits.as_bytes().get(len - 1 - slot).map(|b| *b == b'1')
    }

    /// Slot values, slot 0 first.
    pub fn assignment(&self) -> Vec<bool> {
        self.bits.bytes().rev().map(|b| b == b'1').collect()
    }
}

impl fmt::Display for MeasurementResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bits)
    }
}
