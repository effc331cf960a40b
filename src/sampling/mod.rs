// src/sampling/mod.rs

//! Repeated single-shot QAOA runs, aggregated into a satisfaction report.

use crate::config::QaoaConfig;
use crate::core::{QaoaError, Result};
use crate::qaoa::QaoaAssembler;
use crate::separator::SeparatorCircuit;
use crate::simulation::BackendKind;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

/// Aggregate of `iterations` independent QAOA invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingReport {
    iterations: usize,
    target: String,
    hits: usize,
    counts: HashMap<String, usize>,
    total_satisfied_clauses: usize,
}

impl SamplingReport {
    /// Number of invocations performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The bitstring counted as a hit.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Invocations whose bitstring equalled the target.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Histogram of every bitstring observed.
    pub fn counts(&self) -> &HashMap<String, usize> {
        &self.counts
    }

    /// `hits / iterations`, or 0.0 for an empty report.
    pub fn frequency(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.hits as f64 / self.iterations as f64
        }
    }

    /// Average number of clauses satisfied by the sampled assignments.
    pub fn mean_satisfied_clauses(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.total_satisfied_clauses as f64 / self.iterations as f64
        }
    }

    /// The most frequent bitstring, ties broken by the smaller string.
    pub fn most_frequent(&self) -> Option<(&str, usize)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(bits, count)| (bits.as_str(), *count))
    }
}

impl fmt::Display for SamplingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} hits for '{}' in {} runs ({:.4})",
            self.hits,
            self.target,
            self.iterations,
            self.frequency()
        )?;
        writeln!(f, "  mean satisfied clauses: {:.4}", self.mean_satisfied_clauses())?;
        let mut sorted: Vec<_> = self.counts.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        for (bits, count) in sorted {
            writeln!(f, "    {}: {}", bits, count)?;
        }
        Ok(())
    }
}

/// Runs the one-shot QAOA invocation many times and tallies the outcomes.
///
/// A single backend is created up front and reused, so a seeded evaluator is
/// reproducible as a whole while individual iterations still differ.
#[derive(Debug, Clone)]
pub struct SamplingEvaluator {
    iterations: usize,
    noise_enabled: bool,
    seed: Option<u64>,
}

impl SamplingEvaluator {
    /// Evaluator performing `iterations` runs on the exact backend.
    pub fn new(iterations: usize) -> Self {
        Self { iterations, noise_enabled: false, seed: None }
    }

    /// Takes the noise flag and seed from `config`.
    pub fn from_config(config: &QaoaConfig, iterations: usize) -> Self {
        Self { iterations, noise_enabled: config.noise_enabled, seed: config.seed }
    }

    /// Routes runs to the noisy backend.
    pub fn with_noise(mut self, noise_enabled: bool) -> Self {
        self.noise_enabled = noise_enabled;
        self
    }

    /// Seeds the backend.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Counts how often the all-ones assignment, which satisfies every
    /// clause, is sampled.
    pub fn evaluate(&self, separator: &SeparatorCircuit, n: usize, beta: f64) -> Result<SamplingReport> {
        self.evaluate_target(separator, n, beta, &"1".repeat(n))
    }

    /// Counts how often `target` is sampled.
    ///
    /// # Errors
    /// `InvalidOperation` if `target` is not an `n`-character bitstring, plus
    /// anything a single invocation can return.
    pub fn evaluate_target(
        &self,
        separator: &SeparatorCircuit,
        n: usize,
        beta: f64,
        target: &str,
    ) -> Result<SamplingReport> {
        if target.len() != n || target.chars().any(|c| c != '0' && c != '1') {
            return Err(QaoaError::invalid_operation(format!(
                "Target '{}' is not a {}-bit string",
                target, n
            )));
        }

        let assembler = QaoaAssembler::new();
        let mut backend = BackendKind::from_noise_flag(self.noise_enabled).create(self.seed);
        let expression = separator.expression();

        let mut report = SamplingReport {
            iterations: 0,
            target: target.to_string(),
            hits: 0,
            counts: HashMap::new(),
            total_satisfied_clauses: 0,
        };

        for i in 0..self.iterations {
            let (_, measurement) = assembler.run_with(backend.as_mut(), separator, n, beta)?;
            trace!(iteration = i, bits = %measurement, "sampled");
            report.iterations += 1;
            report.total_satisfied_clauses += expression.satisfied_clauses(&measurement.assignment());
            if measurement.as_str() == target {
                report.hits += 1;
            }
            *report.counts.entry(measurement.as_str().to_string()).or_insert(0) += 1;
        }

        debug!(
            iterations = report.iterations,
            hits = report.hits,
            backend = backend.name(),
            "sampling finished"
        );
        Ok(report)
    }
}
