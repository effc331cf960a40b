//! Run configuration

use crate::core::PI;
use crate::separator::BooleanExpression;

/// Parameters of a QAOA run.
///
/// The defaults are the fixed constants the command-line binary runs with.
/// Nothing is read from files or the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct QaoaConfig {
    /// Boolean expression whose separator is used.
    ///
    /// Default: `FourClauseChain`
    pub expression: BooleanExpression,

    /// Number of boolean variables, i.e. primary qubits.
    ///
    /// Default: 5
    pub num_qubits: usize,

    /// Separator phase angle, conventionally in `[0, 2π)`.
    ///
    /// Default: π/4
    pub gamma: f64,

    /// Mixer angles to run, one invocation each, conventionally in `[0, π]`.
    ///
    /// Default: `[π/4, π/2]`
    pub betas: Vec<f64>,

    /// Route runs to the noisy simulator instead of the exact one.
    ///
    /// Default: false
    pub noise_enabled: bool,

    /// Random number generator seed for reproducibility.
    ///
    /// If None, uses a random seed.
    ///
    /// Default: None (random)
    pub seed: Option<u64>,
}

impl Default for QaoaConfig {
    fn default() -> Self {
        Self {
            expression: BooleanExpression::FourClauseChain,
            num_qubits: 5,
            gamma: PI / 4.0,
            betas: vec![PI / 4.0, PI / 2.0],
            noise_enabled: false,
            seed: None,
        }
    }
}

impl QaoaConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the expression and sets `num_qubits` to match it.
    pub fn with_expression(mut self, expression: BooleanExpression) -> Self {
        self.expression = expression;
        self.num_qubits = expression.num_variables();
        self
    }

    /// Overrides the primary qubit count without touching the expression.
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = num_qubits;
        self
    }

    /// Sets gamma.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Replaces the list of mixer angles.
    pub fn with_betas(mut self, betas: Vec<f64>) -> Self {
        self.betas = betas;
        self
    }

    /// Enables or disables the noisy simulator.
    pub fn with_noise(mut self, noise_enabled: bool) -> Self {
        self.noise_enabled = noise_enabled;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
