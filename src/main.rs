// src/main.rs

//! Runs the fixed QAOA instance once per mixer angle and prints each bitstring.

use qaoa2sat::{QaoaAssembler, QaoaConfig, Result, SeparatorBuilder};
use std::f64::consts::PI;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Renders an angle as `pi/k` (or `k*pi`) when it is a simple multiple of pi.
fn pi_label(angle: f64) -> String {
    let ratio = angle / PI;
    if ratio.abs() < 1e-12 {
        return "0".to_string();
    }
    let inverse = 1.0 / ratio;
    if (inverse - inverse.round()).abs() < 1e-9 {
        return match inverse.round() as i64 {
            1 => "pi".to_string(),
            -1 => "-pi".to_string(),
            k => format!("pi/{}", k),
        };
    }
    if (ratio - ratio.round()).abs() < 1e-9 {
        return format!("{}*pi", ratio.round() as i64);
    }
    format!("{}", angle)
}

fn run(config: &QaoaConfig) -> Result<()> {
    let separator = SeparatorBuilder::build(config.expression, config.gamma)?;
    let assembler = QaoaAssembler::with_seed(config.seed);

    for beta in &config.betas {
        let start = Instant::now();
        let (circuit, bits) = assembler.assemble_and_run(&separator, config.num_qubits, *beta, config.noise_enabled)?;
        let elapsed = start.elapsed().as_secs_f64();
        debug!("{}", circuit);
        println!(
            "Time taken is {}, and the Output with mixer using beta = {}:  {}",
            elapsed,
            pi_label(*beta),
            bits
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = QaoaConfig::default();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("QAOA run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
