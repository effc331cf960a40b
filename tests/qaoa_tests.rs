// tests/qaoa_tests.rs

use qaoa2sat::{
    BooleanExpression, Operation, QaoaAssembler, QaoaConfig, QaoaError, SamplingEvaluator, SeparatorBuilder,
    StatevectorSimulator,
};

use approx::assert_abs_diff_eq;
use std::f64::consts::PI;

fn is_bitstring(bits: &str, n: usize) -> bool {
    bits.len() == n && bits.chars().all(|c| c == '0' || c == '1')
}

#[test]
fn test_fixed_instance_end_to_end() -> Result<(), QaoaError> {
    println!("\n--- Test: FourClauseChain with both mixer angles ---");
    let config = QaoaConfig::default();
    let separator = SeparatorBuilder::build(config.expression, config.gamma)?;
    let assembler = QaoaAssembler::new();

    for beta in &config.betas {
        let (circuit, bits) = assembler.assemble_and_run(&separator, config.num_qubits, *beta, false)?;
        println!("beta = {}: {}", beta, bits);
        assert!(is_bitstring(bits.as_str(), 5), "bad bitstring {}", bits);
        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.count_ops("measure"), 5);
        assert_eq!(circuit.count_ops("mcp"), 4);
    }
    Ok(())
}

#[test]
fn test_bitstring_length_matches_primary_count() -> Result<(), QaoaError> {
    let assembler = QaoaAssembler::with_seed(Some(5));
    for expression in BooleanExpression::ALL {
        let n = expression.num_variables();
        let separator = SeparatorBuilder::build(expression, PI / 4.0)?;
        let (_, bits) = assembler.assemble_and_run(&separator, n, PI / 3.0, false)?;
        assert!(is_bitstring(bits.as_str(), n), "{}: got {}", expression, bits);
        assert_eq!(bits.assignment().len(), n);
    }
    Ok(())
}

#[test]
fn test_qubit_count_mismatch() -> Result<(), QaoaError> {
    let separator = SeparatorBuilder::build(BooleanExpression::OneClause, PI / 4.0)?;
    let result = QaoaAssembler::new().assemble_and_run(&separator, 3, PI / 4.0, false);
    assert_eq!(result.err(), Some(QaoaError::QubitCountMismatch { expected: 2, actual: 3 }));
    Ok(())
}

#[test]
fn test_unsupported_expression() {
    let result = SeparatorBuilder::build_from_str("(x0 v x1)", PI / 4.0);
    assert!(matches!(result, Err(QaoaError::UnsupportedExpression { .. })));
}

#[test]
fn test_single_literal_is_deterministic() -> Result<(), QaoaError> {
    let separator = SeparatorBuilder::build(BooleanExpression::SingleLiteral, PI / 2.0)?;
    let assembler = QaoaAssembler::new();
    for _ in 0..10 {
        let (_, bits) = assembler.assemble_and_run(&separator, 1, PI / 4.0, false)?;
        assert_eq!(bits.as_str(), "1");
        let (_, bits) = assembler.assemble_and_run(&separator, 1, 3.0 * PI / 4.0, false)?;
        assert_eq!(bits.as_str(), "0");
    }
    Ok(())
}

#[test]
fn test_zero_beta_leaves_uniform_distribution() -> Result<(), QaoaError> {
    // Separator phases do not change measurement probabilities and Rx(0) is the identity
    let separator = SeparatorBuilder::build(BooleanExpression::OneClause, 1.3)?;
    let iterations = 2000;
    let report = SamplingEvaluator::new(iterations).with_seed(17).evaluate(&separator, 2, 0.0)?;

    for bits in ["00", "01", "10", "11"] {
        let freq = report.counts().get(bits).copied().unwrap_or(0) as f64 / iterations as f64;
        assert_abs_diff_eq!(freq, 0.25, epsilon = 0.05);
    }
    assert_abs_diff_eq!(report.frequency(), 0.25, epsilon = 0.05);
    Ok(())
}

#[test]
fn test_seeded_assembler_is_reproducible() -> Result<(), QaoaError> {
    let separator = SeparatorBuilder::build(BooleanExpression::FourClauseChain, PI / 4.0)?;
    let first = QaoaAssembler::with_seed(Some(99)).assemble_and_run(&separator, 5, PI / 4.0, false)?;
    let second = QaoaAssembler::with_seed(Some(99)).assemble_and_run(&separator, 5, PI / 4.0, false)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_noisy_run_returns_full_bitstring() -> Result<(), QaoaError> {
    let separator = SeparatorBuilder::build(BooleanExpression::FourClauseChain, PI / 4.0)?;
    let (_, bits) = QaoaAssembler::with_seed(Some(2)).assemble_and_run(&separator, 5, PI / 2.0, true)?;
    assert!(is_bitstring(bits.as_str(), 5));
    Ok(())
}

#[test]
fn test_run_with_shared_backend_varies_between_calls() -> Result<(), QaoaError> {
    let separator = SeparatorBuilder::build(BooleanExpression::OneClause, PI / 4.0)?;
    let assembler = QaoaAssembler::new();
    let mut backend = StatevectorSimulator::with_seed(Some(31));
    let mut seen = std::collections::HashSet::new();
    for _ in 0..50 {
        let (_, bits) = assembler.run_with(&mut backend, &separator, 2, 0.0)?;
        seen.insert(bits.as_str().to_string());
    }
    assert!(seen.len() > 1, "fifty uniform samples all agreed");
    Ok(())
}

#[test]
fn test_assembled_circuit_structure() -> Result<(), QaoaError> {
    let separator = SeparatorBuilder::build(BooleanExpression::TwoClauseChain, 0.7)?;
    let circuit = QaoaAssembler::new().assemble(&separator, 3, 0.2)?;

    assert_eq!(circuit.name(), Some("QAOA"));
    assert_eq!(circuit.count_ops("h"), 3);
    assert_eq!(circuit.count_ops("x"), 1);
    assert_eq!(circuit.count_ops("rx"), 3);
    for op in circuit.operations() {
        match op {
            Operation::MultiControlledPhase { target, theta, .. } => {
                assert_eq!(target.index(), 3);
                assert_abs_diff_eq!(*theta, -0.7);
            }
            Operation::Rx { theta, .. } => assert_abs_diff_eq!(*theta, 0.4),
            _ => {}
        }
    }
    let rendered = format!("{}", circuit);
    assert!(rendered.starts_with("QAOA["));
    Ok(())
}
