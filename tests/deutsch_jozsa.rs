use quantum_algos::deutsch_jozsa::{classify, synthesize};
use quantum_algos::{
    AlgoError, Backend, Circuit, Classification, DeutschJozsa, DeutschJozsaConfig, OracleCategory,
    OracleKind, OracleSpec, QubitId, StateVectorSimulator, TruthTable, validate_oracle,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn dj(n: u32, oracle: OracleSpec, shots: u32) -> DeutschJozsa {
    DeutschJozsa::new(n, oracle, DeutschJozsaConfig { shots }).unwrap()
}

#[tokio::test]
async fn constant_oracles_classify_as_constant() {
    let sim = StateVectorSimulator::seeded(1);
    for n in 1..=5 {
        for bit in [false, true] {
            for shots in [1, 7, 256] {
                let class = dj(n, OracleSpec::Constant(bit), shots)
                    .classify(&sim)
                    .await
                    .unwrap();
                assert_eq!(class, Classification::Constant, "n={n} bit={bit} shots={shots}");
            }
        }
    }
}

#[tokio::test]
async fn parity_oracle_classifies_as_balanced() {
    let sim = StateVectorSimulator::seeded(2);
    for n in 1..=6 {
        let class = dj(n, OracleSpec::Balanced, 128).classify(&sim).await.unwrap();
        assert_eq!(class, Classification::Balanced, "n={n}");
    }
}

#[tokio::test]
async fn random_balanced_tables_classify_as_balanced() {
    let sim = StateVectorSimulator::seeded(3);
    let mut rng = StdRng::seed_from_u64(3);
    for n in 1..=4 {
        for _ in 0..4 {
            let spec = OracleSpec::resolve(n, OracleKind::Custom, 0, None, &mut rng).unwrap();
            assert_eq!(validate_oracle(&spec), OracleCategory::Balanced);
            let class = dj(n, spec, 128).classify(&sim).await.unwrap();
            assert_eq!(class, Classification::Balanced, "n={n}");
        }
    }
}

#[tokio::test]
async fn custom_tables_agree_with_offline_check() {
    let sim = StateVectorSimulator::seeded(4);
    let cases = [
        (1, "01", Classification::Balanced),
        (1, "10", Classification::Balanced),
        (1, "11", Classification::Constant),
        (2, "0000", Classification::Constant),
        (2, "1111", Classification::Constant),
        (2, "0110", Classification::Balanced),
        (3, "11000011", Classification::Balanced),
        (3, "10101010", Classification::Balanced),
    ];
    for (n, bits, expected) in cases {
        let spec = OracleSpec::Custom(TruthTable::parse(n, bits).unwrap());
        let offline = validate_oracle(&spec);
        let class = dj(n, spec, 200).classify(&sim).await.unwrap();
        assert_eq!(class, expected, "{bits}");
        assert_eq!(offline.to_string(), expected.to_string(), "{bits}");
    }
}

#[tokio::test]
async fn free_function_works_through_dyn_backend() {
    let sim = StateVectorSimulator::seeded(5);
    let backend: &dyn Backend<Circuit> = &sim;
    let class = classify(3, OracleSpec::Balanced, 64, backend).await.unwrap();
    assert_eq!(class, Classification::Balanced);
    assert_eq!(sim.jobs_submitted(), 1);
}

#[tokio::test]
async fn invalid_configuration_fails_before_simulation() {
    let sim = StateVectorSimulator::seeded(6);

    let err = classify(0, OracleSpec::Balanced, 64, &sim).await.unwrap_err();
    assert!(err.is_validation());

    let err = classify(2, OracleSpec::Balanced, 0, &sim).await.unwrap_err();
    assert!(matches!(err, AlgoError::InvalidParameter(_)));

    let err = TruthTable::parse(3, "0101").unwrap_err();
    assert!(matches!(err, AlgoError::InvalidOracleSpec(_)));

    assert_eq!(sim.jobs_submitted(), 0);
}

#[test]
fn circuit_references_only_declared_qubits() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in 1..=4 {
        for kind in [OracleKind::Constant, OracleKind::Balanced, OracleKind::Custom] {
            let spec = OracleSpec::resolve(n, kind, 1, None, &mut rng).unwrap();
            let circuit = dj(n, spec, 10).circuit().unwrap();
            circuit.validate().unwrap();
            for op in circuit.ops() {
                for q in op.qubits() {
                    assert!(circuit.register_of(q).is_some());
                }
            }
            assert_eq!(circuit.measurements().len(), n as usize);
            for m in circuit.measurements() {
                assert_eq!(circuit.register_of(m.qubit).unwrap().name(), "input");
            }
        }
    }
}

#[test]
fn synthesize_rejects_wrong_width_before_emitting() {
    let table = TruthTable::parse(2, "0110").unwrap();
    let inputs = [QubitId(0)];
    let err = synthesize(&OracleSpec::Custom(table), &inputs, QubitId(1)).unwrap_err();
    assert!(matches!(err, AlgoError::InvalidOracleSpec(_)));
}

#[test]
fn circuit_renders_as_qasm() {
    let text = dj(2, OracleSpec::Constant(true), 10).circuit().unwrap().to_string();
    assert!(text.contains("qubit[2] input;"));
    assert!(text.contains("qubit[1] output;"));
    assert!(text.contains("x output[0];"));
    assert!(text.contains("c[0] = measure input[0];"));
}
