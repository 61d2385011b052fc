//! Property tests for register resolution, broadcasting and expansion.

use proptest::prelude::*;
use qunroll_qasm2::parse;
use qunroll_unroller::backends::{BackendCall, Recorder};
use qunroll_unroller::{RegBit, UnrollError, unroll};

fn run(source: &str) -> Result<Vec<BackendCall>, UnrollError> {
    let program = parse(source).expect("source parses");
    let mut recorder = Recorder::new();
    unroll(&program, &mut recorder)?;
    Ok(recorder.operations().cloned().collect())
}

proptest! {
    #[test]
    fn bare_register_resolves_to_every_index(size in 1_usize..40) {
        let source = format!("OPENQASM 2.0;\nqreg r[{size}];\nbarrier r;");
        let ops = run(&source).unwrap();
        prop_assert_eq!(ops, vec![BackendCall::Barrier { qubits: RegBit::range("r", size) }]);
    }

    #[test]
    fn reset_visits_bits_in_order(size in 1_usize..40) {
        let source = format!("OPENQASM 2.0;\nqreg r[{size}];\nreset r;");
        let ops = run(&source).unwrap();
        prop_assert_eq!(ops.len(), size);
        for (i, op) in ops.iter().enumerate() {
            prop_assert_eq!(
                op,
                &BackendCall::Reset { qubit: RegBit::new("r", i), condition: None }
            );
        }
    }

    #[test]
    fn two_register_calls_pair_indices(n in 1_usize..24) {
        let source = format!("OPENQASM 2.0;\nqreg a[{n}];\nqreg b[{n}];\nCX a,b;");
        let ops = run(&source).unwrap();
        prop_assert_eq!(ops.len(), n);
        for (i, op) in ops.iter().enumerate() {
            let BackendCall::Unitary { qubits, .. } = op else {
                return Err(TestCaseError::fail("expected a unitary"));
            };
            prop_assert_eq!(qubits, &vec![RegBit::new("a", i), RegBit::new("b", i)]);
        }
    }

    #[test]
    fn unequal_registers_never_reach_the_backend(n in 2_usize..16, m in 2_usize..16) {
        prop_assume!(n != m);
        let source = format!("OPENQASM 2.0;\nqreg a[{n}];\nqreg b[{m}];\nCX a,b;");
        let program = parse(&source).unwrap();
        let mut recorder = Recorder::new();
        let result = unroll(&program, &mut recorder);
        let is_mismatch = matches!(result, Err(UnrollError::RegisterSizeMismatch { .. }));
        prop_assert!(is_mismatch);
        prop_assert_eq!(recorder.operations().count(), 0);
    }

    #[test]
    fn repeated_calls_do_not_share_bindings(
        first in -10.0_f64..10.0,
        second in -10.0_f64..10.0,
    ) {
        let source = format!(
            "OPENQASM 2.0;\nqreg q[2];\n\
             gate g(t) a {{ U(t,0,0) a; }}\n\
             g({first:?}) q[0];\ng({second:?}) q[1];\ng({first:?}) q[0];"
        );
        let ops = run(&source).unwrap();
        prop_assert_eq!(ops.len(), 3);
        prop_assert_eq!(&ops[0], &ops[2]);
    }
}
