//! Property-based tests for canonical serialization.
//!
//! Tests that program → QASM2 → program is a fixpoint of `qasm()`.

use proptest::prelude::*;
use qunroll_qasm2::ast::{
    Argument, BinOp, CustomUnitary, Expression, GateDecl, GateHeader, GateOp, GopList, IdList,
    Identifier, IfStatement, Program, Qop, RegisterDecl, Statement, UnaryFn, Uop,
};
use qunroll_qasm2::parse;

/// Names ending in a digit never collide with keywords.
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z]{1,3}[0-9]"
}

fn arb_leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        (0_u64..1000).prop_map(Expression::Int),
        (0.0_f64..1.0e6).prop_map(Expression::Real),
        Just(Expression::Pi),
    ]
}

fn arb_expression() -> impl Strategy<Value = Expression> {
    arb_leaf().prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| Expression::Neg(Box::new(e))),
            (
                inner.clone(),
                prop_oneof![
                    Just(BinOp::Add),
                    Just(BinOp::Sub),
                    Just(BinOp::Mul),
                    Just(BinOp::Div),
                    Just(BinOp::Pow),
                ],
                inner.clone()
            )
                .prop_map(|(l, op, r)| Expression::binop(l, op, r)),
            inner.prop_map(|e| Expression::Call {
                func: UnaryFn::Cos,
                arg: Box::new(e),
            }),
        ]
    })
}

fn arb_argument() -> impl Strategy<Value = Argument> {
    prop_oneof![
        arb_name().prop_map(Argument::id),
        (arb_name(), 0_usize..16).prop_map(|(n, i)| Argument::indexed(n, i)),
    ]
}

fn arb_qop() -> impl Strategy<Value = Qop> {
    prop_oneof![
        (
            arb_name(),
            prop::collection::vec(arb_expression(), 0..3),
            prop::collection::vec(arb_argument(), 1..4)
        )
            .prop_map(|(name, params, args)| {
                Qop::Unitary(Uop::Custom(CustomUnitary::new(name, params, args)))
            }),
        (prop::collection::vec(arb_expression(), 3), arb_argument())
            .prop_map(|(params, target)| Qop::Unitary(Uop::U { params, target })),
        (arb_argument(), arb_argument())
            .prop_map(|(control, target)| Qop::Unitary(Uop::Cx { control, target })),
        (arb_argument(), arb_argument()).prop_map(|(qubit, clbit)| Qop::Measure { qubit, clbit }),
        arb_argument().prop_map(|target| Qop::Reset { target }),
    ]
}

fn arb_gate_decl() -> impl Strategy<Value = Statement> {
    (
        arb_name(),
        prop::collection::vec(arb_name(), 0..3),
        prop::collection::vec(arb_name(), 1..4),
        prop::collection::vec(arb_name(), 0..4),
    )
        .prop_map(|(name, params, qubits, callees)| {
            let ops = callees
                .into_iter()
                .map(|callee| {
                    GateOp::Uop(Uop::Custom(CustomUnitary::new(
                        callee,
                        vec![],
                        vec![Argument::id(qubits[0].clone())],
                    )))
                })
                .collect();
            Statement::GateDecl(GateDecl::new(
                GateHeader {
                    name: Identifier::new(name),
                    params: IdList::from_names(params),
                    qubits: IdList::from_names(qubits),
                },
                GopList::new(ops),
            ))
        })
}

fn arb_statement() -> impl Strategy<Value = Statement> {
    prop_oneof![
        (arb_name(), 1_usize..32)
            .prop_map(|(n, size)| Statement::Decl(RegisterDecl::quantum(Identifier::new(n), size))),
        (arb_name(), 1_usize..32).prop_map(|(n, size)| {
            Statement::Decl(RegisterDecl::classical(Identifier::new(n), size))
        }),
        arb_qop().prop_map(Statement::Qop),
        (arb_name(), 0_u64..64, arb_qop()).prop_map(|(register, value, op)| {
            Statement::If(IfStatement {
                register: Identifier::new(register),
                value,
                op,
            })
        }),
        prop::collection::vec(arb_argument(), 1..4).prop_map(Statement::Barrier),
        arb_gate_decl(),
    ]
}

fn arb_program() -> impl Strategy<Value = Program> {
    prop::collection::vec(arb_statement(), 0..12).prop_map(|statements| Program {
        statements,
        ..Program::new()
    })
}

proptest! {
    #[test]
    fn qasm_is_a_parse_fixpoint(program in arb_program()) {
        let text = program.qasm();
        let parsed = parse(&text).unwrap();
        prop_assert_eq!(parsed.statements.len(), program.statements.len());
        prop_assert_eq!(parsed.qasm(), text);
    }

    #[test]
    fn expressions_keep_their_value(expr in arb_expression()) {
        let Some(expected) = expr.as_f64() else {
            return Ok(());
        };
        let text = format!("OPENQASM 2.0;\nU({}) q;", expr.qasm());
        let parsed = parse(&text).unwrap();
        let Statement::Qop(Qop::Unitary(Uop::U { params, .. })) = &parsed.statements[0] else {
            panic!("expected U");
        };
        let actual = params[0].as_f64().unwrap();
        prop_assert!(
            actual == expected || (actual.is_nan() && expected.is_nan()),
            "{} evaluated to {} after reparse, {} before", expr.qasm(), actual, expected
        );
    }
}
