//! Operand broadcasting.

use qunroll_qasm2::ast::Location;

use crate::error::{UnrollError, UnrollResult};
use crate::regbit::RegBit;

/// Pair resolved operands index by index.
///
/// Each operand is the bit list one argument resolved to. Single bits are
/// repeated against register operands; register operands must all have the
/// same size. Returns one row of bits per elementary call.
pub fn broadcast(
    gate: &str,
    operands: &[Vec<RegBit>],
    loc: &Location,
) -> UnrollResult<Vec<Vec<RegBit>>> {
    let width = operands.iter().map(Vec::len).max().unwrap_or(0);
    if operands.iter().any(|bits| bits.len() != 1 && bits.len() != width) {
        return Err(UnrollError::RegisterSizeMismatch {
            gate: gate.to_string(),
            sizes: operands.iter().map(Vec::len).collect(),
            loc: loc.clone(),
        });
    }

    Ok((0..width)
        .map(|i| {
            operands
                .iter()
                .map(|bits| {
                    if bits.len() == 1 {
                        bits[0].clone()
                    } else {
                        bits[i].clone()
                    }
                })
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reg(name: &str, size: usize) -> Vec<RegBit> {
        RegBit::range(name, size)
    }

    #[test]
    fn test_single_bits_pass_through() {
        let rows = broadcast(
            "cx",
            &[reg("a", 1), vec![RegBit::new("b", 3)]],
            &Location::default(),
        )
        .unwrap();
        assert_eq!(rows, vec![vec![RegBit::new("a", 0), RegBit::new("b", 3)]]);
    }

    #[test]
    fn test_bit_repeated_against_register() {
        let rows = broadcast(
            "cx",
            &[vec![RegBit::new("a", 2)], reg("b", 3)],
            &Location::default(),
        )
        .unwrap();
        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row, &vec![RegBit::new("a", 2), RegBit::new("b", i)]);
        }
    }

    #[test]
    fn test_mismatched_registers() {
        let err = broadcast("cx", &[reg("a", 2), reg("b", 3)], &Location::new("x.qasm", 7))
            .unwrap_err();
        match err {
            UnrollError::RegisterSizeMismatch { gate, sizes, loc } => {
                assert_eq!(gate, "cx");
                assert_eq!(sizes, vec![2, 3]);
                assert_eq!(loc.line, 7);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    proptest! {
        #[test]
        fn equal_registers_pair_equal_indices(n in 1_usize..32) {
            let rows = broadcast("cx", &[reg("a", n), reg("b", n)], &Location::default()).unwrap();
            prop_assert_eq!(rows.len(), n);
            for (i, row) in rows.iter().enumerate() {
                prop_assert_eq!(row[0].index, i);
                prop_assert_eq!(row[1].index, i);
            }
        }

        #[test]
        fn unequal_registers_fail(n in 2_usize..32, m in 2_usize..32) {
            prop_assume!(n != m);
            let result = broadcast("cx", &[reg("a", n), reg("b", m)], &Location::default());
            let is_mismatch = matches!(result, Err(UnrollError::RegisterSizeMismatch { .. }));
            prop_assert!(is_mismatch);
        }
    }
}
