//! The capability interface the unroller drives.

use serde::{Deserialize, Serialize};

use crate::error::{UnrollError, UnrollResult};
use crate::regbit::RegBit;
use crate::symbols::GateData;

/// Classical condition attached to the operations of an `if` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Classical register compared.
    pub register: String,
    /// Value the register must hold.
    pub value: u64,
}

impl Condition {
    pub fn new(register: impl Into<String>, value: u64) -> Self {
        Self {
            register: register.into(),
            value,
        }
    }
}

/// Sink for unrolled operations.
///
/// The unroller calls these methods synchronously and in program order.
/// Any error a method returns aborts the pass and reaches the caller of
/// [`Unroller::execute`](crate::Unroller::execute) unchanged; use
/// [`UnrollError::backend`] to wrap backend-specific failures.
pub trait UnrollerBackend {
    /// The program's `OPENQASM` version.
    fn version(&mut self, version: &str) -> UnrollResult<()> {
        let _ = version;
        Ok(())
    }

    fn declare_qreg(&mut self, name: &str, size: usize) -> UnrollResult<()>;

    fn declare_creg(&mut self, name: &str, size: usize) -> UnrollResult<()>;

    /// A gate or opaque declaration of the program.
    fn define_gate(&mut self, gate: &GateData<'_>) -> UnrollResult<()> {
        let _ = gate;
        Ok(())
    }

    /// Elementary unitary: a basis gate, `U` or `CX`.
    fn apply_unitary(&mut self, name: &str, params: &[f64], qubits: &[RegBit]) -> UnrollResult<()>;

    fn apply_conditioned_unitary(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[RegBit],
        condition: &Condition,
    ) -> UnrollResult<()>;

    fn measure(&mut self, qubit: &RegBit, clbit: &RegBit) -> UnrollResult<()>;

    fn reset(&mut self, qubit: &RegBit) -> UnrollResult<()>;

    fn barrier(&mut self, qubits: &[RegBit]) -> UnrollResult<()>;

    fn measure_conditioned(
        &mut self,
        qubit: &RegBit,
        clbit: &RegBit,
        condition: &Condition,
    ) -> UnrollResult<()> {
        let _ = (qubit, clbit, condition);
        Err(UnrollError::ConditionalNotSupported {
            operation: "measure".into(),
        })
    }

    fn reset_conditioned(&mut self, qubit: &RegBit, condition: &Condition) -> UnrollResult<()> {
        let _ = (qubit, condition);
        Err(UnrollError::ConditionalNotSupported {
            operation: "reset".into(),
        })
    }

    /// Call of an opaque gate. The unroller has no body to expand.
    fn opaque_gate(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[RegBit],
        condition: Option<&Condition>,
    ) -> UnrollResult<()> {
        let _ = (params, qubits, condition);
        Err(UnrollError::OpaqueNotUnrollable { name: name.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Implements only the required methods.
    struct Minimal;

    impl UnrollerBackend for Minimal {
        fn declare_qreg(&mut self, _: &str, _: usize) -> UnrollResult<()> {
            Ok(())
        }
        fn declare_creg(&mut self, _: &str, _: usize) -> UnrollResult<()> {
            Ok(())
        }
        fn apply_unitary(&mut self, _: &str, _: &[f64], _: &[RegBit]) -> UnrollResult<()> {
            Ok(())
        }
        fn apply_conditioned_unitary(
            &mut self,
            _: &str,
            _: &[f64],
            _: &[RegBit],
            _: &Condition,
        ) -> UnrollResult<()> {
            Ok(())
        }
        fn measure(&mut self, _: &RegBit, _: &RegBit) -> UnrollResult<()> {
            Ok(())
        }
        fn reset(&mut self, _: &RegBit) -> UnrollResult<()> {
            Ok(())
        }
        fn barrier(&mut self, _: &[RegBit]) -> UnrollResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_conditioned_variants_fail() {
        let mut backend = Minimal;
        let q = RegBit::new("q", 0);
        let c = RegBit::new("c", 0);
        let cond = Condition::new("c", 1);

        assert!(matches!(
            backend.measure_conditioned(&q, &c, &cond),
            Err(UnrollError::ConditionalNotSupported { ref operation }) if operation == "measure"
        ));
        assert!(matches!(
            backend.reset_conditioned(&q, &cond),
            Err(UnrollError::ConditionalNotSupported { ref operation }) if operation == "reset"
        ));
    }

    #[test]
    fn test_default_opaque_gate_fails() {
        let mut backend = Minimal;
        let err = backend
            .opaque_gate("magic", &[], &[RegBit::new("q", 0)], None)
            .unwrap_err();
        assert!(matches!(err, UnrollError::OpaqueNotUnrollable { ref name } if name == "magic"));
        assert!(backend.version("2.0").is_ok());
    }
}
