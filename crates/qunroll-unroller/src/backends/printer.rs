//! Backend that writes flat OpenQASM.

use crate::backend::{Condition, UnrollerBackend};
use crate::error::UnrollResult;
use crate::regbit::RegBit;
use crate::symbols::GateData;

/// Prints the unrolled program as OpenQASM 2.0 text.
///
/// The output has no gate declarations besides `opaque` ones: every
/// operation is a basis gate, `U` or `CX`. Include lines given with
/// [`QasmPrinter::with_include`] follow the version header so that basis
/// gates from a library stay resolvable.
#[derive(Debug, Clone, Default)]
pub struct QasmPrinter {
    includes: Vec<String>,
    out: String,
}

impl QasmPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include(mut self, file: impl Into<String>) -> Self {
        self.includes.push(file.into());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn line(&mut self, condition: Option<&Condition>, text: &str) {
        if let Some(condition) = condition {
            self.out
                .push_str(&format!("if({}=={}) ", condition.register, condition.value));
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn gate_line(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[RegBit],
        condition: Option<&Condition>,
    ) {
        let params = if params.is_empty() {
            String::new()
        } else {
            let values: Vec<String> = params.iter().map(|v| format!("{v:?}")).collect();
            format!("({})", values.join(","))
        };
        self.line(condition, &format!("{}{} {};", name, params, join_bits(qubits)));
    }
}

fn join_bits(bits: &[RegBit]) -> String {
    bits.iter()
        .map(RegBit::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl UnrollerBackend for QasmPrinter {
    fn version(&mut self, version: &str) -> UnrollResult<()> {
        self.line(None, &format!("OPENQASM {version};"));
        for file in self.includes.clone() {
            self.line(None, &format!("include \"{file}\";"));
        }
        Ok(())
    }

    fn declare_qreg(&mut self, name: &str, size: usize) -> UnrollResult<()> {
        self.line(None, &format!("qreg {name}[{size}];"));
        Ok(())
    }

    fn declare_creg(&mut self, name: &str, size: usize) -> UnrollResult<()> {
        self.line(None, &format!("creg {name}[{size}];"));
        Ok(())
    }

    fn define_gate(&mut self, gate: &GateData<'_>) -> UnrollResult<()> {
        if gate.is_opaque() {
            let params = if gate.params.is_empty() {
                String::new()
            } else {
                format!("({})", gate.params.qasm())
            };
            self.line(
                None,
                &format!("opaque {}{} {};", gate.name.name, params, gate.bits.qasm()),
            );
        }
        Ok(())
    }

    fn apply_unitary(&mut self, name: &str, params: &[f64], qubits: &[RegBit]) -> UnrollResult<()> {
        self.gate_line(name, params, qubits, None);
        Ok(())
    }

    fn apply_conditioned_unitary(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[RegBit],
        condition: &Condition,
    ) -> UnrollResult<()> {
        self.gate_line(name, params, qubits, Some(condition));
        Ok(())
    }

    fn measure(&mut self, qubit: &RegBit, clbit: &RegBit) -> UnrollResult<()> {
        self.line(None, &format!("measure {qubit} -> {clbit};"));
        Ok(())
    }

    fn reset(&mut self, qubit: &RegBit) -> UnrollResult<()> {
        self.line(None, &format!("reset {qubit};"));
        Ok(())
    }

    fn barrier(&mut self, qubits: &[RegBit]) -> UnrollResult<()> {
        self.line(None, &format!("barrier {};", join_bits(qubits)));
        Ok(())
    }

    fn measure_conditioned(
        &mut self,
        qubit: &RegBit,
        clbit: &RegBit,
        condition: &Condition,
    ) -> UnrollResult<()> {
        self.line(Some(condition), &format!("measure {qubit} -> {clbit};"));
        Ok(())
    }

    fn reset_conditioned(&mut self, qubit: &RegBit, condition: &Condition) -> UnrollResult<()> {
        self.line(Some(condition), &format!("reset {qubit};"));
        Ok(())
    }

    fn opaque_gate(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[RegBit],
        condition: Option<&Condition>,
    ) -> UnrollResult<()> {
        self.gate_line(name, params, qubits, condition);
        Ok(())
    }
}
