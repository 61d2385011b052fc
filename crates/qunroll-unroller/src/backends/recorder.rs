//! Backend that records every call.

use serde::Serialize;

use crate::backend::{Condition, UnrollerBackend};
use crate::error::UnrollResult;
use crate::regbit::RegBit;
use crate::symbols::GateData;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BackendCall {
    DeclareQreg {
        name: String,
        size: usize,
    },
    DeclareCreg {
        name: String,
        size: usize,
    },
    DefineGate {
        name: String,
        params: Vec<String>,
        bits: Vec<String>,
        opaque: bool,
    },
    Unitary {
        name: String,
        params: Vec<f64>,
        qubits: Vec<RegBit>,
        #[serde(skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    Measure {
        qubit: RegBit,
        clbit: RegBit,
        #[serde(skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    Reset {
        qubit: RegBit,
        #[serde(skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
    Barrier {
        qubits: Vec<RegBit>,
    },
    Opaque {
        name: String,
        params: Vec<f64>,
        qubits: Vec<RegBit>,
        #[serde(skip_serializing_if = "Option::is_none")]
        condition: Option<Condition>,
    },
}

impl BackendCall {
    /// Whether the call is an elementary quantum operation rather than a
    /// declaration.
    pub fn is_operation(&self) -> bool {
        !matches!(
            self,
            BackendCall::DeclareQreg { .. }
                | BackendCall::DeclareCreg { .. }
                | BackendCall::DefineGate { .. }
        )
    }
}

/// Records calls in order. Accepts conditioned measure and reset and
/// opaque gate calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recorder {
    /// Version announced by the program, if the unroller reached it.
    pub version: Option<String>,
    pub calls: Vec<BackendCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded quantum operations, declarations left out.
    pub fn operations(&self) -> impl Iterator<Item = &BackendCall> {
        self.calls.iter().filter(|call| call.is_operation())
    }

    /// Serialize the recording as JSON.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    fn record(&mut self, call: BackendCall) -> UnrollResult<()> {
        self.calls.push(call);
        Ok(())
    }
}

impl UnrollerBackend for Recorder {
    fn version(&mut self, version: &str) -> UnrollResult<()> {
        self.version = Some(version.to_string());
        Ok(())
    }

    fn declare_qreg(&mut self, name: &str, size: usize) -> UnrollResult<()> {
        self.record(BackendCall::DeclareQreg {
            name: name.to_string(),
            size,
        })
    }

    fn declare_creg(&mut self, name: &str, size: usize) -> UnrollResult<()> {
        self.record(BackendCall::DeclareCreg {
            name: name.to_string(),
            size,
        })
    }

    fn define_gate(&mut self, gate: &GateData<'_>) -> UnrollResult<()> {
        self.record(BackendCall::DefineGate {
            name: gate.name.name.clone(),
            params: gate.params.names(),
            bits: gate.bits.names(),
            opaque: gate.is_opaque(),
        })
    }

    fn apply_unitary(&mut self, name: &str, params: &[f64], qubits: &[RegBit]) -> UnrollResult<()> {
        self.record(BackendCall::Unitary {
            name: name.to_string(),
            params: params.to_vec(),
            qubits: qubits.to_vec(),
            condition: None,
        })
    }

    fn apply_conditioned_unitary(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[RegBit],
        condition: &Condition,
    ) -> UnrollResult<()> {
        self.record(BackendCall::Unitary {
            name: name.to_string(),
            params: params.to_vec(),
            qubits: qubits.to_vec(),
            condition: Some(condition.clone()),
        })
    }

    fn measure(&mut self, qubit: &RegBit, clbit: &RegBit) -> UnrollResult<()> {
        self.record(BackendCall::Measure {
            qubit: qubit.clone(),
            clbit: clbit.clone(),
            condition: None,
        })
    }

    fn reset(&mut self, qubit: &RegBit) -> UnrollResult<()> {
        self.record(BackendCall::Reset {
            qubit: qubit.clone(),
            condition: None,
        })
    }

    fn barrier(&mut self, qubits: &[RegBit]) -> UnrollResult<()> {
        self.record(BackendCall::Barrier {
            qubits: qubits.to_vec(),
        })
    }

    fn measure_conditioned(
        &mut self,
        qubit: &RegBit,
        clbit: &RegBit,
        condition: &Condition,
    ) -> UnrollResult<()> {
        self.record(BackendCall::Measure {
            qubit: qubit.clone(),
            clbit: clbit.clone(),
            condition: Some(condition.clone()),
        })
    }

    fn reset_conditioned(&mut self, qubit: &RegBit, condition: &Condition) -> UnrollResult<()> {
        self.record(BackendCall::Reset {
            qubit: qubit.clone(),
            condition: Some(condition.clone()),
        })
    }

    fn opaque_gate(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: &[RegBit],
        condition: Option<&Condition>,
    ) -> UnrollResult<()> {
        self.record(BackendCall::Opaque {
            name: name.to_string(),
            params: params.to_vec(),
            qubits: qubits.to_vec(),
            condition: condition.cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_skip_declarations() {
        let mut recorder = Recorder::new();
        recorder.declare_qreg("q", 1).unwrap();
        recorder.reset(&RegBit::new("q", 0)).unwrap();
        assert_eq!(recorder.calls.len(), 2);
        assert_eq!(recorder.operations().count(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut recorder = Recorder::new();
        recorder.version("2.0").unwrap();
        recorder
            .apply_conditioned_unitary("x", &[], &[RegBit::new("q", 0)], &Condition::new("c", 1))
            .unwrap();
        recorder.barrier(&[RegBit::new("q", 0)]).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&recorder.to_json(false).unwrap()).unwrap();
        assert_eq!(json["version"], "2.0");
        assert_eq!(json["calls"][0]["op"], "unitary");
        assert_eq!(json["calls"][0]["qubits"][0]["name"], "q");
        assert_eq!(json["calls"][0]["condition"]["value"], 1);
        assert_eq!(json["calls"][1]["op"], "barrier");
        assert!(json["calls"][1].get("condition").is_none());
    }
}
