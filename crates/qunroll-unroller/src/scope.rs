//! Binding frames for gate expansion.

use rustc_hash::FxHashMap;

use crate::regbit::RegBit;
use crate::symbols::GateData;

/// Bindings visible while interpreting one gate body.
///
/// Each expansion owns its frame and hands it down by reference, so a
/// frame lives exactly as long as the body it guards. The global frame is
/// empty.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    params: FxHashMap<String, f64>,
    bits: FxHashMap<String, RegBit>,
}

impl Frame {
    /// The top-level frame, with nothing bound.
    pub fn global() -> Self {
        Self::default()
    }

    /// Bind a gate's formals to actual values, in declaration order.
    ///
    /// The caller has already checked arity.
    pub fn bind(gate: &GateData<'_>, params: &[f64], bits: &[RegBit]) -> Self {
        Self {
            params: gate
                .params
                .iter()
                .map(|id| id.name.clone())
                .zip(params.iter().copied())
                .collect(),
            bits: gate
                .bits
                .iter()
                .map(|id| id.name.clone())
                .zip(bits.iter().cloned())
                .collect(),
        }
    }

    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }

    pub fn bit(&self, name: &str) -> Option<&RegBit> {
        self.bits.get(name)
    }
}
