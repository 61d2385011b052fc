//! Unroller configuration.
//!
//! The basis decides which gate calls reach the backend as elementary
//! operations. Everything else is expanded through its declaration.
//!
//! ```yaml
//! basis:
//!   u3: { params: 3, qubits: 1 }
//!   cx: { params: 0, qubits: 2 }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Signature of a basis gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasisGate {
    pub params: usize,
    pub qubits: usize,
}

impl BasisGate {
    pub const fn new(params: usize, qubits: usize) -> Self {
        Self { params, qubits }
    }
}

/// Built-in `U(theta,phi,lambda)`.
pub const BUILTIN_U: (&str, BasisGate) = ("U", BasisGate::new(3, 1));
/// Built-in `CX`.
pub const BUILTIN_CX: (&str, BasisGate) = ("CX", BasisGate::new(0, 2));

/// Signatures of the `qelib1.inc` gates.
pub const QELIB1_GATES: &[(&str, BasisGate)] = &[
    ("u3", BasisGate::new(3, 1)),
    ("u2", BasisGate::new(2, 1)),
    ("u1", BasisGate::new(1, 1)),
    ("cx", BasisGate::new(0, 2)),
    ("id", BasisGate::new(0, 1)),
    ("u0", BasisGate::new(1, 1)),
    ("u", BasisGate::new(3, 1)),
    ("p", BasisGate::new(1, 1)),
    ("x", BasisGate::new(0, 1)),
    ("y", BasisGate::new(0, 1)),
    ("z", BasisGate::new(0, 1)),
    ("h", BasisGate::new(0, 1)),
    ("s", BasisGate::new(0, 1)),
    ("sdg", BasisGate::new(0, 1)),
    ("t", BasisGate::new(0, 1)),
    ("tdg", BasisGate::new(0, 1)),
    ("sx", BasisGate::new(0, 1)),
    ("sxdg", BasisGate::new(0, 1)),
    ("rx", BasisGate::new(1, 1)),
    ("ry", BasisGate::new(1, 1)),
    ("rz", BasisGate::new(1, 1)),
    ("cz", BasisGate::new(0, 2)),
    ("cy", BasisGate::new(0, 2)),
    ("ch", BasisGate::new(0, 2)),
    ("swap", BasisGate::new(0, 2)),
    ("ccx", BasisGate::new(0, 3)),
    ("cswap", BasisGate::new(0, 3)),
    ("crx", BasisGate::new(1, 2)),
    ("cry", BasisGate::new(1, 2)),
    ("crz", BasisGate::new(1, 2)),
    ("cu1", BasisGate::new(1, 2)),
    ("cp", BasisGate::new(1, 2)),
    ("cu3", BasisGate::new(3, 2)),
    ("csx", BasisGate::new(0, 2)),
    ("rxx", BasisGate::new(1, 2)),
    ("rzz", BasisGate::new(1, 2)),
];

/// Gates emitted natively, by name.
///
/// A basis always contains the built-ins `U` and `CX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Basis {
    gates: BTreeMap<String, BasisGate>,
}

impl Basis {
    /// Only `U` and `CX`: every other gate is expanded.
    pub fn builtins() -> Self {
        let gates = [BUILTIN_U, BUILTIN_CX]
            .into_iter()
            .map(|(name, gate)| (name.to_string(), gate))
            .collect();
        Self { gates }
    }

    /// The built-ins plus every `qelib1.inc` gate.
    pub fn qelib1() -> Self {
        let mut basis = Self::builtins();
        for &(name, gate) in QELIB1_GATES {
            basis.insert(name, gate);
        }
        basis
    }

    /// The built-ins plus the named `qelib1.inc` gates.
    pub fn restricted<I, S>(names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut basis = Self::builtins();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || basis.contains(name) {
                continue;
            }
            let (_, gate) = QELIB1_GATES
                .iter()
                .find(|(known, _)| *known == name)
                .ok_or_else(|| ConfigError::UnknownBasisGate(name.to_string()))?;
            basis.insert(name, *gate);
        }
        Ok(basis)
    }

    pub fn insert(&mut self, name: impl Into<String>, gate: BasisGate) {
        self.gates.insert(name.into(), gate);
    }

    pub fn get(&self, name: &str) -> Option<BasisGate> {
        self.gates.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.gates.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.gates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    fn ensure_builtins(&mut self) {
        for (name, gate) in [BUILTIN_U, BUILTIN_CX] {
            self.gates.entry(name.to_string()).or_insert(gate);
        }
    }
}

impl Default for Basis {
    fn default() -> Self {
        Self::qelib1()
    }
}

/// Unroller configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnrollerConfig {
    pub basis: Basis,
}

impl UnrollerConfig {
    pub fn with_basis(basis: Basis) -> Self {
        Self { basis }
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let mut config: UnrollerConfig =
            serde_yaml_ng::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.basis.ensure_builtins();
        config.validate()?;
        Ok(config)
    }

    /// Check that built-in signatures were not overridden.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, expected) in [BUILTIN_U, BUILTIN_CX] {
            match self.basis.get(name) {
                Some(gate) if gate == expected => {}
                Some(gate) => {
                    return Err(ConfigError::ValidationError(format!(
                        "built-in '{name}' must take {} parameters and {} qubits, not {} and {}",
                        expected.params, expected.qubits, gate.params, gate.qubits
                    )));
                }
                None => {
                    return Err(ConfigError::ValidationError(format!(
                        "basis is missing built-in '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_basis() {
        let config = UnrollerConfig::default();
        assert!(config.basis.contains("U"));
        assert!(config.basis.contains("CX"));
        assert_eq!(config.basis.get("cu3"), Some(BasisGate::new(3, 2)));
        assert_eq!(config.basis.len(), QELIB1_GATES.len() + 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_restricted_basis() {
        let basis = Basis::restricted(["u3", " cx", ""]).unwrap();
        let names: Vec<&str> = basis.names().collect();
        assert_eq!(names, vec!["CX", "U", "cx", "u3"]);

        let err = Basis::restricted(["frobnicate"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownBasisGate(ref g) if g == "frobnicate"));
    }

    #[test]
    fn test_yaml_adds_builtins() {
        let config = UnrollerConfig::from_yaml("basis:\n  rz: { params: 1, qubits: 1 }\n").unwrap();
        assert_eq!(config.basis.len(), 3);
        assert_eq!(config.basis.get("rz"), Some(BasisGate::new(1, 1)));
        assert_eq!(config.basis.get("U"), Some(BUILTIN_U.1));
    }

    #[test]
    fn test_yaml_rejects_bad_builtin() {
        let err = UnrollerConfig::from_yaml("basis:\n  CX: { params: 1, qubits: 2 }\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = UnrollerConfig::with_basis(Basis::restricted(["h"]).unwrap());
        let text = config.to_yaml().unwrap();
        assert_eq!(UnrollerConfig::from_yaml(&text).unwrap(), config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "basis:\n  h: {{ params: 0, qubits: 1 }}").unwrap();
        let config = UnrollerConfig::from_file(file.path()).unwrap();
        assert!(config.basis.contains("h"));

        let err = UnrollerConfig::from_file("/nonexistent/qunroll.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
