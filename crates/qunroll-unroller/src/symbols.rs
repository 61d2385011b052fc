//! Register and gate symbol tables.

use qunroll_qasm2::ast::{
    GateDecl, GopList, IdList, Identifier, Location, OpaqueDecl, RegisterDecl, RegisterKind,
};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{UnrollError, UnrollResult};

/// Declared registers, quantum and classical kept apart.
///
/// Both namespaces share one identifier space: a name may be declared in
/// at most one of them.
#[derive(Debug, Default)]
pub struct RegisterTable {
    quantum: FxHashMap<String, usize>,
    classical: FxHashMap<String, usize>,
}

impl RegisterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration.
    pub fn declare(&mut self, decl: &RegisterDecl) -> UnrollResult<()> {
        let name = &decl.name.name;
        if decl.size == 0 {
            return Err(UnrollError::InvalidRegisterSize {
                name: name.clone(),
                loc: decl.name.loc.clone(),
            });
        }
        if self.lookup(name).is_some() {
            return Err(UnrollError::DuplicateRegister {
                name: name.clone(),
                loc: decl.name.loc.clone(),
            });
        }

        let table = match decl.kind {
            RegisterKind::Quantum => &mut self.quantum,
            RegisterKind::Classical => &mut self.classical,
        };
        table.insert(name.clone(), decl.size);
        Ok(())
    }

    /// Kind and size of a register.
    pub fn lookup(&self, name: &str) -> Option<(RegisterKind, usize)> {
        if let Some(&size) = self.quantum.get(name) {
            return Some((RegisterKind::Quantum, size));
        }
        self.classical
            .get(name)
            .map(|&size| (RegisterKind::Classical, size))
    }

    /// Size of a register that must be of `kind`.
    pub fn require(&self, name: &str, loc: &Location, kind: RegisterKind) -> UnrollResult<usize> {
        match self.lookup(name) {
            Some((found, size)) if found == kind => Ok(size),
            Some(_) => Err(UnrollError::WrongRegisterKind {
                name: name.to_string(),
                expected: kind,
                loc: loc.clone(),
            }),
            None => Err(UnrollError::UndefinedRegister {
                name: name.to_string(),
                loc: loc.clone(),
            }),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.quantum.values().sum()
    }

    pub fn num_clbits(&self) -> usize {
        self.classical.values().sum()
    }
}

/// Where a gate declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOrigin {
    /// Declared by the program being unrolled.
    Program,
    /// Declared by an included gate library.
    Library,
}

/// Signature and body of a declared gate, borrowed from the syntax tree.
#[derive(Debug, Clone, Copy)]
pub struct GateData<'a> {
    pub name: &'a Identifier,
    /// Formal parameter names, in declaration order.
    pub params: &'a IdList,
    /// Formal bit names, in declaration order.
    pub bits: &'a IdList,
    /// `None` for opaque gates.
    pub body: Option<&'a GopList>,
    pub origin: GateOrigin,
}

impl<'a> GateData<'a> {
    pub fn from_decl(decl: &'a GateDecl, origin: GateOrigin) -> Self {
        Self {
            name: &decl.name,
            params: &decl.params,
            bits: &decl.qubits,
            body: Some(&decl.body),
            origin,
        }
    }

    pub fn from_opaque(decl: &'a OpaqueDecl, origin: GateOrigin) -> Self {
        Self {
            name: &decl.name,
            params: &decl.params,
            bits: &decl.qubits,
            body: None,
            origin,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.body.is_none()
    }

    pub fn loc(&self) -> &'a Location {
        &self.name.loc
    }
}

/// Declared gates by name.
#[derive(Debug, Default)]
pub struct GateTable<'a> {
    gates: FxHashMap<&'a str, GateData<'a>>,
}

impl<'a> GateTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a gate.
    ///
    /// A program declaration replaces a library gate of the same name; any
    /// other redeclaration is a [`UnrollError::DuplicateGate`].
    pub fn define(&mut self, gate: GateData<'a>) -> UnrollResult<()> {
        let name = gate.name.name.as_str();
        if let Some(existing) = self.gates.get(name) {
            if existing.origin == GateOrigin::Library && gate.origin == GateOrigin::Program {
                debug!("Program gate '{}' replaces library declaration", name);
            } else {
                return Err(UnrollError::DuplicateGate {
                    name: name.to_string(),
                    loc: gate.loc().clone(),
                });
            }
        }
        self.gates.insert(name, gate);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<GateData<'a>> {
        self.gates.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qunroll_qasm2::ast::GateHeader;

    fn gate(name: &str) -> GateDecl {
        GateDecl::new(
            GateHeader {
                name: Identifier::new(name),
                params: IdList::default(),
                qubits: IdList::from_names(["a"]),
            },
            GopList::default(),
        )
    }

    #[test]
    fn test_register_namespaces_are_shared() {
        let mut table = RegisterTable::new();
        table
            .declare(&RegisterDecl::quantum(Identifier::new("q"), 3))
            .unwrap();
        let err = table
            .declare(&RegisterDecl::classical(Identifier::new("q"), 3))
            .unwrap_err();
        assert!(matches!(err, UnrollError::DuplicateRegister { ref name, .. } if name == "q"));
        assert_eq!(table.num_qubits(), 3);
        assert_eq!(table.num_clbits(), 0);
    }

    #[test]
    fn test_zero_size_register_rejected() {
        let mut table = RegisterTable::new();
        let err = table
            .declare(&RegisterDecl::classical(Identifier::new("c"), 0))
            .unwrap_err();
        assert!(matches!(err, UnrollError::InvalidRegisterSize { .. }));
        assert!(table.lookup("c").is_none());
    }

    #[test]
    fn test_require_checks_kind() {
        let mut table = RegisterTable::new();
        table
            .declare(&RegisterDecl::classical(Identifier::new("c"), 2))
            .unwrap();

        let loc = Location::new("t.qasm", 4);
        assert_eq!(table.require("c", &loc, RegisterKind::Classical).unwrap(), 2);
        assert!(matches!(
            table.require("c", &loc, RegisterKind::Quantum),
            Err(UnrollError::WrongRegisterKind { .. })
        ));
        assert!(matches!(
            table.require("d", &loc, RegisterKind::Quantum),
            Err(UnrollError::UndefinedRegister { .. })
        ));
    }

    #[test]
    fn test_program_gate_replaces_library_gate() {
        let library = gate("h");
        let program = gate("h");
        let mut gates = GateTable::new();
        gates
            .define(GateData::from_decl(&library, GateOrigin::Library))
            .unwrap();
        gates
            .define(GateData::from_decl(&program, GateOrigin::Program))
            .unwrap();
        assert_eq!(gates.get("h").unwrap().origin, GateOrigin::Program);

        let err = gates
            .define(GateData::from_decl(&program, GateOrigin::Program))
            .unwrap_err();
        assert!(matches!(err, UnrollError::DuplicateGate { .. }));
    }

    #[test]
    fn test_opaque_gate_has_no_body() {
        let decl = OpaqueDecl {
            name: Identifier::new("magic"),
            params: IdList::default(),
            qubits: IdList::from_names(["a", "b"]),
        };
        let data = GateData::from_opaque(&decl, GateOrigin::Program);
        assert!(data.is_opaque());
        assert_eq!(data.bits.len(), 2);
    }
}
