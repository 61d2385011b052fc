//! Gate dependency check.
//!
//! Runs over every gate declaration before anything reaches the backend, so
//! expansion never meets an undefined callee or recursion.

use petgraph::algo::{astar, has_path_connecting};
use petgraph::graph::{DiGraph, NodeIndex};
use qunroll_qasm2::ast::{Location, Statement};
use rustc_hash::FxHashMap;

use crate::config::Basis;
use crate::error::{UnrollError, UnrollResult};
use crate::symbols::{GateData, GateOrigin, GateTable};

/// Caller → callee edges between declared gates.
///
/// Calls to basis gates are leaves and have no edge, unless the program
/// declares a gate of that name itself.
#[derive(Debug, Default)]
pub struct GateGraph<'a> {
    graph: DiGraph<&'a str, ()>,
    index: FxHashMap<&'a str, NodeIndex>,
}

impl<'a> GateGraph<'a> {
    fn add_gate(&mut self, name: &'a str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name);
        self.index.insert(name, idx);
        idx
    }

    /// Add `caller → callee`, rejecting the edge if it closes a cycle.
    fn add_dependency(
        &mut self,
        caller: &'a str,
        callee: &'a str,
        loc: &Location,
    ) -> UnrollResult<()> {
        let from = self.add_gate(caller);
        let to = self.add_gate(callee);
        if self.graph.contains_edge(from, to) {
            return Ok(());
        }

        if has_path_connecting(&self.graph, to, from, None) {
            let path = astar(&self.graph, to, |n| n == from, |_| 1, |_| 0)
                .map(|(_, path)| path)
                .unwrap_or_default();
            let mut cycle = vec![caller.to_string()];
            cycle.extend(path.into_iter().map(|n| self.graph[n].to_string()));
            return Err(UnrollError::RecursiveGateDefinition {
                cycle,
                loc: loc.clone(),
            });
        }

        self.graph.add_edge(from, to, ());
        Ok(())
    }

    pub fn gate_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Check every gate declaration in `declarations`.
///
/// Fails with [`UnrollError::DuplicateGate`] on redeclaration,
/// [`UnrollError::UndefinedGate`] when a body calls a gate that is neither
/// in `basis` nor declared anywhere, and
/// [`UnrollError::RecursiveGateDefinition`] on any call cycle.
pub fn check_gate_dependencies<'a, I>(
    declarations: I,
    basis: &Basis,
) -> UnrollResult<GateGraph<'a>>
where
    I: IntoIterator<Item = (&'a Statement, GateOrigin)>,
{
    let mut table = GateTable::new();
    let mut bodies: FxHashMap<&'a str, &'a Statement> = FxHashMap::default();
    let mut graph = GateGraph::default();

    for (statement, origin) in declarations {
        let gate = match statement {
            Statement::GateDecl(decl) => GateData::from_decl(decl, origin),
            Statement::Opaque(decl) => GateData::from_opaque(decl, origin),
            _ => continue,
        };
        table.define(gate)?;
        let name = gate.name.name.as_str();
        bodies.insert(name, statement);
        graph.add_gate(name);
    }

    let names: Vec<&'a str> = graph.graph.node_weights().copied().collect();
    for caller in names {
        let Some(gate) = table.get(caller) else {
            continue;
        };
        let Some(&statement) = bodies.get(caller) else {
            continue;
        };
        for callee in statement.calls() {
            let declared = table.get(callee);
            let program_gate =
                matches!(declared, Some(gate) if gate.origin == GateOrigin::Program);
            if basis.contains(callee) && !program_gate {
                continue;
            }
            if declared.is_none() {
                return Err(UnrollError::UndefinedGate {
                    name: callee.to_string(),
                    loc: gate.loc().clone(),
                });
            }
            graph.add_dependency(caller, callee, gate.loc())?;
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qunroll_qasm2::parse;

    fn check(source: &str, basis: &Basis) -> UnrollResult<(usize, usize)> {
        let program = parse(source).unwrap();
        let graph = check_gate_dependencies(
            program.statements.iter().map(|s| (s, GateOrigin::Program)),
            basis,
        )?;
        Ok((graph.gate_count(), graph.dependency_count()))
    }

    #[test]
    fn test_nested_gates() {
        let source = "OPENQASM 2.0;\n\
                      gate inner a { U(0,0,0) a; }\n\
                      gate outer a,b { inner a; CX a,b; inner b; }\n\
                      gate top a,b { outer a,b; h a; }";
        let program = parse(source).unwrap();
        let graph = check_gate_dependencies(
            program.statements.iter().map(|s| (s, GateOrigin::Program)),
            &Basis::qelib1(),
        )
        .unwrap();
        assert_eq!(graph.gate_count(), 3);
        assert_eq!(graph.dependency_count(), 2);
    }

    #[test]
    fn test_self_recursion() {
        let err = check("OPENQASM 2.0;\ngate loop a { loop a; }", &Basis::builtins()).unwrap_err();
        match err {
            UnrollError::RecursiveGateDefinition { cycle, loc } => {
                assert_eq!(cycle, vec!["loop", "loop"]);
                assert_eq!(loc.line, 2);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_mutual_recursion() {
        let source = "OPENQASM 2.0;\n\
                      gate ping a { pong a; }\n\
                      gate pong a { ping a; }";
        let err = check(source, &Basis::builtins()).unwrap_err();
        match err {
            UnrollError::RecursiveGateDefinition { cycle, .. } => {
                assert_eq!(cycle, vec!["pong", "ping", "pong"]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_undefined_callee() {
        let err = check("OPENQASM 2.0;\ngate g a { frob a; }", &Basis::builtins()).unwrap_err();
        assert!(matches!(err, UnrollError::UndefinedGate { ref name, .. } if name == "frob"));
    }

    #[test]
    fn test_basis_call_is_a_leaf() {
        let source = "OPENQASM 2.0;\ngate bell a,b { h a; cx a,b; }";
        assert_eq!(check(source, &Basis::qelib1()).unwrap(), (1, 0));
        assert!(matches!(
            check(source, &Basis::builtins()),
            Err(UnrollError::UndefinedGate { ref name, .. }) if name == "h"
        ));
    }

    #[test]
    fn test_program_gate_shadows_basis_name() {
        let source = "OPENQASM 2.0;\ngate h a { h a; }";
        for basis in [Basis::qelib1(), Basis::builtins()] {
            assert!(matches!(
                check(source, &basis),
                Err(UnrollError::RecursiveGateDefinition { .. })
            ));
        }

        let source = "OPENQASM 2.0;\ngate inner a { U(0,0,0) a; }\ngate h a { inner a; }\ngate g a { h a; }";
        assert_eq!(check(source, &Basis::qelib1()).unwrap(), (3, 2));
    }

    #[test]
    fn test_duplicate_declaration() {
        let source = "OPENQASM 2.0;\ngate g a { }\nopaque g a;";
        assert!(matches!(
            check(source, &Basis::builtins()),
            Err(UnrollError::DuplicateGate { .. })
        ));
    }

    #[test]
    fn test_forward_reference() {
        let source = "OPENQASM 2.0;\ngate first a { second a; }\ngate second a { }";
        assert_eq!(check(source, &Basis::builtins()).unwrap(), (2, 1));
    }
}
