//! Bundled gate libraries for `include` directives.

use qunroll_qasm2::ast::Statement;
use qunroll_qasm2::parse_include;
use tracing::warn;

use crate::error::{UnrollError, UnrollResult};

/// File name of the standard gate library.
pub const QELIB1: &str = "qelib1.inc";

/// Source of the standard gate library.
pub const QELIB1_SOURCE: &str = include_str!("qelib1.inc");

/// Statements of every bundled library named by `includes`, in include order.
///
/// Includes with no bundled library are skipped.
pub fn load_includes(includes: &[String]) -> UnrollResult<Vec<Statement>> {
    let mut statements = Vec::new();
    for file in includes {
        if file == QELIB1 {
            let library = parse_include(QELIB1_SOURCE, QELIB1).map_err(|source| {
                UnrollError::Include {
                    file: file.clone(),
                    source,
                }
            })?;
            statements.extend(library);
        } else {
            warn!("No bundled library for include \"{}\", skipping", file);
        }
    }
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QELIB1_GATES;

    fn declared_gates() -> Vec<(String, usize, usize)> {
        load_includes(&[QELIB1.to_string()])
            .unwrap()
            .iter()
            .filter_map(|stmt| match stmt {
                Statement::GateDecl(decl) => Some((
                    decl.name.name.clone(),
                    decl.params.len(),
                    decl.qubits.len(),
                )),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_library_matches_basis_signatures() {
        let declared = declared_gates();
        assert_eq!(declared.len(), QELIB1_GATES.len());
        for (name, gate) in QELIB1_GATES {
            let found = declared
                .iter()
                .find(|(n, _, _)| n == name)
                .unwrap_or_else(|| panic!("{name} missing from library"));
            assert_eq!((found.1, found.2), (gate.params, gate.qubits), "{name}");
        }
    }

    #[test]
    fn test_library_locations_name_the_file() {
        let statements = load_includes(&[QELIB1.to_string()]).unwrap();
        let Statement::GateDecl(first) = &statements[0] else {
            panic!("expected gate declaration");
        };
        assert_eq!(first.name.name, "u3");
        assert!(first.name.loc.to_string().starts_with("qelib1.inc:"));
    }

    #[test]
    fn test_unknown_include_is_skipped() {
        let statements = load_includes(&["mylib.inc".to_string()]).unwrap();
        assert!(statements.is_empty());
    }
}
