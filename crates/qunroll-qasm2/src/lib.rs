//! `OpenQASM` 2.0 front end for qunroll.
//!
//! This crate provides:
//!
//! - A closed syntax tree ([`ast`]) whose statements are assembled and
//!   validated through [`Statement::assemble`](ast::Statement::assemble)
//! - Canonical serialization of every node back to `OpenQASM` text
//! - A parser producing [`Program`](ast::Program) values
//!
//! # Example
//!
//! ```rust
//! use qunroll_qasm2::parse;
//!
//! let source = r#"
//! OPENQASM 2.0;
//! include "qelib1.inc";
//! qreg q[2];
//! creg c[2];
//! h q[0];
//! cx q[0],q[1];
//! measure q -> c;
//! "#;
//!
//! let program = parse(source).unwrap();
//! assert_eq!(program.statements.len(), 5);
//! assert_eq!(program.statements[3].qasm(), "cx q[0],q[1];");
//! ```
//!
//! # Canonical form
//!
//! Serialization is a pure function of the tree. Parsing the text
//! returned by [`Program::qasm`](ast::Program::qasm) yields a program
//! with the same statements, so `qasm()` can be used as a formatter.

pub mod ast;
mod error;
mod lexer;
mod parser;

pub use error::{AstError, AstResult, ParseError, ParseResult};
pub use parser::{parse, parse_include, parse_with_file};
