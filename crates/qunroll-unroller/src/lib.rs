//! OpenQASM 2.0 unroller.
//!
//! Interprets a parsed [`Program`](qunroll_qasm2::ast::Program) and expands
//! every gate call down to a configurable basis, handing each elementary
//! operation to an [`UnrollerBackend`].
//!
//! # Example
//!
//! ```
//! use qunroll_qasm2::parse;
//! use qunroll_unroller::backends::QasmPrinter;
//! use qunroll_unroller::{Basis, Unroller, UnrollerConfig};
//!
//! let source = r#"
//! OPENQASM 2.0;
//! include "qelib1.inc";
//! qreg q[2];
//! cz q[0],q[1];
//! "#;
//! let program = parse(source).unwrap();
//!
//! // Only the built-ins: cz expands through h and cx down to U and CX.
//! let config = UnrollerConfig::with_basis(Basis::builtins());
//! let mut printer = QasmPrinter::new();
//! Unroller::new(config).execute(&program, &mut printer).unwrap();
//!
//! assert!(printer.as_str().contains("CX q[0],q[1];"));
//! assert!(!printer.as_str().contains("cz"));
//! ```
//!
//! # Modules
//!
//! - [`unroller`]: the interpreter
//! - [`backend`]: the backend capability interface
//! - [`backends`]: recording and printing backends
//! - [`config`]: basis and configuration file handling

pub mod backend;
pub mod backends;
pub mod broadcast;
pub mod config;
pub mod deps;
pub mod error;
pub mod regbit;
pub mod scope;
pub mod stdlib;
pub mod symbols;
pub mod unroller;

pub use backend::{Condition, UnrollerBackend};
pub use config::{Basis, BasisGate, UnrollerConfig};
pub use error::{BackendError, ConfigError, UnrollError, UnrollResult};
pub use regbit::RegBit;
pub use symbols::{GateData, GateOrigin};
pub use unroller::{UnrollStats, Unroller, unroll};
