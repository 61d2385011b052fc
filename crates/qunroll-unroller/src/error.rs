//! Error types for the unroller.

use qunroll_qasm2::ast::{Location, RegisterKind};
use qunroll_qasm2::ParseError;
use thiserror::Error;

/// Boxed error raised by a backend implementation.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort an unrolling pass.
///
/// Every variant raised while walking the program carries the [`Location`]
/// of the offending identifier.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UnrollError {
    /// A register name is declared twice, in either namespace.
    #[error("Duplicate register '{name}' at {loc}")]
    DuplicateRegister { name: String, loc: Location },

    /// A gate name is declared twice.
    #[error("Duplicate gate '{name}' at {loc}")]
    DuplicateGate { name: String, loc: Location },

    /// A bare or indexed identifier names no register and no bound bit.
    #[error("Undefined register '{name}' at {loc}")]
    UndefinedRegister { name: String, loc: Location },

    /// An expression names a parameter that is not bound in the current frame.
    #[error("Undefined parameter '{name}' at {loc}")]
    UndefinedParameter { name: String, loc: Location },

    /// A called gate is neither in the basis nor declared.
    #[error("Undefined gate '{name}' at {loc}")]
    UndefinedGate { name: String, loc: Location },

    /// A gate call does not match the gate's signature.
    #[error(
        "Gate '{gate}' takes {expected_params} parameters and {expected_bits} qubits, \
         got {got_params} and {got_bits} at {loc}"
    )]
    ArityMismatch {
        gate: String,
        expected_params: usize,
        expected_bits: usize,
        got_params: usize,
        got_bits: usize,
        loc: Location,
    },

    /// Register operands of one call have different sizes.
    #[error("Register operands of '{gate}' have mismatched sizes {sizes:?} at {loc}")]
    RegisterSizeMismatch {
        gate: String,
        sizes: Vec<usize>,
        loc: Location,
    },

    /// A gate body calls itself, directly or through other gates.
    #[error("Recursive gate definition: {} at {loc}", .cycle.join(" -> "))]
    RecursiveGateDefinition { cycle: Vec<String>, loc: Location },

    /// An opaque gate reached a backend that cannot execute it.
    #[error("Opaque gate '{name}' cannot be unrolled")]
    OpaqueNotUnrollable { name: String },

    /// An index addresses past the end of its register.
    #[error("Index {index} out of bounds for register '{name}' of size {size} at {loc}")]
    IndexOutOfBounds {
        name: String,
        index: usize,
        size: usize,
        loc: Location,
    },

    /// A register is declared with size zero.
    #[error("Register '{name}' must have a positive size at {loc}")]
    InvalidRegisterSize { name: String, loc: Location },

    /// A quantum register is used where a classical one is required, or the reverse.
    #[error("Register '{name}' is not a {} register at {loc}", .expected.keyword())]
    WrongRegisterKind {
        name: String,
        expected: RegisterKind,
        loc: Location,
    },

    /// The backend has no conditioned variant of an operation.
    #[error("Backend does not support conditioned {operation}")]
    ConditionalNotSupported { operation: String },

    /// An included gate library failed to parse.
    #[error("Failed to parse include '{file}': {source}")]
    Include {
        file: String,
        #[source]
        source: ParseError,
    },

    /// Error raised by the backend, passed through unchanged.
    #[error(transparent)]
    Backend(BackendError),

    /// Invalid unroller configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl UnrollError {
    /// Wrap an arbitrary backend failure.
    pub fn backend(err: impl Into<BackendError>) -> Self {
        UnrollError::Backend(err.into())
    }
}

/// Errors loading or validating an [`UnrollerConfig`](crate::UnrollerConfig).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// A basis names a gate whose signature is unknown.
    #[error("Unknown basis gate '{0}'")]
    UnknownBasisGate(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Result type for unrolling.
pub type UnrollResult<T> = Result<T, UnrollError>;
