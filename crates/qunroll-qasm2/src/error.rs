//! Error types for the QASM2 front end.

use thiserror::Error;

use crate::ast::NodeType;

/// Structural defects in an AST.
///
/// A conforming parser never produces these; they signal that a statement
/// was assembled from operands that do not fit its primary operand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AstError {
    /// The auxiliary operands of a statement do not match its primary operand.
    #[error("Malformed {op:?} statement: operands {found}")]
    MalformedStatement { op: NodeType, found: String },

    /// A node that cannot head a statement was used as one.
    #[error("{0:?} node cannot be the primary operand of a statement")]
    InvalidPrimary(NodeType),
}

/// Result type for AST construction.
pub type AstResult<T> = Result<T, AstError>;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Integer literal does not fit the target type.
    #[error("Integer literal {value} out of range at line {line}")]
    IntegerOverflow { line: usize, value: u64 },

    /// Real literal too large to represent.
    #[error("Real literal out of range at line {line}")]
    RealOverflow { line: usize },

    /// Statement assembly failed.
    #[error(transparent)]
    Ast(#[from] AstError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
