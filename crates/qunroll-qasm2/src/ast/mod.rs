//! Abstract Syntax Tree for `OpenQASM` 2.0.
//!
//! Every node renders itself back to canonical `OpenQASM` text through
//! `qasm()`. Rendering is a pure function of node content, so two trees
//! produce the same text exactly when they hold the same program.

mod expression;
mod node;
mod statement;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use expression::{BinOp, Expression, UnaryFn};
pub use node::{Keyword, Node, NodeType};
pub use statement::{
    CustomUnitary, GateDecl, GateHeader, GateOp, GopList, IfStatement, OpaqueDecl, Qop,
    RegisterDecl, RegisterKind, Statement, Uop,
};

/// Source position of a node, used for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File the node was read from (empty for in-memory sources).
    pub file: String,
    /// 1-based line number.
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "line {}", self.line)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}

/// A bare identifier: a register, a formal bit or a formal parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub loc: Location,
}

impl Identifier {
    /// Create an identifier with no source position.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loc: Location::default(),
        }
    }

    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        self.loc = loc;
        self
    }

    pub fn qasm(&self) -> String {
        self.name.clone()
    }
}

/// An identifier with a constant index: `q[3]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedIdentifier {
    pub name: String,
    pub index: usize,
    pub loc: Location,
}

impl IndexedIdentifier {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            loc: Location::default(),
        }
    }

    #[must_use]
    pub fn at(mut self, loc: Location) -> Self {
        self.loc = loc;
        self
    }

    pub fn qasm(&self) -> String {
        format!("{}[{}]", self.name, self.index)
    }
}

/// A gate or measurement operand: whole register (or formal bit) or one bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Id(Identifier),
    Indexed(IndexedIdentifier),
}

impl Argument {
    /// Reference to a whole register or to a formal bit.
    pub fn id(name: impl Into<String>) -> Self {
        Argument::Id(Identifier::new(name))
    }

    /// Reference to a single bit of a register.
    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Argument::Indexed(IndexedIdentifier::new(name, index))
    }

    #[allow(clippy::match_same_arms)]
    pub fn name(&self) -> &str {
        match self {
            Argument::Id(id) => &id.name,
            Argument::Indexed(id) => &id.name,
        }
    }

    #[allow(clippy::match_same_arms)]
    pub fn loc(&self) -> &Location {
        match self {
            Argument::Id(id) => &id.loc,
            Argument::Indexed(id) => &id.loc,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Argument::Id(_) => NodeType::Id,
            Argument::Indexed(_) => NodeType::IndexedId,
        }
    }

    pub fn qasm(&self) -> String {
        match self {
            Argument::Id(id) => id.qasm(),
            Argument::Indexed(id) => id.qasm(),
        }
    }
}

/// Comma separated list of bare identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdList {
    pub ids: Vec<Identifier>,
}

impl IdList {
    pub fn new(ids: Vec<Identifier>) -> Self {
        Self { ids }
    }

    /// Build a list of location-less identifiers from names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: names.into_iter().map(Identifier::new).collect(),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Identifier> {
        self.ids.iter()
    }

    pub fn qasm(&self) -> String {
        join_qasm(&self.ids, Identifier::qasm)
    }
}

/// A complete `OpenQASM` program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Language version, e.g. `"2.0"`.
    pub version: String,
    /// Included files in source order.
    pub includes: Vec<String>,
    pub statements: Vec<Statement>,
}

impl Program {
    /// Empty `OPENQASM 2.0` program including the standard gate library.
    pub fn new() -> Self {
        Self {
            version: "2.0".into(),
            includes: vec!["qelib1.inc".into()],
            statements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn qasm(&self) -> String {
        let mut lines = Vec::with_capacity(self.statements.len() + 1 + self.includes.len());
        lines.push(format!("OPENQASM {};", self.version));
        for include in &self.includes {
            lines.push(format!("include \"{include}\";"));
        }
        for statement in &self.statements {
            lines.push(statement.qasm());
        }
        lines.join("\n")
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a sequence of nodes separated by commas.
pub(crate) fn join_qasm<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    items.iter().map(render).collect::<Vec<_>>().join(",")
}
