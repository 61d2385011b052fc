//! The polymorphic node view over the syntax tree.

use serde::{Deserialize, Serialize};

use super::{
    Argument, Expression, GateHeader, GopList, IdList, Identifier, IndexedIdentifier, Program,
    Qop, RegisterDecl, Statement, join_qasm,
};

/// Type tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Program,
    Statement,
    Decl,
    GateDecl,
    Opaque,
    Qop,
    UniversalUnitary,
    Cnot,
    CustomUnitary,
    Measure,
    Reset,
    If,
    Barrier,
    Id,
    IndexedId,
    IdList,
    PrimaryList,
    GopList,
    Expression,
    ExpressionList,
    Integer,
    Keyword,
}

/// Keywords that head a statement whose content arrives as auxiliary operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Opaque,
    If,
    Barrier,
}

impl Keyword {
    pub fn text(self) -> &'static str {
        match self {
            Keyword::Opaque => "opaque",
            Keyword::If => "if",
            Keyword::Barrier => "barrier",
        }
    }

    /// Type of the statement this keyword heads.
    pub fn statement_type(self) -> NodeType {
        match self {
            Keyword::Opaque => NodeType::Opaque,
            Keyword::If => NodeType::If,
            Keyword::Barrier => NodeType::Barrier,
        }
    }
}

/// Any node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Program(Program),
    Statement(Statement),
    Decl(RegisterDecl),
    GateHeader(GateHeader),
    Qop(Qop),
    Keyword(Keyword),
    Id(Identifier),
    IndexedId(IndexedIdentifier),
    IdList(IdList),
    PrimaryList(Vec<Argument>),
    GopList(GopList),
    Expression(Expression),
    ExpressionList(Vec<Expression>),
    Integer(u64),
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Program(_) => NodeType::Program,
            Node::Statement(_) => NodeType::Statement,
            Node::Decl(_) => NodeType::Decl,
            Node::GateHeader(_) => NodeType::GateDecl,
            Node::Qop(_) => NodeType::Qop,
            Node::Keyword(_) => NodeType::Keyword,
            Node::Id(_) => NodeType::Id,
            Node::IndexedId(_) => NodeType::IndexedId,
            Node::IdList(_) => NodeType::IdList,
            Node::PrimaryList(_) => NodeType::PrimaryList,
            Node::GopList(_) => NodeType::GopList,
            Node::Expression(_) => NodeType::Expression,
            Node::ExpressionList(_) => NodeType::ExpressionList,
            Node::Integer(_) => NodeType::Integer,
        }
    }

    pub fn qasm(&self) -> String {
        match self {
            Node::Program(program) => program.qasm(),
            Node::Statement(statement) => statement.qasm(),
            Node::Decl(decl) => decl.qasm(),
            Node::GateHeader(header) => header.qasm(),
            Node::Qop(qop) => qop.qasm(),
            Node::Keyword(keyword) => keyword.text().to_string(),
            Node::Id(id) => id.qasm(),
            Node::IndexedId(id) => id.qasm(),
            Node::IdList(ids) => ids.qasm(),
            Node::PrimaryList(args) => join_qasm(args, Argument::qasm),
            Node::GopList(body) => body.qasm(),
            Node::Expression(expr) => expr.qasm(),
            Node::ExpressionList(exprs) => join_qasm(exprs, Expression::qasm),
            Node::Integer(value) => value.to_string(),
        }
    }
}

impl From<Statement> for Node {
    fn from(statement: Statement) -> Self {
        Node::Statement(statement)
    }
}

impl From<Program> for Node {
    fn from(program: Program) -> Self {
        Node::Program(program)
    }
}
