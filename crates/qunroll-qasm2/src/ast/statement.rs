//! Statements and quantum operations.

use serde::{Deserialize, Serialize};

use super::node::{Keyword, Node, NodeType};
use super::{Argument, Expression, IdList, Identifier, join_qasm};
use crate::error::{AstError, AstResult};

/// Kind of a register declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterKind {
    Quantum,
    Classical,
}

impl RegisterKind {
    pub fn keyword(self) -> &'static str {
        match self {
            RegisterKind::Quantum => "qreg",
            RegisterKind::Classical => "creg",
        }
    }
}

/// Register declaration: `qreg q[3];` / `creg c[3];`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterDecl {
    pub kind: RegisterKind,
    pub name: Identifier,
    pub size: usize,
}

impl RegisterDecl {
    pub fn quantum(name: Identifier, size: usize) -> Self {
        Self {
            kind: RegisterKind::Quantum,
            name,
            size,
        }
    }

    pub fn classical(name: Identifier, size: usize) -> Self {
        Self {
            kind: RegisterKind::Classical,
            name,
            size,
        }
    }

    pub fn qasm(&self) -> String {
        format!("{} {}[{}];", self.kind.keyword(), self.name.qasm(), self.size)
    }
}

/// Call of a user-declared (or basis) gate: `name(params) args;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomUnitary {
    pub name: Identifier,
    pub params: Vec<Expression>,
    pub args: Vec<Argument>,
}

impl CustomUnitary {
    pub fn new(name: impl Into<String>, params: Vec<Expression>, args: Vec<Argument>) -> Self {
        Self {
            name: Identifier::new(name),
            params,
            args,
        }
    }

    pub fn qasm(&self) -> String {
        let args = join_qasm(&self.args, Argument::qasm);
        if self.params.is_empty() {
            format!("{} {args};", self.name.qasm())
        } else {
            let params = join_qasm(&self.params, Expression::qasm);
            format!("{}({params}) {args};", self.name.qasm())
        }
    }
}

/// Unitary operation, usable both at top level and inside gate bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Uop {
    /// Built-in single-qubit unitary `U(theta,phi,lambda) q;`
    U {
        params: Vec<Expression>,
        target: Argument,
    },
    /// Built-in `CX a,b;`
    Cx { control: Argument, target: Argument },
    /// Any other gate call.
    Custom(CustomUnitary),
}

impl Uop {
    pub fn node_type(&self) -> NodeType {
        match self {
            Uop::U { .. } => NodeType::UniversalUnitary,
            Uop::Cx { .. } => NodeType::Cnot,
            Uop::Custom(_) => NodeType::CustomUnitary,
        }
    }

    pub fn qasm(&self) -> String {
        match self {
            Uop::U { params, target } => format!(
                "U({}) {};",
                join_qasm(params, Expression::qasm),
                target.qasm()
            ),
            Uop::Cx { control, target } => format!("CX {},{};", control.qasm(), target.qasm()),
            Uop::Custom(call) => call.qasm(),
        }
    }
}

/// Quantum operation statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Qop {
    Unitary(Uop),
    Measure { qubit: Argument, clbit: Argument },
    Reset { target: Argument },
}

impl Qop {
    pub fn node_type(&self) -> NodeType {
        match self {
            Qop::Unitary(uop) => uop.node_type(),
            Qop::Measure { .. } => NodeType::Measure,
            Qop::Reset { .. } => NodeType::Reset,
        }
    }

    pub fn qasm(&self) -> String {
        match self {
            Qop::Unitary(uop) => uop.qasm(),
            Qop::Measure { qubit, clbit } => {
                format!("measure {} -> {};", qubit.qasm(), clbit.qasm())
            }
            Qop::Reset { target } => format!("reset {};", target.qasm()),
        }
    }
}

/// One operation of a gate body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateOp {
    Uop(Uop),
    Barrier(IdList),
}

impl GateOp {
    pub fn qasm(&self) -> String {
        match self {
            GateOp::Uop(uop) => uop.qasm(),
            GateOp::Barrier(ids) => format!("barrier {};", ids.qasm()),
        }
    }
}

/// Ordered body of a gate declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GopList {
    pub ops: Vec<GateOp>,
}

impl GopList {
    pub fn new(ops: Vec<GateOp>) -> Self {
        Self { ops }
    }

    pub fn qasm(&self) -> String {
        self.ops
            .iter()
            .map(|op| format!("  {}\n", op.qasm()))
            .collect()
    }
}

/// Head of a gate declaration, before its body is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateHeader {
    pub name: Identifier,
    pub params: IdList,
    pub qubits: IdList,
}

impl GateHeader {
    pub fn qasm(&self) -> String {
        if self.params.is_empty() {
            format!("gate {} {}", self.name.qasm(), self.qubits.qasm())
        } else {
            format!(
                "gate {}({}) {}",
                self.name.qasm(),
                self.params.qasm(),
                self.qubits.qasm()
            )
        }
    }
}

/// Gate declaration with its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDecl {
    pub name: Identifier,
    pub params: IdList,
    pub qubits: IdList,
    pub body: GopList,
}

impl GateDecl {
    pub fn new(header: GateHeader, body: GopList) -> Self {
        Self {
            name: header.name,
            params: header.params,
            qubits: header.qubits,
            body,
        }
    }

    pub fn qasm(&self) -> String {
        let header = GateHeader {
            name: self.name.clone(),
            params: self.params.clone(),
            qubits: self.qubits.clone(),
        };
        format!("{}\n{{\n{}}}", header.qasm(), self.body.qasm())
    }
}

/// Opaque gate declaration: known by signature only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpaqueDecl {
    pub name: Identifier,
    pub params: IdList,
    pub qubits: IdList,
}

/// Classically conditioned operation: `if(c==1) x q[0];`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub register: Identifier,
    pub value: u64,
    pub op: Qop,
}

impl IfStatement {
    pub fn qasm(&self) -> String {
        format!(
            "if({}=={}) {}",
            self.register.qasm(),
            self.value,
            self.op.qasm()
        )
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Decl(RegisterDecl),
    GateDecl(GateDecl),
    Opaque(OpaqueDecl),
    Qop(Qop),
    If(IfStatement),
    Barrier(Vec<Argument>),
}

impl Statement {
    /// Assemble a statement from its primary operand and up to three
    /// auxiliary operands, in the order the grammar produces them.
    ///
    /// | primary           | p2          | p3       | p4       |
    /// |-------------------|-------------|----------|----------|
    /// | `Decl`            | -           | -        | -        |
    /// | `GateHeader`      | `GopList`   | -        | -        |
    /// | `Keyword::Opaque` | `Id`        | `IdList` | -        |
    /// | `Keyword::Opaque` | `Id`        | `IdList` | `IdList` |
    /// | `Qop`             | -           | -        | -        |
    /// | `Keyword::If`     | `Id`        | `Integer`| `Qop`    |
    /// | `Keyword::Barrier`| `PrimaryList`| -       | -        |
    ///
    /// For opaque gates with four operands, p3 holds the formal parameters
    /// and p4 the formal bits.
    pub fn assemble(
        op: Node,
        p2: Option<Node>,
        p3: Option<Node>,
        p4: Option<Node>,
    ) -> AstResult<Statement> {
        let op_type = match &op {
            Node::Keyword(keyword) => keyword.statement_type(),
            other => other.node_type(),
        };
        let found = describe_operands(p2.as_ref(), p3.as_ref(), p4.as_ref());
        let malformed = || AstError::MalformedStatement {
            op: op_type,
            found: found.clone(),
        };

        match (op, p2, p3, p4) {
            (Node::Decl(decl), None, None, None) => Ok(Statement::Decl(decl)),
            (Node::GateHeader(header), Some(Node::GopList(body)), None, None) => {
                Ok(Statement::GateDecl(GateDecl::new(header, body)))
            }
            (
                Node::Keyword(Keyword::Opaque),
                Some(Node::Id(name)),
                Some(Node::IdList(qubits)),
                None,
            ) => Ok(Statement::Opaque(OpaqueDecl {
                name,
                params: IdList::default(),
                qubits,
            })),
            (
                Node::Keyword(Keyword::Opaque),
                Some(Node::Id(name)),
                Some(Node::IdList(params)),
                Some(Node::IdList(qubits)),
            ) => Ok(Statement::Opaque(OpaqueDecl {
                name,
                params,
                qubits,
            })),
            (Node::Qop(qop), None, None, None) => Ok(Statement::Qop(qop)),
            (
                Node::Keyword(Keyword::If),
                Some(Node::Id(register)),
                Some(Node::Integer(value)),
                Some(Node::Qop(op)),
            ) => Ok(Statement::If(IfStatement {
                register,
                value,
                op,
            })),
            (Node::Keyword(Keyword::Barrier), Some(Node::PrimaryList(args)), None, None) => {
                Ok(Statement::Barrier(args))
            }
            (Node::Decl(_) | Node::GateHeader(_) | Node::Qop(_) | Node::Keyword(_), ..) => {
                Err(malformed())
            }
            _ => Err(AstError::InvalidPrimary(op_type)),
        }
    }

    /// Type of the primary operand.
    pub fn op_type(&self) -> NodeType {
        match self {
            Statement::Decl(_) => NodeType::Decl,
            Statement::GateDecl(_) => NodeType::GateDecl,
            Statement::Opaque(_) => NodeType::Opaque,
            Statement::Qop(_) => NodeType::Qop,
            Statement::If(_) => NodeType::If,
            Statement::Barrier(_) => NodeType::Barrier,
        }
    }

    /// Names of the gates a gate declaration's body calls, in body order.
    ///
    /// Built-in `U` and `CX` are not calls. Statements other than gate
    /// declarations call nothing.
    pub fn calls(&self) -> Vec<&str> {
        match self {
            Statement::GateDecl(decl) => decl
                .body
                .ops
                .iter()
                .filter_map(|op| match op {
                    GateOp::Uop(Uop::Custom(call)) => Some(call.name.name.as_str()),
                    GateOp::Uop(_) | GateOp::Barrier(_) => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn qasm(&self) -> String {
        match self {
            Statement::Decl(decl) => decl.qasm(),
            Statement::GateDecl(decl) => decl.qasm(),
            Statement::Opaque(decl) => {
                if decl.params.is_empty() {
                    format!(
                        "{} {} {};",
                        Keyword::Opaque.text(),
                        decl.name.qasm(),
                        decl.qubits.qasm()
                    )
                } else {
                    format!(
                        "{} {} ( {} ) {};",
                        Keyword::Opaque.text(),
                        decl.name.qasm(),
                        decl.params.qasm(),
                        decl.qubits.qasm()
                    )
                }
            }
            Statement::Qop(qop) => qop.qasm(),
            Statement::If(stmt) => stmt.qasm(),
            Statement::Barrier(args) => format!(
                "{} {};",
                Keyword::Barrier.text(),
                join_qasm(args, Argument::qasm)
            ),
        }
    }
}

fn describe_operands(p2: Option<&Node>, p3: Option<&Node>, p4: Option<&Node>) -> String {
    let show = |n: Option<&Node>| {
        n.map_or_else(|| "-".to_string(), |n| format!("{:?}", n.node_type()))
    };
    format!("({}, {}, {})", show(p2), show(p3), show(p4))
}
