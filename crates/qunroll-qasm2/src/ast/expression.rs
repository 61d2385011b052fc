//! Parameter expressions.

use serde::{Deserialize, Serialize};

use super::Identifier;

/// A real-valued gate parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Real literal.
    Real(f64),
    /// Non-negative integer literal.
    Int(u64),
    /// The constant π.
    Pi,
    /// Formal parameter reference (only meaningful inside a gate body).
    Id(Identifier),
    /// Negation.
    Neg(Box<Expression>),
    /// Binary operation.
    BinOp {
        lhs: Box<Expression>,
        op: BinOp,
        rhs: Box<Expression>,
    },
    /// Built-in unary function: `sin(x)`.
    Call { func: UnaryFn, arg: Box<Expression> },
}

impl Expression {
    pub fn id(name: impl Into<String>) -> Self {
        Expression::Id(Identifier::new(name))
    }

    pub fn binop(lhs: Expression, op: BinOp, rhs: Expression) -> Self {
        Expression::BinOp {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        }
    }

    /// Evaluate, resolving identifiers through `lookup`.
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate<E, F>(&self, lookup: &F) -> Result<f64, E>
    where
        F: Fn(&Identifier) -> Result<f64, E>,
    {
        Ok(match self {
            Expression::Real(v) => *v,
            Expression::Int(v) => *v as f64,
            Expression::Pi => std::f64::consts::PI,
            Expression::Id(id) => lookup(id)?,
            Expression::Neg(e) => -e.evaluate(lookup)?,
            Expression::BinOp { lhs, op, rhs } => {
                op.apply(lhs.evaluate(lookup)?, rhs.evaluate(lookup)?)
            }
            Expression::Call { func, arg } => func.apply(arg.evaluate(lookup)?),
        })
    }

    /// Value of an expression that references no identifiers.
    pub fn as_f64(&self) -> Option<f64> {
        self.evaluate(&|_: &Identifier| Err(())).ok()
    }

    pub fn qasm(&self) -> String {
        match self {
            Expression::Real(v) => format!("{v:?}"),
            Expression::Int(v) => v.to_string(),
            Expression::Pi => "pi".into(),
            Expression::Id(id) => id.qasm(),
            Expression::Neg(e) => format!("-({})", e.qasm()),
            Expression::BinOp { lhs, op, rhs } => {
                format!("({}{}{})", lhs.qasm(), op.symbol(), rhs.qasm())
            }
            Expression::Call { func, arg } => format!("{}({})", func.name(), arg.qasm()),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
        }
    }

    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            BinOp::Add => l + r,
            BinOp::Sub => l - r,
            BinOp::Mul => l * r,
            BinOp::Div => l / r,
            BinOp::Pow => l.powf(r),
        }
    }
}

/// The unary functions `OpenQASM` 2.0 knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
}

impl UnaryFn {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => UnaryFn::Sin,
            "cos" => UnaryFn::Cos,
            "tan" => UnaryFn::Tan,
            "exp" => UnaryFn::Exp,
            "ln" => UnaryFn::Ln,
            "sqrt" => UnaryFn::Sqrt,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            UnaryFn::Sin => "sin",
            UnaryFn::Cos => "cos",
            UnaryFn::Tan => "tan",
            UnaryFn::Exp => "exp",
            UnaryFn::Ln => "ln",
            UnaryFn::Sqrt => "sqrt",
        }
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            UnaryFn::Sin => x.sin(),
            UnaryFn::Cos => x.cos(),
            UnaryFn::Tan => x.tan(),
            UnaryFn::Exp => x.exp(),
            UnaryFn::Ln => x.ln(),
            UnaryFn::Sqrt => x.sqrt(),
        }
    }
}
