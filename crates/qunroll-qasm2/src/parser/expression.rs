//! Expression parsing for QASM2.

use super::Parser;
use crate::ast::{BinOp, Expression, UnaryFn};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

/// Binding strength of unary minus: tighter than `*`, looser than `^`.
const NEG_PRECEDENCE: u8 = 3;

impl Parser {
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_expr(0)
    }

    /// Precedence climbing. `^` is right associative.
    fn parse_binary_expr(&mut self, min_prec: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary_expr()?;

        while let Some(op) = self.peek_binary_op() {
            let prec = op_precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance();

            let next_min = if op == BinOp::Pow { prec } else { prec + 1 };
            let right = self.parse_binary_expr(next_min)?;
            left = Expression::binop(left, op, right);
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> ParseResult<Expression> {
        if self.consume(&Token::Minus) {
            let expr = self.parse_binary_expr(NEG_PRECEDENCE)?;
            return Ok(Expression::Neg(Box::new(expr)));
        }
        self.parse_primary_expr()
    }

    fn parse_primary_expr(&mut self) -> ParseResult<Expression> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("expression".into()))?;

        match token {
            Token::IntLiteral(v) => {
                self.advance();
                Ok(Expression::Int(v))
            }
            Token::RealLiteral(v) => {
                if !v.is_finite() {
                    return Err(ParseError::RealOverflow { line: self.line() });
                }
                self.advance();
                Ok(Expression::Real(v))
            }
            Token::Pi => {
                self.advance();
                Ok(Expression::Pi)
            }
            Token::Identifier(ref name) if self.next_is_call() => {
                let func = UnaryFn::from_name(name)
                    .ok_or_else(|| self.unexpected("sin, cos, tan, exp, ln or sqrt", &token))?;
                self.advance();
                self.expect(Token::LParen)?;
                let arg = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Call {
                    func,
                    arg: Box::new(arg),
                })
            }
            Token::Identifier(_) => Ok(Expression::Id(self.parse_identifier()?)),
            Token::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression", &token)),
        }
    }

    fn next_is_call(&self) -> bool {
        matches!(
            self.tokens.get(self.pos + 1).map(|t| &t.token),
            Some(Token::LParen)
        )
    }

    fn peek_binary_op(&self) -> Option<BinOp> {
        match self.peek()? {
            Token::Plus => Some(BinOp::Add),
            Token::Minus => Some(BinOp::Sub),
            Token::Star => Some(BinOp::Mul),
            Token::Slash => Some(BinOp::Div),
            Token::Caret => Some(BinOp::Pow),
            _ => None,
        }
    }

    /// Comma separated expressions; empty when the next token is `)`.
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        if self.check(&Token::RParen) {
            return Ok(vec![]);
        }
        let mut exprs = vec![self.parse_expression()?];
        while self.consume(&Token::Comma) {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }
}

fn op_precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div => 2,
        BinOp::Pow => 4,
    }
}
