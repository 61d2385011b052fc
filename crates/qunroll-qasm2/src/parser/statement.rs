//! Statement parsing for QASM2.

use super::Parser;
use crate::ast::{
    Argument, CustomUnitary, GateHeader, GateOp, GopList, IdList, Identifier, Keyword, Node, Qop,
    RegisterDecl, Statement, Uop,
};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;

        match token {
            Token::Qreg | Token::Creg => self.parse_register_decl(),
            Token::Gate => self.parse_gate_decl(),
            Token::Opaque => self.parse_opaque(),
            Token::If => self.parse_if(),
            Token::Barrier => self.parse_barrier(),
            Token::GateU | Token::GateCX | Token::Identifier(_) | Token::Measure | Token::Reset => {
                let qop = self.parse_qop()?;
                Ok(Statement::assemble(Node::Qop(qop), None, None, None)?)
            }
            _ => Err(self.unexpected("statement", &token)),
        }
    }

    fn parse_register_decl(&mut self) -> ParseResult<Statement> {
        let quantum = self.consume(&Token::Qreg);
        if !quantum {
            self.expect(Token::Creg)?;
        }
        let name = self.parse_identifier()?;
        let size = self.parse_subscript()?;
        self.expect(Token::Semicolon)?;

        let decl = if quantum {
            RegisterDecl::quantum(name, size)
        } else {
            RegisterDecl::classical(name, size)
        };
        Ok(Statement::assemble(Node::Decl(decl), None, None, None)?)
    }

    /// `gate name(params) qubits { body }`
    fn parse_gate_decl(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Gate)?;
        let name = self.parse_identifier()?;
        let params = self.parse_formal_params()?.unwrap_or_default();
        let qubits = self.parse_id_list()?;

        self.expect(Token::LBrace)?;
        let mut ops = Vec::new();
        while !self.check(&Token::RBrace) {
            ops.push(self.parse_gate_op()?);
        }
        self.expect(Token::RBrace)?;

        let header = GateHeader {
            name,
            params,
            qubits,
        };
        Ok(Statement::assemble(
            Node::GateHeader(header),
            Some(Node::GopList(GopList::new(ops))),
            None,
            None,
        )?)
    }

    /// `opaque name(params) qubits;`
    fn parse_opaque(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Opaque)?;
        let name = self.parse_identifier()?;
        let params = self.parse_formal_params()?.filter(|p| !p.is_empty());
        let qubits = self.parse_id_list()?;
        self.expect(Token::Semicolon)?;

        let (p3, p4) = match params {
            Some(params) => (Node::IdList(params), Some(Node::IdList(qubits))),
            None => (Node::IdList(qubits), None),
        };
        Ok(Statement::assemble(
            Node::Keyword(Keyword::Opaque),
            Some(Node::Id(name)),
            Some(p3),
            p4,
        )?)
    }

    /// `if(creg==value) qop`
    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let register = self.parse_identifier()?;
        self.expect(Token::EqEq)?;
        let value = self.parse_int_literal()?;
        self.expect(Token::RParen)?;
        let qop = self.parse_qop()?;

        Ok(Statement::assemble(
            Node::Keyword(Keyword::If),
            Some(Node::Id(register)),
            Some(Node::Integer(value)),
            Some(Node::Qop(qop)),
        )?)
    }

    fn parse_barrier(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Barrier)?;
        let args = self.parse_argument_list()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::assemble(
            Node::Keyword(Keyword::Barrier),
            Some(Node::PrimaryList(args)),
            None,
            None,
        )?)
    }

    fn parse_qop(&mut self) -> ParseResult<Qop> {
        if self.consume(&Token::Measure) {
            let qubit = self.parse_argument()?;
            self.expect(Token::Arrow)?;
            let clbit = self.parse_argument()?;
            self.expect(Token::Semicolon)?;
            return Ok(Qop::Measure { qubit, clbit });
        }
        if self.consume(&Token::Reset) {
            let target = self.parse_argument()?;
            self.expect(Token::Semicolon)?;
            return Ok(Qop::Reset { target });
        }
        Ok(Qop::Unitary(self.parse_uop(false)?))
    }

    /// Operation inside a gate body.
    fn parse_gate_op(&mut self) -> ParseResult<GateOp> {
        if self.consume(&Token::Barrier) {
            let ids = self.parse_id_list()?;
            self.expect(Token::Semicolon)?;
            return Ok(GateOp::Barrier(ids));
        }
        Ok(GateOp::Uop(self.parse_uop(true)?))
    }

    /// Parse a unitary call. Inside gate bodies operands must be bare ids.
    fn parse_uop(&mut self, in_gate_body: bool) -> ParseResult<Uop> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("quantum operation".into()))?;

        let uop = match token {
            Token::GateU => {
                self.advance();
                self.expect(Token::LParen)?;
                let params = self.parse_expression_list()?;
                self.expect(Token::RParen)?;
                let target = self.parse_operand(in_gate_body)?;
                Uop::U { params, target }
            }
            Token::GateCX => {
                self.advance();
                let control = self.parse_operand(in_gate_body)?;
                self.expect(Token::Comma)?;
                let target = self.parse_operand(in_gate_body)?;
                Uop::Cx { control, target }
            }
            Token::Identifier(_) => {
                let name = self.parse_identifier()?;
                let params = if self.consume(&Token::LParen) {
                    let params = self.parse_expression_list()?;
                    self.expect(Token::RParen)?;
                    params
                } else {
                    Vec::new()
                };
                let mut args = vec![self.parse_operand(in_gate_body)?];
                while self.consume(&Token::Comma) {
                    args.push(self.parse_operand(in_gate_body)?);
                }
                Uop::Custom(CustomUnitary { name, params, args })
            }
            _ => return Err(self.unexpected("quantum operation", &token)),
        };
        self.expect(Token::Semicolon)?;
        Ok(uop)
    }

    fn parse_operand(&mut self, bare_only: bool) -> ParseResult<Argument> {
        if bare_only {
            Ok(Argument::Id(self.parse_identifier()?))
        } else {
            self.parse_argument()
        }
    }

    /// `name` or `name[index]`.
    fn parse_argument(&mut self) -> ParseResult<Argument> {
        let id = self.parse_identifier()?;
        if self.check(&Token::LBracket) {
            Ok(Argument::Indexed(self.parse_indexed(id)?))
        } else {
            Ok(Argument::Id(id))
        }
    }

    fn parse_argument_list(&mut self) -> ParseResult<Vec<Argument>> {
        let mut args = vec![self.parse_argument()?];
        while self.consume(&Token::Comma) {
            args.push(self.parse_argument()?);
        }
        Ok(args)
    }

    pub(super) fn parse_id_list(&mut self) -> ParseResult<IdList> {
        let mut ids: Vec<Identifier> = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(IdList::new(ids))
    }

    /// Optional `( id, ... )` after a gate name. `Some` when parentheses
    /// are present, even if empty.
    fn parse_formal_params(&mut self) -> ParseResult<Option<IdList>> {
        if !self.consume(&Token::LParen) {
            return Ok(None);
        }
        let params = if self.check(&Token::RParen) {
            IdList::default()
        } else {
            self.parse_id_list()?
        };
        self.expect(Token::RParen)?;
        Ok(Some(params))
    }
}
