//! Parser for `OpenQASM` 2.0.
//!
//! Statements are built through [`Statement::assemble`](crate::ast::Statement::assemble),
//! so every tree the parser returns is structurally valid. Include
//! directives are recorded on the program; the parser never reads files.
//! Callers that have the text of an included file use [`parse_include`].

mod expression;
mod statement;

use crate::ast::{Identifier, IndexedIdentifier, Location, Program, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a QASM2 source string into a [`Program`].
pub fn parse(source: &str) -> ParseResult<Program> {
    parse_with_file(source, "")
}

/// Parse a QASM2 source string, tagging node locations with `file`.
pub fn parse_with_file(source: &str, file: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source, file)?;
    parser.parse_program()
}

/// Parse the body of an included file: statements with no version header.
pub fn parse_include(source: &str, file: &str) -> ParseResult<Vec<Statement>> {
    let mut parser = Parser::new(source, file)?;
    let mut statements = Vec::new();
    while !parser.is_eof() {
        statements.push(parser.parse_statement()?);
    }
    Ok(statements)
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) file: String,
}

impl Parser {
    fn new(source: &str, file: &str) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((line, message)) => return Err(ParseError::LexerError { line, message }),
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            file: file.to_string(),
        })
    }

    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub(super) fn location(&self) -> Location {
        Location::new(self.file.clone(), self.line())
    }

    pub(super) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    pub(super) fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        ParseError::UnexpectedToken {
            line: self.line(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut includes = Vec::new();
        let mut statements = Vec::new();
        while !self.is_eof() {
            if self.consume(&Token::Include) {
                includes.push(self.parse_include_path()?);
            } else {
                statements.push(self.parse_statement()?);
            }
        }

        Ok(Program {
            version,
            includes,
            statements,
        })
    }

    /// Only major version 2 is accepted.
    fn parse_version(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::RealLiteral(v)) if (2.0..3.0).contains(&v) => Ok(format!("{v:?}")),
            Some(Token::IntLiteral(2)) => Ok("2.0".into()),
            Some(other) => Err(ParseError::InvalidVersion(other.to_string())),
            None => Err(ParseError::UnexpectedEof("version number".into())),
        }
    }

    fn parse_include_path(&mut self) -> ParseResult<String> {
        let path = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            Some(other) => return Err(self.unexpected("string literal", &other)),
            None => return Err(ParseError::UnexpectedEof("include path".into())),
        };
        self.expect(Token::Semicolon)?;
        Ok(path)
    }

    pub(super) fn parse_identifier(&mut self) -> ParseResult<Identifier> {
        let loc = self.location();
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(Identifier::new(name).at(loc)),
            Some(other) => Err(self.unexpected("identifier", &other)),
            None => Err(ParseError::UnexpectedEof("identifier".into())),
        }
    }

    pub(super) fn parse_int_literal(&mut self) -> ParseResult<u64> {
        match self.advance() {
            Some(Token::IntLiteral(v)) => Ok(v),
            Some(other) => Err(self.unexpected("integer", &other)),
            None => Err(ParseError::UnexpectedEof("integer".into())),
        }
    }

    /// Parse `[n]` into a `usize`.
    pub(super) fn parse_subscript(&mut self) -> ParseResult<usize> {
        self.expect(Token::LBracket)?;
        let line = self.line();
        let value = self.parse_int_literal()?;
        self.expect(Token::RBracket)?;
        usize::try_from(value).map_err(|_| ParseError::IntegerOverflow { line, value })
    }

    pub(super) fn parse_indexed(&mut self, id: Identifier) -> ParseResult<IndexedIdentifier> {
        let index = self.parse_subscript()?;
        Ok(IndexedIdentifier {
            name: id.name,
            index,
            loc: id.loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Qop, Uop};

    #[test]
    fn test_parse_bell_state() {
        let source = r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            h q[0];
            cx q[0],q[1];
            measure q -> c;
        "#;

        let program = parse(source).unwrap();
        assert_eq!(program.version, "2.0");
        assert_eq!(program.includes, vec!["qelib1.inc"]);
        assert_eq!(program.statements.len(), 5);
        assert!(matches!(
            program.statements[4],
            Statement::Qop(Qop::Measure { .. })
        ));
    }

    #[test]
    fn test_parse_records_locations() {
        let source = "OPENQASM 2.0;\nqreg q[1];\n\nU(0,0,0) q[0];";
        let program = parse_with_file(source, "one.qasm").unwrap();
        match &program.statements[1] {
            Statement::Qop(Qop::Unitary(Uop::U { target, .. })) => {
                assert_eq!(target.loc().to_string(), "one.qasm:4");
            }
            other => panic!("unexpected statement {other:?}"),
        }
    }

    #[test]
    fn test_parse_include_without_header() {
        let statements = parse_include("gate id a { U(0,0,0) a; }\n", "lib.inc").unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].calls(), Vec::<&str>::new());
    }

    #[test]
    fn test_parse_rejects_version_three() {
        let err = parse("OPENQASM 3.0;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidVersion(_)));
    }

    #[test]
    fn test_parse_reports_lexer_line() {
        let err = parse("OPENQASM 2.0;\nqreg q[1];\nh q @;").unwrap_err();
        assert!(matches!(err, ParseError::LexerError { line: 3, .. }));
    }

    #[test]
    fn test_parse_missing_semicolon() {
        let err = parse("OPENQASM 2.0;\nqreg q[1]\ncreg c[1];").unwrap_err();
        match err {
            ParseError::UnexpectedToken { line, expected, .. } => {
                assert_eq!(line, 3);
                assert_eq!(expected, ";");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_truncated_input() {
        let err = parse("OPENQASM 2.0;\nqreg q[").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }
}
