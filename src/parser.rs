//! Recursive-descent parser with precedence climbing for binary operators.
//!
//! One token of lookahead, no backtracking.  Every parse function either
//! returns a completed node or an error; errors propagate unchanged to the
//! driver, which is the sole recovery point.

use std::error::Error;
use std::fmt;
use std::io;
use std::io::prelude::*;
use std::rc::Rc;

use crate::ast::{Expr, Function, OperatorKind, Prototype};
use crate::diag::{FullParseError, ParseError, Position};
use crate::ops::{self, OpTable};
use crate::scanner::Scanner;
use crate::token::Token;

/// Precedence given to a user-defined binary operator declared without an
/// explicit value.
const DEFAULT_USER_PRECEDENCE: i32 = 30;

#[derive(Debug)]
pub enum ParserError {
    Parse(FullParseError),
    Read(io::Error),
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserError::Parse(e) => write!(f, "{}", e),
            ParserError::Read(e) => write!(f, "read error: {}", e),
        }
    }
}

impl Error for ParserError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParserError::Parse(e) => Some(e),
            ParserError::Read(e) => Some(e),
        }
    }
}

impl From<io::Error> for ParserError {
    fn from(e: io::Error) -> ParserError {
        ParserError::Read(e)
    }
}

pub struct Parser<R: BufRead> {
    scanner: Scanner<R>,
    ops: Rc<OpTable>,
    current_token: Token,
    current_pos: Position,
}

impl<R: BufRead> Parser<R> {
    pub fn new(input: R, ops: Rc<OpTable>) -> Parser<R> {
        Parser {
            scanner: Scanner::new(input),
            ops,
            current_token: Token::Eof, // we haven't scanned anything yet
            current_pos: 1,
        }
    }

    /// The one-token lookahead buffer.
    pub fn current(&self) -> &Token {
        &self.current_token
    }

    /// Refresh the lookahead buffer from the scanner.
    ///
    /// The driver must call this once before the first parse and once to
    /// skip the offending token after a parse error.
    pub fn advance(&mut self) -> Result<&Token, io::Error> {
        let (pos, token) = self.scanner.get_token()?;
        self.current_token = token;
        self.current_pos = pos;
        Ok(&self.current_token)
    }

    /// definition := 'def' prototype expression
    pub fn parse_definition(&mut self) -> Result<Function, ParserError> {
        self.advance()?; // eat 'def'
        let proto = self.prototype()?;
        let body = self.expression()?;
        Ok(Function { proto, body })
    }

    /// declaration := 'decl' prototype
    pub fn parse_declaration(&mut self) -> Result<Prototype, ParserError> {
        self.advance()?; // eat 'decl'
        self.prototype()
    }

    /// Parse a bare expression and wrap it in an anonymous nullary function.
    pub fn parse_top_level_expr(&mut self) -> Result<Function, ParserError> {
        let body = self.expression()?;
        Ok(Function {
            proto: Prototype::anonymous(),
            body,
        })
    }

    /// expression := unary binary_rhs
    fn expression(&mut self) -> Result<Expr, ParserError> {
        let lhs = self.unary_expr()?;
        self.binary_rhs(0, lhs)
    }

    /// Precedence climbing.  Consumes operator/operand pairs that bind at
    /// least as tightly as `min_prec`; ties bind left because recursion
    /// happens only on a strictly greater next precedence.
    fn binary_rhs(&mut self, min_prec: i32, mut lhs: Expr) -> Result<Expr, ParserError> {
        loop {
            let tok_prec = self.current_precedence();
            if tok_prec < min_prec {
                return Ok(lhs);
            }
            let op = match self.current_token {
                Token::Char(c) => c,
                _ => return Ok(lhs),
            };
            self.advance()?;

            let mut rhs = self.unary_expr()?;
            let next_prec = self.current_precedence();
            if tok_prec < next_prec {
                rhs = self.binary_rhs(tok_prec + 1, rhs)?;
            }
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    /// unary := CHAR unary | primary
    ///
    /// Any ASCII character token except '(' and ',' is taken as a unary
    /// operator, registered or not; whether it resolves is the lowering
    /// consumer's business.
    fn unary_expr(&mut self) -> Result<Expr, ParserError> {
        match self.current_token {
            Token::Char(op) if op.is_ascii() && op != '(' && op != ',' => {
                self.advance()?;
                let operand = self.unary_expr()?;
                Ok(Expr::Unary(op, Box::new(operand)))
            }
            _ => self.primary(),
        }
    }

    /// primary := number | identifier | '(' expression ')' | if | for | var
    fn primary(&mut self) -> Result<Expr, ParserError> {
        match self.current_token.clone() {
            Token::Number(n) => {
                self.advance()?;
                Ok(Expr::Number(n))
            }
            Token::Identifier(name) => self.identifier_expr(name),
            Token::Char('(') => self.paren_expr(),
            Token::If => self.if_expr(),
            Token::For => self.for_expr(),
            Token::Var => self.var_expr(),
            t => Err(self.unexpected(&t, "an expression")),
        }
    }

    /// A bare identifier is a variable reference; an identifier followed by
    /// '(' is a call with comma-separated arguments.
    fn identifier_expr(&mut self, name: String) -> Result<Expr, ParserError> {
        self.advance()?; // eat the identifier
        if self.current_token != Token::Char('(') {
            return Ok(Expr::Variable(name));
        }

        self.advance()?; // eat '('
        let mut args = vec![];
        if self.current_token != Token::Char(')') {
            loop {
                args.push(self.expression()?);
                if self.current_token == Token::Char(')') {
                    break;
                }
                if self.current_token != Token::Char(',') {
                    return Err(self.missing_delimiter("')' or ',' in argument list"));
                }
                self.advance()?; // eat ','
            }
        }
        self.advance()?; // eat ')'
        Ok(Expr::Call(name, args))
    }

    fn paren_expr(&mut self) -> Result<Expr, ParserError> {
        self.advance()?; // eat '('
        let expr = self.expression()?;
        if self.current_token != Token::Char(')') {
            return Err(self.missing_delimiter("')'"));
        }
        self.advance()?; // eat ')'
        Ok(expr)
    }

    /// if_expr := 'if' expression 'then' expression 'else' expression
    fn if_expr(&mut self) -> Result<Expr, ParserError> {
        self.advance()?; // eat 'if'
        let condition = self.expression()?;
        self.expect_keyword(Token::Then, "'then'")?;
        let then_branch = self.expression()?;
        self.expect_keyword(Token::Else, "'else'")?;
        let else_branch = self.expression()?;
        Ok(Expr::If(
            Box::new(condition),
            Box::new(then_branch),
            Box::new(else_branch),
        ))
    }

    /// for_expr := 'for' ID '=' expression ',' expression [',' expression]
    ///             'in' expression
    fn for_expr(&mut self) -> Result<Expr, ParserError> {
        self.advance()?; // eat 'for'
        let name = self.identifier("an identifier after 'for'")?;
        if self.current_token != Token::Char('=') {
            let t = self.current_token.clone();
            return Err(self.unexpected(&t, "'=' after the loop variable"));
        }
        self.advance()?; // eat '='
        let start = self.expression()?;
        if self.current_token != Token::Char(',') {
            return Err(self.missing_delimiter("',' after the loop start value"));
        }
        self.advance()?; // eat ','
        let end = self.expression()?;
        let step = if self.current_token == Token::Char(',') {
            self.advance()?;
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        self.expect_keyword(Token::In, "'in'")?;
        let body = self.expression()?;
        Ok(Expr::For(name, Box::new(start), Box::new(end), step, Box::new(body)))
    }

    /// var_expr := 'var' ID ['=' expression] (',' ID ['=' expression])*
    ///             'in' expression
    fn var_expr(&mut self) -> Result<Expr, ParserError> {
        self.advance()?; // eat 'var'
        let mut bindings = vec![];
        loop {
            let name = self.identifier("an identifier after 'var'")?;
            let init = if self.current_token == Token::Char('=') {
                self.advance()?;
                Some(self.expression()?)
            } else {
                None
            };
            bindings.push((name, init));
            if self.current_token != Token::Char(',') {
                break;
            }
            self.advance()?; // eat ','
        }
        self.expect_keyword(Token::In, "'in'")?;
        let body = self.expression()?;
        Ok(Expr::Var(bindings, Box::new(body)))
    }

    /// prototype := ID '(' ID* ')'
    ///            | 'unary' CHAR '(' ID* ')'
    ///            | 'binary' CHAR [NUMBER] '(' ID* ')'
    ///
    /// Parameters are a whitespace-separated identifier list.  The declared
    /// operator kind must agree with the parameter count.
    fn prototype(&mut self) -> Result<Prototype, ParserError> {
        let (name, kind, precedence) = match self.current_token.clone() {
            Token::Identifier(name) => {
                self.advance()?;
                (name, OperatorKind::Plain, 0)
            }
            Token::Unary => {
                self.advance()?; // eat 'unary'
                let op = self.operator_char()?;
                (format!("unary{}", op), OperatorKind::Unary, 0)
            }
            Token::Binary => {
                self.advance()?; // eat 'binary'
                let op = self.operator_char()?;
                let precedence = match self.current_token {
                    Token::Number(n) => {
                        if !(1.0..=100.0).contains(&n) {
                            return Err(self.parse_error(ParseError::InvalidPrecedence(n)));
                        }
                        self.advance()?;
                        n as i32
                    }
                    _ => DEFAULT_USER_PRECEDENCE,
                };
                (format!("binary{}", op), OperatorKind::Binary, precedence)
            }
            t => return Err(self.unexpected(&t, "a function name in prototype")),
        };

        if self.current_token != Token::Char('(') {
            let t = self.current_token.clone();
            return Err(self.unexpected(&t, "'(' in prototype"));
        }
        self.advance()?; // eat '('

        let mut params = vec![];
        while let Token::Identifier(param) = self.current_token.clone() {
            params.push(param);
            self.advance()?;
        }
        if self.current_token != Token::Char(')') {
            return Err(self.missing_delimiter("')' in prototype"));
        }
        self.advance()?; // eat ')'

        let required = match kind {
            OperatorKind::Plain => params.len(),
            OperatorKind::Unary => 1,
            OperatorKind::Binary => 2,
        };
        if params.len() != required {
            return Err(self.parse_error(ParseError::ArityMismatch(name, required, params.len())));
        }

        Ok(Prototype::new(name, params, kind, precedence))
    }

    fn identifier(&mut self, expected: &str) -> Result<String, ParserError> {
        if let Token::Identifier(name) = self.current_token.clone() {
            self.advance()?;
            Ok(name)
        } else {
            let t = self.current_token.clone();
            Err(self.unexpected(&t, expected))
        }
    }

    /// The operator symbol in a 'unary'/'binary' prototype.
    fn operator_char(&mut self) -> Result<char, ParserError> {
        match self.current_token {
            Token::Char(c) if c.is_ascii() => {
                self.advance()?;
                Ok(c)
            }
            _ => {
                let t = self.current_token.clone();
                Err(self.unexpected(&t, "an operator character"))
            }
        }
    }

    fn expect_keyword(&mut self, expected: Token, what: &str) -> Result<(), ParserError> {
        if self.current_token == expected {
            self.advance()?;
            Ok(())
        } else {
            Err(self.missing_delimiter(what))
        }
    }

    fn current_precedence(&self) -> i32 {
        match self.current_token {
            Token::Char(c) => self.ops.precedence(c),
            _ => ops::NOT_AN_OPERATOR,
        }
    }

    fn parse_error(&self, error: ParseError) -> ParserError {
        ParserError::Parse(FullParseError {
            pos: self.current_pos,
            error,
        })
    }

    fn unexpected(&self, found: &Token, expected: &str) -> ParserError {
        self.parse_error(ParseError::UnexpectedToken(
            found.to_string(),
            expected.to_string(),
        ))
    }

    fn missing_delimiter(&self, expected: &str) -> ParserError {
        self.parse_error(ParseError::MissingDelimiter(
            self.current_token.to_string(),
            expected.to_string(),
        ))
    }
}
