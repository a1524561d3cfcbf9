//! Top-level driver: dispatch loop, error recovery, operator registration.

use std::error::Error;
use std::fmt;
use std::io;
use std::io::prelude::*;
use std::rc::Rc;

use crate::ast::Prototype;
use crate::lower::{Lower, LowerError};
use crate::ops::OpTable;
use crate::parser::{Parser, ParserError};
use crate::token::Token;

/// A parse-and-lower session.
///
/// Owns the operator table and the lowering consumer, so user-defined
/// operators and module-level symbols persist across `eval` calls.
/// Diagnostics and acknowledgments go to the injected sink.
///
/// # Example
///
/// Define a binary operator, then use it in a later expression:
///
/// ```
/// # use kaleido::lower::Registrar;
/// # use kaleido::session::{Session, SessionError};
/// let mut out: Vec<u8> = Vec::new();
/// let mut session = Session::new(&mut out, Registrar::new());
///
/// session.eval("def binary@ 5 (a b) a + b*2".as_bytes())?;
/// assert_eq!(session.operators().precedence('@'), 5);
///
/// session.eval("1 @ 2".as_bytes())?;
///
/// let output = String::from_utf8(out).unwrap();
/// assert_eq!(
///     output,
///     "read function definition: binary@\nread top-level expression\n"
/// );
/// # Ok::<(), SessionError>(())
/// ```
pub struct Session<'o, W: Write, L: Lower> {
    out: &'o mut W,
    ops: Rc<OpTable>,
    lowerer: L,
}

/// Errors that abort a session.  Parse and lowering errors never do; they
/// are reported on the sink and recovered from.
#[derive(Debug)]
pub enum SessionError {
    Read(io::Error),
    Write(io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Read(e) => write!(f, "read error: {}", e),
            SessionError::Write(e) => write!(f, "write error: {}", e),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Read(e) => Some(e),
            SessionError::Write(e) => Some(e),
        }
    }
}

impl<'o, W: Write, L: Lower> Session<'o, W, L> {
    pub fn new(out: &'o mut W, lowerer: L) -> Session<'o, W, L> {
        Session {
            out,
            ops: OpTable::new(),
            lowerer,
        }
    }

    pub fn operators(&self) -> &OpTable {
        &self.ops
    }

    pub fn lowerer(&self) -> &L {
        &self.lowerer
    }

    /// Parse and lower `input` until end of input.
    ///
    /// Top-level dispatch: end-of-input stops, ';' is skipped, 'def' and
    /// 'decl' parse the corresponding construct, anything else is a
    /// top-level expression.  A parse failure aborts only the current
    /// top-level statement: the message is written to the sink, the
    /// offending token is skipped, and the loop resumes.
    pub fn eval<R: BufRead>(&mut self, input: R) -> Result<(), SessionError> {
        let mut parser = Parser::new(input, self.ops.clone());
        parser.advance().map_err(SessionError::Read)?;
        loop {
            match parser.current().clone() {
                Token::Eof => break,
                Token::Char(';') => {
                    parser.advance().map_err(SessionError::Read)?;
                }
                Token::Def => match parser.parse_definition() {
                    Ok(function) => {
                        let verdict = self.lowerer.lower_function(&function);
                        self.finish_unit(&function.proto, "read function definition", verdict)?;
                    }
                    Err(e) => self.recover(&mut parser, e)?,
                },
                Token::Decl => match parser.parse_declaration() {
                    Ok(proto) => {
                        let verdict = self.lowerer.lower_prototype(&proto);
                        self.finish_unit(&proto, "read declaration", verdict)?;
                    }
                    Err(e) => self.recover(&mut parser, e)?,
                },
                _ => match parser.parse_top_level_expr() {
                    Ok(function) => {
                        let verdict = self.lowerer.lower_function(&function);
                        self.finish_unit(&function.proto, "read top-level expression", verdict)?;
                    }
                    Err(e) => self.recover(&mut parser, e)?,
                },
            }
        }
        Ok(())
    }

    /// Apply the consumer's verdict: maintain the operator table and write
    /// the acknowledgment or error message.
    fn finish_unit(
        &mut self,
        proto: &Prototype,
        what: &str,
        verdict: Result<(), LowerError>,
    ) -> Result<(), SessionError> {
        match verdict {
            Ok(()) => {
                if proto.is_binary_op() {
                    self.ops.register(proto.operator_char(), proto.precedence);
                }
                if proto.is_anonymous() {
                    writeln!(self.out, "{}", what).map_err(SessionError::Write)
                } else {
                    writeln!(self.out, "{}: {}", what, proto.name).map_err(SessionError::Write)
                }
            }
            Err(e) => {
                // allow the symbol to be reused by a corrected redefinition
                if proto.is_binary_op() {
                    self.ops.unregister(proto.operator_char());
                }
                writeln!(self.out, "error: {}", e).map_err(SessionError::Write)
            }
        }
    }

    /// The sole recovery point: report the failure and skip one token.
    fn recover<R: BufRead>(
        &mut self,
        parser: &mut Parser<R>,
        error: ParserError,
    ) -> Result<(), SessionError> {
        match error {
            ParserError::Read(e) => Err(SessionError::Read(e)),
            ParserError::Parse(diag) => {
                writeln!(self.out, "error: {}", diag).map_err(SessionError::Write)?;
                parser.advance().map_err(SessionError::Read)?;
                Ok(())
            }
        }
    }
}
