//! Front end for the Kaleidoscope toy language: scanner, parser and the AST
//! they produce.
//!
//! The language has a single value type (64-bit float) and lets programs
//! declare new unary and binary operators with user-chosen precedence;
//! later expressions in the same session are parsed accordingly.  Lowering
//! the AST to anything executable is delegated to a [`lower::Lower`]
//! consumer; the crate ships [`lower::Registrar`], a consumer that only does
//! module-level bookkeeping.
//!
//! # Examples
//!
//! See [`crate::session::Session`].
//!
//! # Limitations
//!
//! - The parser does not attempt any recovery inside a statement: the first
//! error aborts the current top-level construct and the driver resumes at
//! the next token.
//! - No strings, arrays, or numeric types other than f64.

#![warn(rust_2018_idioms)]

pub mod ast;
pub mod diag;
pub mod lower;
pub mod ops;
pub mod parser;
pub mod scanner;
pub mod session;
pub mod token;
