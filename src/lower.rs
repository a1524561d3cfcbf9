//! Output boundary of the front end.
//!
//! Each completed top-level unit is handed once to a [`Lower`] consumer,
//! which either accepts it (typically recording its prototype in some
//! module-level symbol table it owns) or rejects it with a generation
//! error.  The session reacts to the verdict by registering or
//! unregistering user-defined binary operators.

use std::error::Error;
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ast::{Expr, Function, Prototype};

/// Errors a lowering consumer can raise.
///
/// These are the checks deliberately deferred past parsing: the offending
/// input is structurally valid.
#[derive(Debug, PartialEq)]
pub enum LowerError {
    /// A function with this name already has a body.
    Redefinition(String),
    /// A prototype disagrees with an earlier one for the same name.
    ConflictingDeclaration(String),
    /// The left operand of '=' does not denote a variable.
    InvalidAssignmentTarget,
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LowerError::Redefinition(name) => {
                write!(f, "function '{}' cannot be redefined", name)
            }
            LowerError::ConflictingDeclaration(name) => {
                write!(f, "conflicting declaration for '{}'", name)
            }
            LowerError::InvalidAssignmentTarget => {
                write!(f, "destination of '=' must be a variable")
            }
        }
    }
}

impl Error for LowerError {}

/// Consumer of completed AST nodes.
pub trait Lower {
    fn lower_function(&mut self, function: &Function) -> Result<(), LowerError>;
    fn lower_prototype(&mut self, proto: &Prototype) -> Result<(), LowerError>;
}

/// Minimal lowering consumer: module-level bookkeeping without code
/// generation.
///
/// Keeps every known prototype by name, remembers which functions already
/// have a body, and performs the validation the parser defers (assignment
/// targets, arity agreement between declarations and definitions).
#[derive(Debug, Default)]
pub struct Registrar {
    prototypes: FxHashMap<String, Prototype>,
    defined: FxHashSet<String>,
}

impl Registrar {
    pub fn new() -> Registrar {
        Registrar::default()
    }

    pub fn prototype(&self, name: &str) -> Option<&Prototype> {
        self.prototypes.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    fn check_against_known(&self, proto: &Prototype) -> Result<(), LowerError> {
        if let Some(known) = self.prototypes.get(&proto.name) {
            if known.params.len() != proto.params.len() {
                return Err(LowerError::ConflictingDeclaration(proto.name.clone()));
            }
        }
        Ok(())
    }
}

impl Lower for Registrar {
    fn lower_function(&mut self, function: &Function) -> Result<(), LowerError> {
        check_assignment_targets(&function.body)?;

        let proto = &function.proto;
        if proto.is_anonymous() {
            // top-level expressions are transient and may be re-evaluated
            return Ok(());
        }
        if self.defined.contains(&proto.name) {
            return Err(LowerError::Redefinition(proto.name.clone()));
        }
        self.check_against_known(proto)?;
        self.prototypes.insert(proto.name.clone(), proto.clone());
        self.defined.insert(proto.name.clone());
        Ok(())
    }

    fn lower_prototype(&mut self, proto: &Prototype) -> Result<(), LowerError> {
        self.check_against_known(proto)?;
        self.prototypes.insert(proto.name.clone(), proto.clone());
        Ok(())
    }
}

/// The deferred lvalue check: every '=' must have a variable reference as
/// its left operand.
fn check_assignment_targets(expr: &Expr) -> Result<(), LowerError> {
    match expr {
        Expr::Number(_) | Expr::Variable(_) => Ok(()),
        Expr::Unary(_, operand) => check_assignment_targets(operand),
        Expr::Binary(op, lhs, rhs) => {
            if *op == '=' && !matches!(**lhs, Expr::Variable(_)) {
                return Err(LowerError::InvalidAssignmentTarget);
            }
            check_assignment_targets(lhs)?;
            check_assignment_targets(rhs)
        }
        Expr::Call(_, args) => {
            for arg in args {
                check_assignment_targets(arg)?;
            }
            Ok(())
        }
        Expr::If(condition, then_branch, else_branch) => {
            check_assignment_targets(condition)?;
            check_assignment_targets(then_branch)?;
            check_assignment_targets(else_branch)
        }
        Expr::For(_, start, end, step, body) => {
            check_assignment_targets(start)?;
            check_assignment_targets(end)?;
            if let Some(step) = step {
                check_assignment_targets(step)?;
            }
            check_assignment_targets(body)
        }
        Expr::Var(bindings, body) => {
            for (_, init) in bindings {
                if let Some(init) = init {
                    check_assignment_targets(init)?;
                }
            }
            check_assignment_targets(body)
        }
    }
}
