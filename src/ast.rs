//! Abstract syntax tree handed to the lowering consumer.
//!
//! Nodes own their children exclusively; the parser builds them bottom-up
//! and moves each completed node straight into its parent.

/// Name given to the implicit function wrapping a top-level expression.
pub const ANON_FUNCTION: &str = "__anon_expr";

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Number(f64),
    Variable(String),
    /// Operator character and operand.
    Unary(char, Box<Expr>),
    /// Operator character, left and right operands.
    Binary(char, Box<Expr>, Box<Expr>),
    /// Callee name and arguments.
    Call(String, Vec<Expr>),
    /// Condition, then branch, else branch.  Both branches are mandatory.
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    /// Loop variable, start, end, optional step (defaults to 1.0 downstream)
    /// and body.
    For(String, Box<Expr>, Box<Expr>, Option<Box<Expr>>, Box<Expr>),
    /// Ordered bindings (name, optional initializer) and the body they scope
    /// over.  A missing initializer defaults to 0.0 downstream.
    Var(Vec<(String, Option<Expr>)>, Box<Expr>),
}

/// Whether a prototype declares an ordinary function or a user-defined
/// operator.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperatorKind {
    Plain,
    Unary,
    Binary,
}

/// The signature of a function or user-defined operator: its name, parameter
/// names, operator kind and (for binary operators) precedence.
#[derive(Debug, PartialEq, Clone)]
pub struct Prototype {
    pub name: String,
    pub params: Vec<String>,
    pub kind: OperatorKind,
    pub precedence: i32,
}

impl Prototype {
    pub fn new(name: String, params: Vec<String>, kind: OperatorKind, precedence: i32) -> Prototype {
        Prototype {
            name,
            params,
            kind,
            precedence,
        }
    }

    /// Prototype of the function wrapping a top-level expression.
    pub fn anonymous() -> Prototype {
        Prototype::new(ANON_FUNCTION.to_string(), vec![], OperatorKind::Plain, 0)
    }

    pub fn is_anonymous(&self) -> bool {
        self.name == ANON_FUNCTION
    }

    pub fn is_unary_op(&self) -> bool {
        self.kind == OperatorKind::Unary
    }

    pub fn is_binary_op(&self) -> bool {
        self.kind == OperatorKind::Binary
    }

    /// The operator symbol, stored as the final character of the name.
    /// Meaningful only when `kind` is not `Plain`.
    pub fn operator_char(&self) -> char {
        debug_assert!(self.kind != OperatorKind::Plain);
        self.name.chars().next_back().unwrap_or('\0')
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Function {
    pub proto: Prototype,
    pub body: Expr,
}
