//! Binary operator precedence registry.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Sentinel returned by `precedence` for anything that is not a usable
/// binary operator.  Below every valid precedence (valid values are >= 1).
pub const NOT_AN_OPERATOR: i32 = -1;

/// Mutable mapping from a single-character operator symbol to its
/// precedence.
///
/// One table is shared by reference between the driver session and the
/// parser for the lifetime of a parse session: user programs can declare
/// new binary operators, and the declaration must affect how later
/// expressions in the same program are parsed.  Single-threaded by design;
/// independent sessions get independent tables.
#[derive(Debug)]
pub struct OpTable {
    precedences: RefCell<FxHashMap<char, i32>>,
}

const DEFAULT_PRECEDENCES: [(char, i32); 6] = [
    ('=', 2),
    ('<', 10),
    ('+', 20),
    ('-', 20),
    ('*', 40),
    ('/', 40),
];

impl OpTable {
    /// Creates a table holding the builtin operators.
    ///
    /// Returns a Rc because the table is shared between the session and its
    /// parsers.
    pub fn new() -> Rc<OpTable> {
        let mut precedences = FxHashMap::default();
        for (op, prec) in DEFAULT_PRECEDENCES {
            precedences.insert(op, prec);
        }
        Rc::new(OpTable {
            precedences: RefCell::new(precedences),
        })
    }

    /// The precedence registered for `op`, or `NOT_AN_OPERATOR` when `op` is
    /// not ASCII, not registered, or registered with a non-positive value.
    pub fn precedence(&self, op: char) -> i32 {
        if !op.is_ascii() {
            return NOT_AN_OPERATOR;
        }
        match self.precedences.borrow().get(&op) {
            Some(&prec) if prec > 0 => prec,
            _ => NOT_AN_OPERATOR,
        }
    }

    pub fn is_registered(&self, op: char) -> bool {
        self.precedence(op) > 0
    }

    pub fn register(&self, op: char, precedence: i32) {
        self.precedences.borrow_mut().insert(op, precedence);
    }

    /// Remove `op` so the symbol can be reused by a later redefinition.
    pub fn unregister(&self, op: char) {
        self.precedences.borrow_mut().remove(&op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_operators() {
        let ops = OpTable::new();
        assert_eq!(ops.precedence('='), 2);
        assert_eq!(ops.precedence('<'), 10);
        assert_eq!(ops.precedence('+'), 20);
        assert_eq!(ops.precedence('-'), 20);
        assert_eq!(ops.precedence('*'), 40);
        assert_eq!(ops.precedence('/'), 40);
    }

    #[test]
    fn unknown_operator_yields_sentinel() {
        let ops = OpTable::new();
        assert_eq!(ops.precedence('@'), NOT_AN_OPERATOR);
        assert_eq!(ops.precedence('('), NOT_AN_OPERATOR);
        assert!(!ops.is_registered('@'));
    }

    #[test]
    fn non_ascii_yields_sentinel() {
        let ops = OpTable::new();
        assert_eq!(ops.precedence('∏'), NOT_AN_OPERATOR);
    }

    #[test]
    fn register_and_unregister() {
        let ops = OpTable::new();
        ops.register('@', 5);
        assert_eq!(ops.precedence('@'), 5);
        ops.unregister('@');
        assert_eq!(ops.precedence('@'), NOT_AN_OPERATOR);
    }

    #[test]
    fn non_positive_precedence_is_not_usable() {
        let ops = OpTable::new();
        ops.register('@', 0);
        assert_eq!(ops.precedence('@'), NOT_AN_OPERATOR);
    }
}
