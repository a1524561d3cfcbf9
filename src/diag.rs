use std::error::Error;
use std::fmt;

/// Line number (starting at one).
pub type Position = u32;

/// A parse error together with the line it was detected on.
#[derive(Debug, PartialEq)]
pub struct FullParseError {
    pub pos: Position,
    pub error: ParseError,
}

impl fmt::Display for FullParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error: line {}: {}", self.pos, self.error)
    }
}

impl Error for FullParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

/// Everything the parser can object to.
///
/// Conditions that are structurally valid but semantically suspect (such as
/// the left operand of '=' not being a variable) are not parse errors; they
/// are deferred to the lowering consumer.
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// A token seen where the grammar required something else.
    /// Carries the offending token and a description of what was expected.
    UnexpectedToken(String, String),
    /// An expected ')', ',', 'then', 'else' or 'in' is absent.
    /// Carries the token found and the missing delimiter.
    MissingDelimiter(String, String),
    /// Declared unary/binary operator kind disagrees with the parameter
    /// count: operator name, required count, declared count.
    ArityMismatch(String, usize, usize),
    /// A declared binary-operator precedence outside 1..=100.
    InvalidPrecedence(f64),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken(found, expected) => {
                write!(f, "unexpected token '{}', expected {}", found, expected)
            }
            ParseError::MissingDelimiter(found, expected) => {
                write!(f, "expected {} but found '{}'", expected, found)
            }
            ParseError::ArityMismatch(name, required, declared) => write!(
                f,
                "invalid number of parameters for operator '{}': {} required, {} declared",
                name, required, declared
            ),
            ParseError::InvalidPrecedence(value) => {
                write!(f, "invalid precedence {}: must be between 1 and 100", value)
            }
        }
    }
}
