use std::fmt;

/// "Words" produced by `Scanner`.
///
/// Anything that is not end-of-input, a keyword, an identifier or a number
/// surfaces as `Char` carrying the character verbatim; this is how operator
/// symbols and punctuation reach the parser.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eof,

    // Keywords
    Def,
    Decl,
    If,
    Then,
    Else,
    For,
    In,
    Var,
    Unary,
    Binary,

    Identifier(String),
    Number(f64),
    Char(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "EOF"),
            Token::Def => write!(f, "def"),
            Token::Decl => write!(f, "decl"),
            Token::If => write!(f, "if"),
            Token::Then => write!(f, "then"),
            Token::Else => write!(f, "else"),
            Token::For => write!(f, "for"),
            Token::In => write!(f, "in"),
            Token::Var => write!(f, "var"),
            Token::Unary => write!(f, "unary"),
            Token::Binary => write!(f, "binary"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Number(n) => write!(f, "{}", n),
            Token::Char(c) => write!(f, "{}", c),
        }
    }
}
