//! Lexical analyzer

use std::io;
use std::io::prelude::*;
use std::io::Bytes;
use std::iter::Peekable;

use crate::diag::Position;
use crate::token::Token;

/// Turn a sequence of bytes into a sequence of tokens, one per call.
///
/// The scanner itself never raises syntax errors: input it does not
/// recognize comes back as a verbatim `Token::Char` for the parser to
/// judge.  Only the underlying reader can fail.
pub struct Scanner<R: BufRead> {
    input: Peekable<Bytes<R>>,
    line: Position,

    // Buffer used when scanning longer tokens.  Allocated here to reuse memory.
    buf: String,
}

impl<R: BufRead> Scanner<R> {
    /// Creates a new scanner operating on `input`.
    pub fn new(input: R) -> Scanner<R> {
        Scanner {
            input: input.bytes().peekable(),
            line: 1,
            buf: String::new(),
        }
    }

    /// Scan next token and return it together with its line number.
    pub fn get_token(&mut self) -> Result<(Position, Token), io::Error> {
        self.get_raw_token().map(|token| (self.line, token))
    }

    fn get_raw_token(&mut self) -> Result<Token, io::Error> {
        loop {
            let ch = match self.input.next() {
                None => return Ok(Token::Eof),
                Some(b) => b? as char,
            };
            match ch {
                '\n' => self.line += 1,
                c if c.is_ascii_whitespace() => (),
                '#' => self.skip_comment()?,
                c if c.is_ascii_alphabetic() => return self.scan_identifier(c),
                c if c.is_ascii_digit() || c == '.' => return self.scan_number(c),
                c => return Ok(Token::Char(c)),
            }
        }
    }

    /// Discard everything up to but not including the next newline, so the
    /// regular whitespace handling still counts the line.
    fn skip_comment(&mut self) -> Result<(), io::Error> {
        loop {
            match self.input.peek() {
                Some(Ok(b)) if *b != b'\n' => {
                    self.next_byte_unchecked()?;
                }
                Some(Err(_)) => {
                    self.next_byte_unchecked()?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_identifier(&mut self, first_char: char) -> Result<Token, io::Error> {
        self.buf.clear();
        self.buf.push(first_char);
        loop {
            match self.input.peek() {
                Some(Ok(b)) if b.is_ascii_alphanumeric() => {
                    let b = self.next_byte_unchecked()?;
                    self.buf.push(b as char);
                }
                _ => break,
            }
        }

        let token = match self.buf.as_str() {
            "def" => Token::Def,
            "decl" => Token::Decl,
            "if" => Token::If,
            "then" => Token::Then,
            "else" => Token::Else,
            "for" => Token::For,
            "in" => Token::In,
            "var" => Token::Var,
            "unary" => Token::Unary,
            "binary" => Token::Binary,
            _ => Token::Identifier(self.buf.clone()),
        };
        Ok(token)
    }

    fn scan_number(&mut self, first_digit: char) -> Result<Token, io::Error> {
        self.buf.clear();
        self.buf.push(first_digit);
        loop {
            match self.input.peek() {
                Some(Ok(b)) if b.is_ascii_digit() || *b == b'.' => {
                    let b = self.next_byte_unchecked()?;
                    self.buf.push(b as char);
                }
                _ => break,
            }
        }
        Ok(Token::Number(parse_double(&self.buf)))
    }

    /// Return next byte or I/O error.  Panic on EOF.
    /// Use this after peek()ing only.
    fn next_byte_unchecked(&mut self) -> Result<u8, io::Error> {
        Ok(self.input.next().unwrap()?)
    }
}

/// strtod-like conversion: parse the longest valid prefix of `text`, falling
/// back to 0.0 when nothing parses.  A second '.' ends the literal rather
/// than invalidating it.
fn parse_double(text: &str) -> f64 {
    match text.parse::<f64>() {
        Ok(n) => n,
        Err(_) => {
            let mut end = text.len();
            if let Some(first) = text.find('.') {
                if let Some(second) = text[first + 1..].find('.') {
                    end = first + 1 + second;
                }
            }
            text[..end].parse().unwrap_or(0.0)
        }
    }
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<Token, io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.get_token() {
            Ok((_, Token::Eof)) => None,
            Ok((_, t)) => Some(Ok(t)),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn scan(input: &str) -> Result<Vec<Token>, io::Error> {
        let s = Scanner::new(BufReader::new(input.as_bytes()));
        s.collect::<Result<Vec<Token>, io::Error>>()
    }

    #[test]
    fn single_char_token() -> Result<(), io::Error> {
        assert_eq!(scan("+")?, vec![Token::Char('+')]);
        Ok(())
    }

    #[test]
    fn operator_and_punctuation_chars_are_verbatim() -> Result<(), io::Error> {
        assert_eq!(
            scan("+-*/()<;,=@!")?,
            vec![
                Token::Char('+'),
                Token::Char('-'),
                Token::Char('*'),
                Token::Char('/'),
                Token::Char('('),
                Token::Char(')'),
                Token::Char('<'),
                Token::Char(';'),
                Token::Char(','),
                Token::Char('='),
                Token::Char('@'),
                Token::Char('!'),
            ]
        );
        Ok(())
    }

    #[test]
    fn blanks_are_ignored() -> Result<(), io::Error> {
        assert_eq!(scan(" \t\r\n+")?, vec![Token::Char('+')]);
        Ok(())
    }

    #[test]
    fn single_digit_number() -> Result<(), io::Error> {
        assert_eq!(scan("1")?, vec![Token::Number(1.0)]);
        Ok(())
    }

    #[test]
    fn floating_point() -> Result<(), io::Error> {
        assert_eq!(scan("4.2")?, vec![Token::Number(4.2)]);
        Ok(())
    }

    #[test]
    fn leading_dot_number() -> Result<(), io::Error> {
        assert_eq!(scan(".5")?, vec![Token::Number(0.5)]);
        Ok(())
    }

    #[test]
    fn second_dot_ends_the_literal() -> Result<(), io::Error> {
        // strtod behavior: "1.2.3" converts as 1.2
        assert_eq!(scan("1.2.3")?, vec![Token::Number(1.2)]);
        Ok(())
    }

    #[test]
    fn several_tokens_without_blanks() -> Result<(), io::Error> {
        assert_eq!(
            scan("42+24")?,
            vec![Token::Number(42.0), Token::Char('+'), Token::Number(24.0)]
        );
        Ok(())
    }

    #[test]
    fn keywords() -> Result<(), io::Error> {
        assert_eq!(
            scan("def decl if then else for in var unary binary")?,
            vec![
                Token::Def,
                Token::Decl,
                Token::If,
                Token::Then,
                Token::Else,
                Token::For,
                Token::In,
                Token::Var,
                Token::Unary,
                Token::Binary,
            ]
        );
        Ok(())
    }

    #[test]
    fn identifiers() -> Result<(), io::Error> {
        assert_eq!(
            scan("f foo t42 definition")?,
            vec![
                Token::Identifier("f".to_string()),
                Token::Identifier("foo".to_string()),
                Token::Identifier("t42".to_string()),
                Token::Identifier("definition".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn comments_contribute_zero_tokens() -> Result<(), io::Error> {
        assert_eq!(
            scan("# comment text\n next")?,
            scan("\n next")?
        );
        Ok(())
    }

    #[test]
    fn comment_at_eof() -> Result<(), io::Error> {
        assert_eq!(scan("1 # trailing")?, vec![Token::Number(1.0)]);
        Ok(())
    }

    #[test]
    fn scanner_keeps_track_of_lines() -> Result<(), io::Error> {
        let mut s = Scanner::new(BufReader::new("1\n2 3\n4".as_bytes()));
        assert_eq!(s.get_token()?, (1, Token::Number(1.0)));
        assert_eq!(s.get_token()?, (2, Token::Number(2.0)));
        assert_eq!(s.get_token()?, (2, Token::Number(3.0)));
        assert_eq!(s.get_token()?, (3, Token::Number(4.0)));
        Ok(())
    }

    #[test]
    fn eof_is_idempotent() -> Result<(), io::Error> {
        let mut s = Scanner::new(BufReader::new("".as_bytes()));
        assert_eq!(s.get_token()?, (1, Token::Eof));
        assert_eq!(s.get_token()?, (1, Token::Eof));
        Ok(())
    }
}
