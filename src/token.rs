//! Lexing of formula text.
//!
//! Unicode connectives are first rewritten to their ASCII spelling:
//!
//! | Glyph | ASCII | Priority | Meaning        |
//! |-------|-------|----------|----------------|
//! | `¬`   | `!`   | 4        | negation       |
//! | `∧`   | `&`   | 3        | conjunction    |
//! | `∨`   | `\|`  | 2        | disjunction    |
//! | `→`   | `->`  | 1        | implication    |
//! | `↔`   | `~`   | 0        | biconditional  |
//!
//! The scanner then emits parentheses, operators, identifiers (a letter followed by
//! letters or digits) and the constants `0`/`1`. Anything else, whitespace included,
//! is skipped.

use std::fmt;

/// A logical connective with its fixed priority and arity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    Not,
    And,
    Or,
    Implies,
    Equiv,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Not,
        Operator::And,
        Operator::Or,
        Operator::Implies,
        Operator::Equiv,
    ];

    /// Binding strength; higher binds tighter.
    pub const fn priority(self) -> u8 {
        match self {
            Operator::Not => 4,
            Operator::And => 3,
            Operator::Or => 2,
            Operator::Implies => 1,
            Operator::Equiv => 0,
        }
    }

    pub const fn is_unary(self) -> bool {
        matches!(self, Operator::Not)
    }

    pub const fn ascii(self) -> &'static str {
        match self {
            Operator::Not => "!",
            Operator::And => "&",
            Operator::Or => "|",
            Operator::Implies => "->",
            Operator::Equiv => "~",
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Operator::Not => '¬',
            Operator::And => '∧',
            Operator::Or => '∨',
            Operator::Implies => '→',
            Operator::Equiv => '↔',
        }
    }

    /// Applies a binary connective. Negation ignores `rhs`.
    pub fn apply(self, lhs: bool, rhs: bool) -> bool {
        match self {
            Operator::Not => !lhs,
            Operator::And => lhs && rhs,
            Operator::Or => lhs || rhs,
            Operator::Implies => !lhs || rhs,
            Operator::Equiv => lhs == rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Token {
    LParen,
    RParen,
    Op(Operator),
    Var(String),
    Const(bool),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Op(op) => write!(f, "{}", op.ascii()),
            Token::Var(name) => write!(f, "{}", name),
            Token::Const(value) => write!(f, "{}", *value as u8),
        }
    }
}

/// Rewrites the Unicode connectives to their ASCII spelling.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match Operator::ALL.iter().find(|op| op.glyph() == c) {
            Some(op) => out.push_str(op.ascii()),
            None => out.push(c),
        }
    }
    out
}

/// Splits formula text into tokens.
///
/// `->` is a single token; a lone `-` or `>` is skipped like any other stray character.
pub fn tokenize(text: &str) -> Vec<Token> {
    let normalized = normalize(text);
    let mut tokens = Vec::new();
    let mut chars = normalized.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '!' => tokens.push(Token::Op(Operator::Not)),
            '&' => tokens.push(Token::Op(Operator::And)),
            '|' => tokens.push(Token::Op(Operator::Or)),
            '~' => tokens.push(Token::Op(Operator::Equiv)),
            '-' if chars.peek() == Some(&'>') => {
                chars.next();
                tokens.push(Token::Op(Operator::Implies));
            }
            c if c.is_alphabetic() => {
                let mut name = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_alphanumeric() {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                tokens.push(Token::Var(name));
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    digits.push(next);
                    chars.next();
                }
                match digits.as_str() {
                    "0" => tokens.push(Token::Const(false)),
                    "1" => tokens.push(Token::Const(true)),
                    _ => log::debug!("tokenize: skipping number {:?}", digits),
                }
            }
            _ => {}
        }
    }

    tokens
}
