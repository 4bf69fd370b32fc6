//! Parsing and evaluation of propositional formulas.
//!
//! A [`Formula`] is built once from text and is immutable afterwards. Parsing tokenizes
//! the text, reorders the tokens into postfix form with the shunting-yard algorithm and
//! checks that every operator gets its operands, so evaluation of a parsed formula can
//! only fail on an unbound variable.
//!
//! # Examples
//!
//! ```
//! use boolnf::formula::Formula;
//! use boolnf::types::Assignment;
//!
//! let f = Formula::parse("a → b ∧ ¬c").unwrap();
//! assert_eq!(f.variables(), ["a", "b", "c"]);
//!
//! let assignment: Assignment = [("a", true), ("b", true), ("c", false)].into_iter().collect();
//! assert!(f.evaluate(&assignment).unwrap());
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::{Error, Malformed, Result};
use crate::token::{tokenize, Operator, Token};
use crate::truth_table::TruthTable;
use crate::types::Assignment;

#[derive(Debug, Clone)]
pub struct Formula {
    source: String,
    tokens: Vec<Token>,
    postfix: Vec<Token>,
    variables: Vec<String>,
}

impl Formula {
    pub fn parse(text: &str) -> Result<Self> {
        let tokens = tokenize(text);
        let postfix = to_postfix(&tokens)?;
        check_arity(&postfix)?;
        let variables = collect_variables(&tokens);
        debug!(
            "parse({:?}): postfix = {}, variables = {:?}",
            text,
            postfix.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" "),
            variables
        );
        Ok(Formula {
            source: text.to_string(),
            tokens,
            postfix,
            variables,
        })
    }

    /// The text the formula was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn postfix(&self) -> &[Token] {
        &self.postfix
    }

    /// Distinct variable names, sorted lexicographically.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Evaluates the formula under `assignment`.
    ///
    /// Extra bindings are ignored; missing ones fail with [`Error::UndefinedVariable`]
    /// listing every unbound name.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<bool> {
        let missing: Vec<String> = self
            .variables
            .iter()
            .filter(|name| !assignment.contains(name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(Error::UndefinedVariable { names: missing });
        }
        evaluate_postfix(&self.postfix, assignment)
    }

    /// Truth table over [`variables`][Self::variables].
    pub fn truth_table(&self) -> Result<TruthTable> {
        TruthTable::from_formula(self)
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Formula::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

fn collect_variables(tokens: &[Token]) -> Vec<String> {
    let names: BTreeSet<&str> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Var(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    names.into_iter().map(String::from).collect()
}

/// Reorders infix tokens into postfix order.
///
/// A binary operator pops operators of greater or equal priority off the stack (left
/// associativity). Negation is a prefix operator: it never pops anything, so `!!a`
/// nests. A negation followed by a binary operator, a `)` or the end of input has no
/// operand. Parentheses are dropped from the output.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<&Token> = Vec::new();
    let mut after_not = false;

    for token in tokens {
        let closes_operand = match token {
            Token::RParen => true,
            Token::Op(op) => !op.is_unary(),
            _ => false,
        };
        if after_not && closes_operand {
            return Err(Error::malformed(Malformed::MissingOperand { operator: Operator::Not }));
        }
        after_not = matches!(token, Token::Op(op) if op.is_unary());

        match token {
            Token::Var(_) | Token::Const(_) => output.push(token.clone()),
            Token::LParen => stack.push(token),
            Token::RParen => loop {
                match stack.pop() {
                    Some(Token::LParen) => break,
                    Some(top) => output.push(top.clone()),
                    None => return Err(Error::malformed(Malformed::UnbalancedClose)),
                }
            },
            Token::Op(op) => {
                if !op.is_unary() {
                    while let Some(&&Token::Op(top)) = stack.last() {
                        if top.priority() < op.priority() {
                            break;
                        }
                        output.push(Token::Op(top));
                        stack.pop();
                    }
                }
                stack.push(token);
            }
        }
    }

    if after_not {
        return Err(Error::malformed(Malformed::MissingOperand { operator: Operator::Not }));
    }
    while let Some(top) = stack.pop() {
        if *top == Token::LParen {
            return Err(Error::malformed(Malformed::UnbalancedOpen));
        }
        output.push(top.clone());
    }

    Ok(output)
}

/// Simulates the value stack to make sure every operator has its operands
/// and exactly one value remains.
fn check_arity(postfix: &[Token]) -> Result<()> {
    let mut depth = 0usize;
    for token in postfix {
        match token {
            Token::Var(_) | Token::Const(_) => depth += 1,
            Token::Op(op) => {
                let arity = if op.is_unary() { 1 } else { 2 };
                if depth < arity {
                    return Err(Error::malformed(Malformed::MissingOperand { operator: *op }));
                }
                depth -= arity - 1;
            }
            Token::LParen | Token::RParen => unreachable!("parentheses never reach postfix output"),
        }
    }
    match depth {
        0 => Err(Error::malformed(Malformed::Empty)),
        1 => Ok(()),
        count => Err(Error::malformed(Malformed::DanglingOperand { count })),
    }
}

/// Evaluates a postfix token stream with a value stack.
///
/// Binary operators pop the right operand first, then the left one.
pub fn evaluate_postfix(postfix: &[Token], assignment: &Assignment) -> Result<bool> {
    let mut stack: Vec<bool> = Vec::with_capacity(postfix.len());

    for token in postfix {
        match token {
            Token::Var(name) => match assignment.get(name) {
                Some(value) => stack.push(value),
                None => {
                    return Err(Error::UndefinedVariable {
                        names: vec![name.clone()],
                    })
                }
            },
            Token::Const(value) => stack.push(*value),
            Token::Op(op) if op.is_unary() => {
                let operand = stack
                    .pop()
                    .ok_or_else(|| Error::malformed(Malformed::MissingOperand { operator: *op }))?;
                stack.push(op.apply(operand, false));
            }
            Token::Op(op) => {
                let (rhs, lhs) = match (stack.pop(), stack.pop()) {
                    (Some(rhs), Some(lhs)) => (rhs, lhs),
                    _ => return Err(Error::malformed(Malformed::MissingOperand { operator: *op })),
                };
                stack.push(op.apply(lhs, rhs));
            }
            Token::LParen | Token::RParen => {
                return Err(Error::malformed(if *token == Token::LParen {
                    Malformed::UnbalancedOpen
                } else {
                    Malformed::UnbalancedClose
                }))
            }
        }
    }

    match stack.len() {
        0 => Err(Error::malformed(Malformed::Empty)),
        1 => Ok(stack[0]),
        count => Err(Error::malformed(Malformed::DanglingOperand { count })),
    }
}
