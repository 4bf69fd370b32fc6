//! Error types shared by the parser, the evaluator and the minimizers.
//!
//! Parsing and evaluation errors are reported to the direct caller.
//! Karnaugh-map invalidity is *not* raised: the map keeps the [`Error`] that made it
//! invalid and exposes it through [`KarnaughMap::error`][crate::karnaugh::KarnaughMap::error],
//! so batch minimization can skip bad inputs without aborting.

use std::fmt;

use thiserror::Error;

use crate::token::Operator;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Evaluation met variables that have no bound value.
    #[error("undefined variable(s): {}", .names.join(", "))]
    UndefinedVariable { names: Vec<String> },

    /// The token stream does not form a well-shaped expression.
    #[error("malformed expression: {reason}")]
    MalformedExpression { reason: Malformed },

    /// Karnaugh maps are laid out for 2 to 5 variables only.
    #[error("unsupported variable count {count} (Karnaugh maps support 2 to 5 variables)")]
    UnsupportedVariableCount { count: usize },

    /// A truth table over this many variables would not fit in memory.
    #[error("too many variables: {count} (truth tables support at most {max})")]
    TooManyVariables { count: usize, max: usize },

    #[error("empty truth table")]
    EmptyTruthTable,

    /// The rows do not enumerate every assignment exactly once.
    #[error("inconsistent truth table: expected {expected} rows of {width} values, got {actual}")]
    InconsistentTruthTable { expected: usize, width: usize, actual: usize },

    /// Covering was asked for with target cells that no implicant covers.
    #[error("coverage map is empty")]
    EmptyCoverage,

    /// Text handed to the CNF/DNF reader is not a normal form of the requested shape.
    #[error("invalid normal form {input:?}: {reason}")]
    InvalidNormalForm { input: String, reason: String },
}

impl Error {
    pub(crate) fn malformed(reason: Malformed) -> Self {
        Error::MalformedExpression { reason }
    }
}

/// What exactly is wrong with a malformed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    /// No tokens that produce a value.
    Empty,
    /// A `(` is never closed.
    UnbalancedOpen,
    /// A `)` has no matching `(`.
    UnbalancedClose,
    /// The operator has fewer operands than its arity.
    MissingOperand { operator: Operator },
    /// More than one value is left after evaluation.
    DanglingOperand { count: usize },
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformed::Empty => write!(f, "no operands"),
            Malformed::UnbalancedOpen => write!(f, "unclosed '('"),
            Malformed::UnbalancedClose => write!(f, "unmatched ')'"),
            Malformed::MissingOperand { operator } => write!(f, "missing operand for '{}'", operator),
            Malformed::DanglingOperand { count } => write!(f, "{} operands left without an operator", count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_variable_message() {
        let err = Error::UndefinedVariable {
            names: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(err.to_string(), "undefined variable(s): x, y");
    }

    #[test]
    fn test_malformed_message() {
        let err = Error::malformed(Malformed::MissingOperand { operator: Operator::And });
        assert_eq!(err.to_string(), "malformed expression: missing operand for '∧'");
    }
}
