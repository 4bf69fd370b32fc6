//! Core value types: literals, clauses, the CNF/DNF form tag and variable assignments.
//!
//! A literal carries its polarity as a tagged boolean rather than as a `"¬"` prefix
//! embedded in the name, so clause sets can never hold the same literal twice under
//! two spellings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Neg;

/// A variable together with a polarity.
///
/// `polarity == true` renders as the plain variable, `false` as its negation.
///
/// Literals order by variable name first, so a [`Clause`] iterates in variable order.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Literal {
    name: String,
    polarity: bool,
}

impl Literal {
    pub fn new(name: impl Into<String>, polarity: bool) -> Self {
        Literal {
            name: name.into(),
            polarity,
        }
    }

    /// The plain literal `name`.
    pub fn positive(name: impl Into<String>) -> Self {
        Literal::new(name, true)
    }

    /// The negated literal `¬name`.
    pub fn negative(name: impl Into<String>) -> Self {
        Literal::new(name, false)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polarity(&self) -> bool {
        self.polarity
    }

    pub fn is_positive(&self) -> bool {
        self.polarity
    }

    pub fn is_negative(&self) -> bool {
        !self.polarity
    }

    /// Returns `true` if `other` is the same variable with the opposite polarity.
    pub fn is_complement_of(&self, other: &Literal) -> bool {
        self.name == other.name && self.polarity != other.polarity
    }

    /// Value of the literal under `assignment`, or `None` if its variable is unbound.
    pub fn eval(&self, assignment: &Assignment) -> Option<bool> {
        assignment.get(&self.name).map(|value| value == self.polarity)
    }
}

impl Neg for Literal {
    type Output = Literal;

    fn neg(self) -> Self::Output {
        Literal {
            name: self.name,
            polarity: !self.polarity,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.polarity {
            write!(f, "{}", self.name)
        } else {
            write!(f, "¬{}", self.name)
        }
    }
}

/// Order in which the literals of a clause are rendered.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum LiteralOrder {
    /// By variable name (`¬a ∨ b`). Used for canonical forms and Karnaugh results.
    #[default]
    ByVariable,
    /// Plain variables before negated ones, each group by name (`b ∨ ¬a`).
    PlainFirst,
}

impl LiteralOrder {
    fn key<'a>(self, literal: &'a Literal) -> (bool, &'a str) {
        match self {
            LiteralOrder::ByVariable => (false, literal.name()),
            LiteralOrder::PlainFirst => (literal.is_negative(), literal.name()),
        }
    }
}

/// A set of literals over distinct variables.
///
/// Read as a disjunction inside a CNF and as a conjunction inside a DNF.
///
/// # Invariants
///
/// - No variable appears twice (in particular, never with both polarities).
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Clause(BTreeSet<Literal>);

impl Clause {
    /// The empty clause.
    pub fn new() -> Self {
        Clause(BTreeSet::new())
    }

    /// Builds a clause, or returns the first literal whose complement is already present.
    pub fn from_literals(literals: impl IntoIterator<Item = Literal>) -> Result<Self, Literal> {
        let mut clause = Clause::new();
        for literal in literals {
            clause.insert(literal)?;
        }
        Ok(clause)
    }

    /// Inserts a literal; fails (leaving the clause untouched) if its complement is present.
    pub fn insert(&mut self, literal: Literal) -> Result<(), Literal> {
        if self.0.contains(&-literal.clone()) {
            return Err(literal);
        }
        self.0.insert(literal);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.0.contains(literal)
    }

    /// Literals in variable order.
    pub fn literals(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.0.iter()
    }

    /// Literals in the given render order.
    pub fn ordered(&self, order: LiteralOrder) -> Vec<&Literal> {
        let mut literals: Vec<&Literal> = self.0.iter().collect();
        literals.sort_by(|a, b| order.key(a).cmp(&order.key(b)));
        literals
    }

    pub fn is_subset(&self, other: &Clause) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn intersection(&self, other: &Clause) -> Clause {
        Clause(self.0.intersection(&other.0).cloned().collect())
    }

    /// Consensus of two clauses.
    ///
    /// If the symmetric difference of `self` and `other` is exactly one literal and its
    /// complement, returns their common part:
    ///
    /// ```text
    /// (X ∧ L) ∨ (X ∧ ¬L) = X        (X ∨ L) ∧ (X ∨ ¬L) = X
    /// ```
    pub fn merge(&self, other: &Clause) -> Option<Clause> {
        if self.len() != other.len() {
            return None;
        }
        let mut diff = self.0.symmetric_difference(&other.0);
        let first = diff.next()?;
        let second = diff.next()?;
        if diff.next().is_some() || !first.is_complement_of(second) {
            return None;
        }
        Some(self.intersection(other))
    }

    /// Compares two clauses by their rendering in the given order.
    pub fn cmp_rendered(&self, other: &Clause, order: LiteralOrder) -> std::cmp::Ordering {
        let lhs = self.ordered(order);
        let rhs = other.ordered(order);
        lhs.iter()
            .map(|l| order.key(l))
            .cmp(rhs.iter().map(|l| order.key(l)))
    }
}

impl FromIterator<Literal> for Clause {
    /// Collects literals; on conflict the later literal replaces the earlier one.
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        let mut set = BTreeSet::new();
        for literal in iter {
            set.remove(&-literal.clone());
            set.insert(literal);
        }
        Clause(set)
    }
}

/// Which normal form a clause collection represents.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Form {
    /// Conjunction of disjunctive clauses; built from the rows where the function is 0.
    Cnf,
    /// Disjunction of conjunctive terms; built from the rows where the function is 1.
    Dnf,
}

impl Form {
    /// The function value whose rows (or Karnaugh cells) the form is built from.
    pub fn target_value(self) -> bool {
        match self {
            Form::Cnf => false,
            Form::Dnf => true,
        }
    }

    /// Glyph joining clauses.
    pub fn outer_glyph(self) -> &'static str {
        match self {
            Form::Cnf => "∧",
            Form::Dnf => "∨",
        }
    }

    /// Glyph joining literals inside a clause.
    pub fn inner_glyph(self) -> &'static str {
        match self {
            Form::Cnf => "∨",
            Form::Dnf => "∧",
        }
    }

    /// Value of the empty collection: the empty conjunction is true, the empty disjunction false.
    pub fn empty_value(self) -> bool {
        match self {
            Form::Cnf => true,
            Form::Dnf => false,
        }
    }

    /// The literal contributed by a variable bound to `value` in a row of this form.
    ///
    /// DNF keeps the variable when it is 1; CNF keeps it when it is 0.
    pub fn literal(self, name: impl Into<String>, value: bool) -> Literal {
        match self {
            Form::Cnf => Literal::new(name, !value),
            Form::Dnf => Literal::new(name, value),
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Cnf => write!(f, "CNF"),
            Form::Dnf => write!(f, "DNF"),
        }
    }
}

/// Binding of variable names to boolean values.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Assignment(BTreeMap<String, bool>);

impl Assignment {
    pub fn new() -> Self {
        Assignment(BTreeMap::new())
    }

    /// Zips `variables` with `values` (same length).
    pub fn from_values(variables: &[String], values: &[bool]) -> Self {
        assert_eq!(
            variables.len(),
            values.len(),
            "Expected {} values, got {}",
            variables.len(),
            values.len()
        );
        variables.iter().cloned().zip(values.iter().copied()).collect()
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.0.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.0.iter().map(|(name, &value)| (name.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Assignment(iter.into_iter().map(|(name, value)| (name.into(), value)).collect())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            write!(f, "{}={}", name, value as u8)?;
        }
        Ok(())
    }
}
