//! Clause collections in conjunctive or disjunctive normal form.
//!
//! Rendering rules:
//!
//! - CNF: `(a ∨ ¬b) ∧ (c)`, DNF: `(a ∧ ¬b) ∨ (c)`; every clause is parenthesized.
//! - The empty collection is `True` for CNF and `False` for DNF.
//! - A collection containing the empty clause is `False` for CNF and `True` for DNF.
//!
//! [`NormalForm::parse`] reads this rendering back (ASCII connectives `& | !` are
//! accepted too).

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};
use crate::token::normalize;
use crate::truth_table::TruthTable;
use crate::types::{Assignment, Clause, Form, Literal, LiteralOrder};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct NormalForm {
    form: Form,
    clauses: Vec<Clause>,
    order: LiteralOrder,
}

impl NormalForm {
    pub fn new(form: Form, clauses: Vec<Clause>) -> Self {
        NormalForm {
            form,
            clauses,
            order: LiteralOrder::ByVariable,
        }
    }

    /// The constant `True` or `False` with no variables.
    pub fn constant(form: Form, value: bool) -> Self {
        if value == form.empty_value() {
            NormalForm::new(form, Vec::new())
        } else {
            NormalForm::new(form, vec![Clause::new()])
        }
    }

    /// Sets the order in which literals are rendered inside each clause.
    pub fn with_literal_order(mut self, order: LiteralOrder) -> Self {
        self.order = order;
        self
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    pub fn literal_order(&self) -> LiteralOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Total number of literal occurrences.
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Variables mentioned anywhere, sorted.
    pub fn variables(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .clauses
            .iter()
            .flat_map(|clause| clause.literals().map(Literal::name))
            .collect();
        names.into_iter().map(String::from).collect()
    }

    /// Drops repeated clauses, keeping first occurrences in place.
    pub fn dedup(mut self) -> Self {
        let mut seen = BTreeSet::new();
        self.clauses.retain(|clause| seen.insert(clause.clone()));
        self
    }

    /// Sorts clauses by their rendering under the current literal order.
    pub fn sorted(mut self) -> Self {
        let order = self.order;
        self.clauses.sort_by(|a, b| a.cmp_rendered(b, order));
        self
    }

    /// Evaluates the normal form under `assignment`.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<bool> {
        let missing: Vec<String> = self
            .variables()
            .into_iter()
            .filter(|name| !assignment.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(Error::UndefinedVariable { names: missing });
        }

        // Every variable is bound, so `eval` never returns `None` here.
        let literal = |l: &Literal| l.eval(assignment).unwrap_or(false);
        let value = match self.form {
            Form::Cnf => self.clauses.iter().all(|c| c.literals().any(literal)),
            Form::Dnf => self.clauses.iter().any(|c| c.literals().all(literal)),
        };
        Ok(value)
    }

    /// Truth table over `variables`, which must include every variable of the form.
    pub fn truth_table(&self, variables: &[String]) -> Result<TruthTable> {
        TruthTable::from_fn(variables.to_vec(), |assignment| self.evaluate(assignment))
    }

    /// Reads a CNF or DNF rendering.
    ///
    /// `True`/`False` (and `1`/`0`) denote the constants. Clauses are separated by the
    /// outer connective of `form` and may be parenthesized; literals are identifiers
    /// with an optional leading negation.
    pub fn parse(form: Form, text: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidNormalForm {
            input: text.to_string(),
            reason,
        };

        let trimmed = text.trim();
        match trimmed {
            "True" | "1" => return Ok(NormalForm::constant(form, true)),
            "False" | "0" => return Ok(NormalForm::constant(form, false)),
            "" => return Err(invalid("empty input".to_string())),
            _ => {}
        }

        let normalized = normalize(trimmed);
        let (outer, inner) = match form {
            Form::Cnf => ('&', '|'),
            Form::Dnf => ('|', '&'),
        };

        let mut clauses = Vec::new();
        for part in normalized.split(outer) {
            let body = part.trim();
            let body = match body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
                Some(inside) => inside.trim(),
                None => body,
            };
            if body.contains(['(', ')']) {
                let opened = part.matches('(').count();
                let reason = if opened == part.matches(')').count() {
                    format!("nested parentheses in {:?}", part.trim())
                } else {
                    format!("clause {:?} is not delimited by '{}'", part.trim(), form.outer_glyph())
                };
                return Err(invalid(reason));
            }

            let mut clause = Clause::new();
            if !body.is_empty() {
                for item in body.split(inner) {
                    let literal = parse_literal(item).map_err(&invalid)?;
                    clause
                        .insert(literal)
                        .map_err(|l| invalid(format!("clause {:?} contains both {} and {}", part.trim(), l, -l.clone())))?;
                }
            }
            clauses.push(clause);
        }

        Ok(NormalForm::new(form, clauses))
    }
}

fn parse_literal(item: &str) -> std::result::Result<Literal, String> {
    let mut rest = item.trim();
    let mut polarity = true;
    while let Some(inner) = rest.strip_prefix('!') {
        polarity = !polarity;
        rest = inner.trim_start();
    }
    let mut chars = rest.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_alphabetic()) && chars.all(char::is_alphanumeric);
    if !valid {
        return Err(format!("{:?} is not a literal", item.trim()));
    }
    Ok(Literal::new(rest, polarity))
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return write!(f, "{}", if self.form.empty_value() { "True" } else { "False" });
        }
        if self.clauses.iter().any(Clause::is_empty) {
            return write!(f, "{}", if self.form.empty_value() { "False" } else { "True" });
        }

        let outer = format!(" {} ", self.form.outer_glyph());
        let rendered: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| render_clause(clause, self.form, self.order))
            .collect();
        write!(f, "{}", rendered.join(&outer))
    }
}

/// Renders one clause of `form` in parentheses; the empty clause is `()`.
pub fn render_clause(clause: &Clause, form: Form, order: LiteralOrder) -> String {
    let inner = format!(" {} ", form.inner_glyph());
    let literals: Vec<String> = clause.ordered(order).iter().map(|l| l.to_string()).collect();
    format!("({})", literals.join(&inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::formula::Formula;

    #[test]
    fn test_parse_and_display_cnf() {
        let cnf = NormalForm::parse(Form::Cnf, "(a ∨ ¬b) ∧ (¬a ∨ b ∨ c)").unwrap();
        assert_eq!(cnf.len(), 2);
        assert_eq!(cnf.literal_count(), 5);
        assert_eq!(cnf.variables(), ["a", "b", "c"]);
        assert_eq!(cnf.to_string(), "(a ∨ ¬b) ∧ (¬a ∨ b ∨ c)");
        assert_eq!(
            cnf.with_literal_order(LiteralOrder::PlainFirst).to_string(),
            "(a ∨ ¬b) ∧ (b ∨ c ∨ ¬a)"
        );
    }

    #[test]
    fn test_parse_ascii_dnf() {
        let dnf = NormalForm::parse(Form::Dnf, "(a & !b) | c").unwrap();
        assert_eq!(dnf.to_string(), "(a ∧ ¬b) ∨ (c)");
    }

    #[test]
    fn test_parse_constants() {
        assert!(NormalForm::parse(Form::Cnf, "True").unwrap().is_empty());
        assert_eq!(NormalForm::parse(Form::Cnf, "False").unwrap().to_string(), "False");
        assert!(NormalForm::parse(Form::Dnf, "False").unwrap().is_empty());
        assert_eq!(NormalForm::parse(Form::Dnf, "True").unwrap().to_string(), "True");
    }

    #[test]
    fn test_parse_empty_clause() {
        let cnf = NormalForm::parse(Form::Cnf, "() ∧ (a ∨ b)").unwrap();
        assert!(cnf.clauses()[0].is_empty());
        assert_eq!(cnf.to_string(), "False");
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        assert!(matches!(
            NormalForm::parse(Form::Cnf, "(a ∨ ¬a)"),
            Err(Error::InvalidNormalForm { .. })
        ));
        assert!(matches!(
            NormalForm::parse(Form::Cnf, "(a ∨ (b))"),
            Err(Error::InvalidNormalForm { .. })
        ));
        assert!(matches!(
            NormalForm::parse(Form::Dnf, "(a ∧ 1b)"),
            Err(Error::InvalidNormalForm { .. })
        ));
        assert!(matches!(NormalForm::parse(Form::Dnf, "  "), Err(Error::InvalidNormalForm { .. })));
    }

    #[test]
    fn test_parse_reports_wrong_connective() {
        let reason = |form: Form, text: &str| match NormalForm::parse(form, text) {
            Err(Error::InvalidNormalForm { reason, .. }) => reason,
            other => panic!("expected invalid normal form for {:?}, got {:?}", text, other),
        };
        assert_eq!(reason(Form::Cnf, "(a ∧ b) ∨ (c)"), "clause \"(a\" is not delimited by '∧'");
        assert_eq!(reason(Form::Dnf, "(a ∨ b) ∧ (c)"), "clause \"(a\" is not delimited by '∨'");
        assert_eq!(reason(Form::Cnf, "(a ∨ (b))"), "nested parentheses in \"(a | (b))\"");
    }

    #[test]
    fn test_evaluate() {
        let cnf = NormalForm::parse(Form::Cnf, "(a ∨ b) ∧ (¬a ∨ ¬b)").unwrap();
        let xor = Formula::parse("¬(a ↔ b)").unwrap().truth_table().unwrap();
        let table = cnf.truth_table(xor.variables()).unwrap();
        assert!(table.equivalent(&xor));

        let missing = cnf.evaluate(&Assignment::new()).unwrap_err();
        assert_eq!(
            missing,
            Error::UndefinedVariable {
                names: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_dedup_and_sorted() {
        let dnf = NormalForm::parse(Form::Dnf, "(c) ∨ (a ∧ b) ∨ (c) ∨ (¬a)").unwrap();
        let dnf = dnf.dedup().with_literal_order(LiteralOrder::PlainFirst).sorted();
        assert_eq!(dnf.to_string(), "(a ∧ b) ∨ (c) ∨ (¬a)");
    }

    #[test]
    fn test_render_clause() {
        let clause: Clause = [Literal::negative("a"), Literal::positive("b")].into_iter().collect();
        assert_eq!(render_clause(&clause, Form::Cnf, LiteralOrder::PlainFirst), "(b ∨ ¬a)");
        assert_eq!(render_clause(&clause, Form::Dnf, LiteralOrder::ByVariable), "(¬a ∧ b)");
        assert_eq!(render_clause(&Clause::new(), Form::Dnf, LiteralOrder::ByVariable), "()");
    }

    #[test]
    fn test_constant_constructor() {
        assert_eq!(NormalForm::constant(Form::Cnf, true).to_string(), "True");
        assert_eq!(NormalForm::constant(Form::Cnf, false).to_string(), "False");
        assert_eq!(NormalForm::constant(Form::Dnf, true).to_string(), "True");
        assert_eq!(NormalForm::constant(Form::Dnf, false).to_string(), "False");
    }
}
