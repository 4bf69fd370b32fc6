//! Algebraic minimization by repeated consensus.
//!
//! Each round merges every pair of clauses that differ in exactly one complemented
//! literal into their common part, replaces the participants by the merged clauses,
//! and drops clauses absorbed by a strict subset. The loop stops at the first round
//! in which nothing merges and nothing is absorbed.
//!
//! # Examples
//!
//! ```
//! use boolnf::consensus::ConsensusReducer;
//! use boolnf::types::Form;
//!
//! let reducer = ConsensusReducer::parse(Form::Cnf, "(a ∨ b) ∧ (a ∨ ¬b)").unwrap();
//! assert_eq!(reducer.minimize().to_string(), "(a)");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use log::debug;

use crate::error::Result;
use crate::normal_form::{render_clause, NormalForm};
use crate::truth_table::TruthTable;
use crate::types::{Clause, Form, LiteralOrder};

/// Two clauses and their consensus.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Merge {
    pub left: Clause,
    pub right: Clause,
    pub merged: Clause,
}

/// One round of the reduction.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Step {
    /// Round number, starting at 1.
    pub round: usize,
    /// Working set at the start of the round.
    pub clauses: Vec<Clause>,
    /// Clauses removed because a strict subset is present.
    pub absorbed: Vec<Clause>,
    /// Successful merges of the round.
    pub merges: Vec<Merge>,
}

/// Result of [`ConsensusReducer::reduce`] together with its trace.
#[derive(Debug, Clone)]
pub struct Reduction {
    input: NormalForm,
    result: NormalForm,
    steps: Vec<Step>,
}

impl Reduction {
    pub fn input(&self) -> &NormalForm {
        &self.input
    }

    pub fn result(&self) -> &NormalForm {
        &self.result
    }

    pub fn into_result(self) -> NormalForm {
        self.result
    }

    /// Rounds that changed the working set.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = self.result.form();
        let order = self.result.literal_order();
        let clause = |c: &Clause| render_clause(c, form, order);
        let outer = format!(" {} ", form.outer_glyph());

        writeln!(f, "Input: {}", self.input)?;
        for step in &self.steps {
            let working: Vec<String> = step.clauses.iter().map(clause).collect();
            writeln!(f, "Round {}: {}", step.round, working.join(&outer))?;
            for c in &step.absorbed {
                writeln!(f, "  absorbed {}", clause(c))?;
            }
            for m in &step.merges {
                writeln!(
                    f,
                    "  {} {} {} => {}",
                    clause(&m.left),
                    form.outer_glyph(),
                    clause(&m.right),
                    clause(&m.merged)
                )?;
            }
        }
        write!(f, "Result: {}", self.result)
    }
}

/// Consensus minimizer for one CNF or DNF.
#[derive(Debug, Clone)]
pub struct ConsensusReducer {
    input: NormalForm,
}

impl ConsensusReducer {
    pub fn new(input: NormalForm) -> Self {
        ConsensusReducer { input }
    }

    /// Reads the CNF or DNF text to reduce.
    pub fn parse(form: Form, text: &str) -> Result<Self> {
        Ok(ConsensusReducer::new(NormalForm::parse(form, text)?))
    }

    /// Reduces the canonical `form` of `table`.
    pub fn from_truth_table(table: &TruthTable, form: Form) -> Self {
        ConsensusReducer::new(table.canonical(form))
    }

    pub fn input(&self) -> &NormalForm {
        &self.input
    }

    /// Runs the reduction to its fixpoint and returns the result with the trace.
    ///
    /// The result renders plain literals before negated ones, clauses sorted by
    /// their rendering.
    pub fn reduce(&self) -> Reduction {
        let form = self.input.form();
        let mut working = dedup(self.input.clauses().to_vec());
        let mut steps = Vec::new();

        for round in 1.. {
            let start = working.clone();
            let (kept, absorbed) = absorb(working);
            let (merges, participated) = merge_pairs(&kept);

            if absorbed.is_empty() && merges.is_empty() {
                debug!("reduce({}): fixpoint after {} round(s)", form, round - 1);
                working = kept;
                break;
            }
            debug!(
                "reduce({}): round {}: {} clause(s), {} absorbed, {} merge(s)",
                form,
                round,
                start.len(),
                absorbed.len(),
                merges.len()
            );

            let mut next: Vec<Clause> = merges.iter().map(|m| m.merged.clone()).collect();
            next.extend(
                kept.iter()
                    .zip(participated.iter().copied())
                    .filter(|&(_, merged)| !merged)
                    .map(|(clause, _)| clause.clone()),
            );
            working = dedup(next);

            steps.push(Step {
                round,
                clauses: start,
                absorbed,
                merges,
            });
        }

        let result = NormalForm::new(form, working)
            .with_literal_order(LiteralOrder::PlainFirst)
            .sorted();
        Reduction {
            input: self.input.clone(),
            result,
            steps,
        }
    }

    /// The reduced normal form, without the trace.
    pub fn minimize(&self) -> NormalForm {
        self.reduce().into_result()
    }
}

/// Drops repeated clauses, keeping first occurrences in place.
pub(crate) fn dedup(clauses: Vec<Clause>) -> Vec<Clause> {
    let mut seen = BTreeSet::new();
    clauses.into_iter().filter(|c| seen.insert(c.clone())).collect()
}

/// Splits deduplicated `clauses` into those kept and those having a strict subset
/// among the others.
pub(crate) fn absorb(clauses: Vec<Clause>) -> (Vec<Clause>, Vec<Clause>) {
    let absorbed: Vec<bool> = clauses
        .iter()
        .map(|c| clauses.iter().any(|d| d.len() < c.len() && d.is_subset(c)))
        .collect();
    let mut kept = Vec::with_capacity(clauses.len());
    let mut removed = Vec::new();
    for (clause, absorbed) in clauses.into_iter().zip(absorbed) {
        if absorbed {
            removed.push(clause);
        } else {
            kept.push(clause);
        }
    }
    (kept, removed)
}

/// Tries every unordered pair; returns the merges in pair order and, per clause,
/// whether it took part in at least one merge.
pub(crate) fn merge_pairs(clauses: &[Clause]) -> (Vec<Merge>, Vec<bool>) {
    let mut merges = Vec::new();
    let mut participated = vec![false; clauses.len()];
    for i in 0..clauses.len() {
        for j in i + 1..clauses.len() {
            if let Some(merged) = clauses[i].merge(&clauses[j]) {
                participated[i] = true;
                participated[j] = true;
                merges.push(Merge {
                    left: clauses[i].clone(),
                    right: clauses[j].clone(),
                    merged,
                });
            }
        }
    }
    (merges, participated)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::formula::Formula;

    fn reduce(form: Form, text: &str) -> String {
        ConsensusReducer::parse(form, text).unwrap().minimize().to_string()
    }

    #[test]
    fn test_single_merge() {
        assert_eq!(reduce(Form::Cnf, "(a ∨ b) ∧ (a ∨ ¬b)"), "(a)");
        assert_eq!(reduce(Form::Dnf, "(a ∧ b) ∨ (a ∧ ¬b)"), "(a)");
    }

    #[test]
    fn test_independent_groups() {
        assert_eq!(
            reduce(Form::Cnf, "(a ∨ b ∨ c) ∧ (a ∨ b ∨ ¬c) ∧ (d ∨ e) ∧ (d ∨ ¬e)"),
            "(a ∨ b) ∧ (d)"
        );
    }

    #[test]
    fn test_contradiction_and_tautology() {
        assert_eq!(reduce(Form::Cnf, "(a) ∧ (¬a)"), "False");
        assert_eq!(reduce(Form::Dnf, "(a) ∨ (¬a)"), "True");
        assert_eq!(reduce(Form::Cnf, "(a ∨ b) ∧ (a ∨ ¬b) ∧ (¬a ∨ b) ∧ (¬a ∨ ¬b)"), "False");
    }

    #[test]
    fn test_constants_pass_through() {
        assert_eq!(reduce(Form::Cnf, "True"), "True");
        assert_eq!(reduce(Form::Dnf, "False"), "False");
    }

    #[test]
    fn test_no_merge_is_already_minimal() {
        let reduction = ConsensusReducer::parse(Form::Cnf, "(a ∨ b)").unwrap().reduce();
        assert!(reduction.steps().is_empty());
        assert_eq!(reduction.result().to_string(), "(a ∨ b)");
    }

    #[test]
    fn test_absorption() {
        assert_eq!(reduce(Form::Dnf, "(a) ∨ (a ∧ b) ∨ (a ∧ b ∧ c)"), "(a)");
        assert_eq!(reduce(Form::Cnf, "(a ∨ ¬c) ∧ (¬c)"), "(¬c)");
    }

    #[test]
    fn test_duplicates_removed() {
        assert_eq!(reduce(Form::Dnf, "(a ∧ b) ∨ (b ∧ a)"), "(a ∧ b)");
    }

    #[test]
    fn test_plain_literals_first() {
        assert_eq!(reduce(Form::Cnf, "(¬c ∨ d ∨ a) ∧ (¬c ∨ d ∨ ¬a)"), "(d ∨ ¬c)");
    }

    #[test]
    fn test_idempotent() {
        let first = ConsensusReducer::parse(Form::Dnf, "(a ∧ b ∧ c) ∨ (a ∧ ¬b ∧ c) ∨ (¬a ∧ b ∧ ¬c)")
            .unwrap()
            .minimize();
        let second = ConsensusReducer::new(first.clone()).minimize();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "(a ∧ c) ∨ (b ∧ ¬a ∧ ¬c)");
    }

    #[test]
    fn test_equivalent_to_canonical() {
        for text in ["a ∨ b", "a → b", "(a ↔ b) ∧ c", "¬(a ∧ b) ∨ (c → d)", "a ∧ b ∧ c ∧ d ∨ e"] {
            let table = Formula::parse(text).unwrap().truth_table().unwrap();
            for form in [Form::Cnf, Form::Dnf] {
                let reduced = ConsensusReducer::from_truth_table(&table, form).minimize();
                let check = reduced.truth_table(table.variables()).unwrap();
                assert!(check.equivalent(&table), "{} {} reduced to {}", form, text, reduced);
            }
        }
    }

    #[test]
    fn test_trace() {
        let reduction = ConsensusReducer::parse(Form::Cnf, "(a ∨ b) ∧ (a ∨ ¬b)").unwrap().reduce();
        assert_eq!(reduction.steps().len(), 1);
        let step = &reduction.steps()[0];
        assert_eq!(step.round, 1);
        assert_eq!(step.merges.len(), 1);
        assert!(step.absorbed.is_empty());
        assert_eq!(
            reduction.to_string(),
            "Input: (a ∨ b) ∧ (a ∨ ¬b)\nRound 1: (a ∨ b) ∧ (a ∨ ¬b)\n  (a ∨ b) ∧ (a ∨ ¬b) => (a)\nResult: (a)"
        );
    }
}
