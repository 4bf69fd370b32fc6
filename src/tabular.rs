//! Tabular minimization: prime implicants by exhaustive merging, then a coverage
//! matrix against the canonical terms.
//!
//! Unlike [`ConsensusReducer`][crate::consensus::ConsensusReducer], which keeps
//! only what survives the merge rounds, every clause that fails to merge in some round
//! is recorded as a prime implicant. The cover is then chosen by
//! [`CoverageMap::select`], the same procedure the Karnaugh minimizer uses.
//!
//! The input is expected to be canonical (every clause mentions every variable):
//! a prime covers a term iff its literals are a subset of the term's.

use std::fmt;

use log::debug;

use crate::cellset::CellSet;
use crate::consensus::{absorb, dedup, merge_pairs};
use crate::cover::{CoverageMap, Selection};
use crate::error::Result;
use crate::normal_form::{render_clause, NormalForm};
use crate::truth_table::TruthTable;
use crate::types::{Clause, Form, LiteralOrder};

#[derive(Debug, Clone)]
pub struct TabularMinimizer {
    input: NormalForm,
}

impl TabularMinimizer {
    pub fn new(input: NormalForm) -> Self {
        TabularMinimizer { input }
    }

    pub fn parse(form: Form, text: &str) -> Result<Self> {
        Ok(TabularMinimizer::new(NormalForm::parse(form, text)?))
    }

    pub fn from_truth_table(table: &TruthTable, form: Form) -> Self {
        TabularMinimizer::new(table.canonical(form))
    }

    pub fn input(&self) -> &NormalForm {
        &self.input
    }

    /// Prime implicants of the input terms, sorted by rendering.
    pub fn prime_implicants(&self) -> Vec<Clause> {
        let mut working = dedup(self.input.clauses().to_vec());
        let mut primes: Vec<Clause> = Vec::new();
        let mut round = 0;

        while !working.is_empty() {
            round += 1;
            let (merges, participated) = merge_pairs(&working);
            for (clause, merged) in working.iter().zip(participated) {
                if !merged && !primes.iter().any(|p| p.is_subset(clause)) {
                    primes.push(clause.clone());
                }
            }
            debug!(
                "prime_implicants: round {}: {} term(s), {} merge(s), {} prime(s) so far",
                round,
                working.len(),
                merges.len(),
                primes.len()
            );
            working = dedup(merges.into_iter().map(|m| m.merged).collect());
        }

        let (mut primes, _) = absorb(primes);
        primes.sort_by(|a, b| a.cmp_rendered(b, LiteralOrder::PlainFirst));
        primes
    }

    /// Which prime implicant covers which input term.
    pub fn coverage_matrix(&self) -> CoverageMatrix {
        let terms = dedup(self.input.clauses().to_vec());
        let primes = self.prime_implicants();
        let mut map = CoverageMap::new(CellSet::full(terms.len()));
        for prime in &primes {
            let covers = CellSet::from_indices(
                terms.len(),
                terms
                    .iter()
                    .enumerate()
                    .filter(|(_, term)| prime.is_subset(term))
                    .map(|(index, _)| index),
            );
            map.add(covers, prime.len());
        }
        CoverageMatrix {
            form: self.input.form(),
            primes,
            terms,
            map,
        }
    }

    /// The minimized form, plain literals first and clauses sorted.
    pub fn minimize(&self) -> Result<NormalForm> {
        let matrix = self.coverage_matrix();
        let selection = matrix.select()?;
        let clauses = selection
            .chosen
            .iter()
            .map(|&index| matrix.primes[index].clone())
            .collect();
        let result = NormalForm::new(matrix.form, clauses)
            .with_literal_order(LiteralOrder::PlainFirst)
            .sorted();
        debug!("minimize({}): {}", matrix.form, result);
        Ok(result)
    }
}

/// Prime implicants against canonical terms.
#[derive(Debug, Clone)]
pub struct CoverageMatrix {
    form: Form,
    primes: Vec<Clause>,
    terms: Vec<Clause>,
    map: CoverageMap,
}

impl CoverageMatrix {
    pub fn primes(&self) -> &[Clause] {
        &self.primes
    }

    pub fn terms(&self) -> &[Clause] {
        &self.terms
    }

    pub fn covers(&self, prime: usize, term: usize) -> bool {
        self.map.candidates()[prime].covers().contains(term)
    }

    pub fn select(&self) -> Result<Selection> {
        self.map.select()
    }
}

impl fmt::Display for CoverageMatrix {
    /// One row per prime, one column per term, `X` where the prime covers the term.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = |c: &Clause| render_clause(c, self.form, LiteralOrder::PlainFirst);
        let primes: Vec<String> = self.primes.iter().map(render).collect();
        let terms: Vec<String> = self.terms.iter().map(render).collect();
        let label_width = primes.iter().map(|p| p.chars().count()).max().unwrap_or(0);

        let mut header = " ".repeat(label_width);
        for term in &terms {
            header.push_str(" | ");
            header.push_str(term);
        }
        writeln!(f, "{}", header.trim_end())?;

        for (i, prime) in primes.iter().enumerate() {
            let mut line = format!("{:<w$}", prime, w = label_width);
            for (j, term) in terms.iter().enumerate() {
                let mark = if self.covers(i, j) { "X" } else { "" };
                line.push_str(&format!(" | {:<w$}", mark, w = term.chars().count()));
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
