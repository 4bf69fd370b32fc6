//! # boolnf: truth tables and two-level minimization of propositional formulas
//!
//! **`boolnf`** parses a propositional formula, tabulates it, and reduces it to a small
//! Conjunctive or Disjunctive Normal Form (CNF/DNF).
//!
//! ## Pipeline
//!
//! ```text
//! text ─► token ─► formula (postfix) ─► truth_table ─┬─► consensus  (algebraic)
//!                                                   ├─► karnaugh   (2..=5 variables)
//!                                                   └─► tabular    (prime implicant table)
//! ```
//!
//! - Formulas accept Unicode (`¬ ∧ ∨ → ↔`) or ASCII (`! & | -> ~`) connectives and the
//!   constants `0`/`1`. Variables are sorted lexicographically; the first one is the most
//!   significant bit of a truth-table row index.
//! - The canonical CNF has one maxterm per 0-row, the canonical DNF one minterm per 1-row.
//! - The [`ConsensusReducer`][crate::consensus::ConsensusReducer] merges clauses that
//!   differ in one complemented literal until nothing changes.
//! - The [`KarnaughMap`][crate::karnaugh::KarnaughMap] finds maximal Gray-code regions and
//!   covers the target cells with essential implicants plus a greedy pick.
//! - The [`TabularMinimizer`][crate::tabular::TabularMinimizer] computes every prime
//!   implicant by merging and solves the same covering problem on the canonical terms.
//!
//! ## Basic Usage
//!
//! ```rust
//! use boolnf::consensus::ConsensusReducer;
//! use boolnf::formula::Formula;
//! use boolnf::karnaugh::KarnaughMap;
//! use boolnf::types::Form;
//!
//! let formula = Formula::parse("a ∧ b ∧ c ∧ d ∨ e").unwrap();
//! let table = formula.truth_table().unwrap();
//! assert_eq!(table.len(), 32);
//!
//! // Karnaugh map, DNF
//! let map = KarnaughMap::new(&table, Form::Dnf);
//! let dnf = map.minimize().unwrap();
//! assert!(dnf.is_valid());
//! assert_eq!(dnf.to_string(), "(a ∧ b ∧ c ∧ d) ∨ (e)");
//!
//! // Consensus, CNF
//! let cnf = ConsensusReducer::from_truth_table(&table, Form::Cnf).minimize();
//! assert!(cnf.truth_table(table.variables()).unwrap().equivalent(&table));
//! ```
//!
//! Everything is synchronous and in memory; no operation keeps state between calls.

pub mod cellset;
pub mod consensus;
pub mod cover;
pub mod error;
pub mod formula;
pub mod karnaugh;
pub mod normal_form;
pub mod tabular;
pub mod token;
pub mod truth_table;
pub mod types;
pub mod utils;
