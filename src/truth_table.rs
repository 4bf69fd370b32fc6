//! Truth tables and the canonical normal forms derived from them.
//!
//! Rows enumerate all `2^n` assignments of the (sorted) variables, treating the first
//! variable as the most significant bit, false before true:
//!
//! ```text
//! a b | Result          row index = binary value of (a b)
//! 0 0 |  f(0,0)         0
//! 0 1 |  f(0,1)         1
//! 1 0 |  f(1,0)         2
//! 1 1 |  f(1,1)         3
//! ```
//!
//! From the table come the canonical DNF (one minterm per 1-row), the canonical CNF
//! (one maxterm per 0-row), their numeric forms (row indices) and the index form (the
//! whole result column read as one binary number).

use std::fmt;

use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::normal_form::NormalForm;
use crate::types::{Assignment, Clause, Form};
use crate::utils::{bits_to_index, index_to_bits};

/// One assignment of the table together with the function value.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Row {
    values: Vec<bool>,
    result: bool,
}

impl Row {
    pub fn new(values: Vec<bool>, result: bool) -> Self {
        Row { values, result }
    }

    /// Variable values, in variable order.
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    pub fn result(&self) -> bool {
        self.result
    }

    /// Decimal value of the assignment bits, most significant bit first.
    pub fn index(&self) -> usize {
        bits_to_index(&self.values)
    }
}

/// Truth table of a boolean function.
///
/// # Invariants
///
/// - `rows.len() == 2^variables.len()`
/// - row `i` holds the assignment whose binary value is `i`
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TruthTable {
    variables: Vec<String>,
    rows: Vec<Row>,
}

impl TruthTable {
    /// Widest table that can be built: `2^20` rows.
    pub const MAX_VARIABLES: usize = 20;

    /// Tabulates `f` over every assignment of `variables`.
    pub fn from_fn(variables: Vec<String>, mut f: impl FnMut(&Assignment) -> Result<bool>) -> Result<Self> {
        let n = check_width(&variables)?;
        let mut rows = Vec::with_capacity(1 << n);
        for index in 0..1usize << n {
            let values = index_to_bits(index, n);
            let assignment = Assignment::from_values(&variables, &values);
            let result = f(&assignment)?;
            rows.push(Row { values, result });
        }
        Ok(TruthTable { variables, rows })
    }

    pub fn from_formula(formula: &Formula) -> Result<Self> {
        Self::from_fn(formula.variables().to_vec(), |assignment| formula.evaluate(assignment))
    }

    /// Builds a table from its result column, which must hold `2^n` values.
    pub fn from_results(variables: Vec<String>, results: &[bool]) -> Result<Self> {
        let n = check_width(&variables)?;
        if results.len() != 1 << n {
            return Err(Error::InconsistentTruthTable {
                expected: 1 << n,
                width: n,
                actual: results.len(),
            });
        }
        let rows = results
            .iter()
            .enumerate()
            .map(|(index, &result)| Row {
                values: index_to_bits(index, n),
                result,
            })
            .collect();
        Ok(TruthTable { variables, rows })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows, always `2^n`.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A table is never empty: zero variables still give one row.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The result column.
    pub fn results(&self) -> Vec<bool> {
        self.rows.iter().map(|row| row.result).collect()
    }

    /// Assignment of row `index`.
    pub fn assignment(&self, index: usize) -> Assignment {
        Assignment::from_values(&self.variables, &self.rows[index].values)
    }

    /// Returns true if both tables range over the same variables with the same results.
    pub fn equivalent(&self, other: &TruthTable) -> bool {
        self.variables == other.variables && self.results() == other.results()
    }

    /// The canonical form: one full-length clause per row whose result is the
    /// form's target value.
    pub fn canonical(&self, form: Form) -> NormalForm {
        let clauses = self
            .rows
            .iter()
            .filter(|row| row.result == form.target_value())
            .map(|row| {
                self.variables
                    .iter()
                    .zip(&row.values)
                    .map(|(name, &value)| form.literal(name.as_str(), value))
                    .collect::<Clause>()
            })
            .collect();
        NormalForm::new(form, clauses)
    }

    /// Canonical DNF: a minterm per row evaluating to 1.
    pub fn canonical_dnf(&self) -> NormalForm {
        self.canonical(Form::Dnf)
    }

    /// Canonical CNF: a maxterm per row evaluating to 0.
    pub fn canonical_cnf(&self) -> NormalForm {
        self.canonical(Form::Cnf)
    }

    /// Row indices of the minterms (rows evaluating to 1).
    pub fn minterm_indices(&self) -> Vec<usize> {
        self.indices_where(true)
    }

    /// Row indices of the maxterms (rows evaluating to 0).
    pub fn maxterm_indices(&self) -> Vec<usize> {
        self.indices_where(false)
    }

    fn indices_where(&self, result: bool) -> Vec<usize> {
        self.rows.iter().filter(|row| row.result == result).map(Row::index).collect()
    }

    /// Numeric forms of the canonical DNF and CNF:
    ///
    /// ```text
    /// (1,3,5) ∨
    /// (0,2,4,6,7) ∧
    /// ```
    pub fn numeric_forms(&self) -> String {
        let join = |indices: Vec<usize>| indices.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(",");
        format!(
            "({}) ∨\n({}) ∧",
            join(self.minterm_indices()),
            join(self.maxterm_indices())
        )
    }

    /// The result column as a `0`/`1` string, first row first.
    pub fn index_form_bits(&self) -> String {
        self.rows.iter().map(|row| if row.result { '1' } else { '0' }).collect()
    }

    /// The result column read as one binary number, first row most significant.
    ///
    /// The column has `2^n` bits, hence the arbitrary-precision integer.
    pub fn index_form(&self) -> BigUint {
        let mut value = BigUint::ZERO;
        for row in &self.rows {
            value <<= 1u32;
            if row.result {
                value += 1u32;
            }
        }
        value
    }

    /// Checks the table against an externally supplied row list (used by the Karnaugh
    /// builder, which accepts raw rows).
    pub(crate) fn check_rows(variables: &[String], rows: &[Row]) -> Result<()> {
        if rows.is_empty() {
            return Err(Error::EmptyTruthTable);
        }
        let n = variables.len();
        let expected = 1usize << n;
        let consistent = rows.len() == expected
            && rows.iter().all(|row| row.values.len() == n)
            && {
                let mut seen = vec![false; expected];
                rows.iter().all(|row| !std::mem::replace(&mut seen[row.index()], true))
            };
        if !consistent {
            return Err(Error::InconsistentTruthTable {
                expected,
                width: n,
                actual: rows.len(),
            });
        }
        Ok(())
    }
}

fn check_width(variables: &[String]) -> Result<usize> {
    let count = variables.len();
    if count > TruthTable::MAX_VARIABLES {
        return Err(Error::TooManyVariables {
            count,
            max: TruthTable::MAX_VARIABLES,
        });
    }
    Ok(count)
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut header: Vec<&str> = self.variables.iter().map(String::as_str).collect();
        header.push("Result");
        writeln!(f, "{}", header.join(" | "))?;
        for row in &self.rows {
            let cells: Vec<String> = row
                .values
                .iter()
                .chain(std::iter::once(&row.result))
                .map(|&b| (b as u8).to_string())
                .collect();
            writeln!(f, "{}", cells.join(" | "))?;
        }
        Ok(())
    }
}
