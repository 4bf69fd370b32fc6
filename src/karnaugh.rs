//! Karnaugh-map minimization for 2 to 5 variables.
//!
//! The leading variables index the rows and the remaining ones the columns, both in
//! reflected Gray order, so horizontally or vertically adjacent cells (wrapping around
//! the edges) differ in exactly one variable:
//!
//! ```text
//!  vars | rows x cols | split
//!  -----+-------------+------
//!    2  |   2 x 2     | 1 | 1
//!    3  |   2 x 4     | 1 | 2
//!    4  |   4 x 4     | 2 | 2
//!    5  |   8 x 4     | 3 | 2
//! ```
//!
//! Prime implicants are the maximal wrapped rectangles of power-of-two sides whose
//! cells all hold the target value (1 for DNF, 0 for CNF) and form a subcube of the
//! assignment space. A rectangle spanning four rows of a 3-bit Gray axis is a subcube
//! only when it starts at an even row.
//!
//! A map built from a table it cannot handle is *invalid*: it remembers why, logs a
//! warning, and minimizes to an empty result flagged as invalid.

use std::fmt;

use log::{debug, warn};

use crate::cellset::CellSet;
use crate::cover::{CoverageMap, Selection};
use crate::error::{Error, Result};
use crate::normal_form::NormalForm;
use crate::truth_table::{Row, TruthTable};
use crate::types::{Clause, Form};
use crate::utils::{format_bits, gray, gray_inverse, gray_sequence};

/// Split of the variables between the row and column axes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct KarnaughLayout {
    row_vars: usize,
    col_vars: usize,
}

impl KarnaughLayout {
    pub const MIN_VARIABLES: usize = 2;
    pub const MAX_VARIABLES: usize = 5;

    pub fn for_variables(count: usize) -> Result<Self> {
        let (row_vars, col_vars) = match count {
            2 => (1, 1),
            3 => (1, 2),
            4 => (2, 2),
            5 => (3, 2),
            _ => return Err(Error::UnsupportedVariableCount { count }),
        };
        Ok(KarnaughLayout { row_vars, col_vars })
    }

    pub fn num_vars(&self) -> usize {
        self.row_vars + self.col_vars
    }

    pub fn row_vars(&self) -> usize {
        self.row_vars
    }

    pub fn col_vars(&self) -> usize {
        self.col_vars
    }

    pub fn rows(&self) -> usize {
        1 << self.row_vars
    }

    pub fn cols(&self) -> usize {
        1 << self.col_vars
    }

    pub fn num_cells(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Row-major index of grid position `(row, col)`.
    pub fn cell_index(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    /// Truth-table row shown at grid position `(row, col)`.
    pub fn table_index(&self, row: usize, col: usize) -> usize {
        (gray(row) << self.col_vars) | gray(col)
    }

    /// Grid position of truth-table row `index`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        let col_mask = self.cols() - 1;
        (gray_inverse(index >> self.col_vars), gray_inverse(index & col_mask))
    }
}

/// One grid cell: the function value and the assignment that produced it.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Cell {
    value: bool,
    values: Vec<bool>,
}

impl Cell {
    pub fn value(&self) -> bool {
        self.value
    }

    /// Variable values, in variable order.
    pub fn values(&self) -> &[bool] {
        &self.values
    }
}

/// A wrapped rectangle of the grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Region {
    pub row: usize,
    pub col: usize,
    pub height: usize,
    pub width: usize,
}

impl Region {
    /// Row-major indices of the covered cells.
    pub fn cells(&self, layout: &KarnaughLayout) -> Vec<usize> {
        let mut cells = Vec::with_capacity(self.height * self.width);
        for dr in 0..self.height {
            for dc in 0..self.width {
                let row = (self.row + dr) % layout.rows();
                let col = (self.col + dc) % layout.cols();
                cells.push(layout.cell_index(row, col));
            }
        }
        cells
    }

    pub fn size(&self) -> usize {
        self.height * self.width
    }
}

/// A maximal target region and its clause.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PrimeImplicant {
    region: Region,
    cells: CellSet,
    clause: Clause,
}

impl PrimeImplicant {
    /// One of the rectangles covering exactly these cells.
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn cells(&self) -> &CellSet {
        &self.cells
    }

    /// Literals of the variables constant over the region.
    pub fn clause(&self) -> &Clause {
        &self.clause
    }
}

/// Karnaugh minimizer for one truth table and one target form.
#[derive(Debug, Clone)]
pub struct KarnaughMap {
    variables: Vec<String>,
    form: Form,
    layout: Option<KarnaughLayout>,
    cells: Vec<Cell>,
    error: Option<Error>,
}

impl KarnaughMap {
    pub fn new(table: &TruthTable, form: Form) -> Self {
        Self::from_rows(table.variables(), table.rows(), form)
    }

    /// Builds the grid from raw rows, in any order.
    ///
    /// Never fails: an empty row list, a variable count outside 2..=5, or rows that do
    /// not enumerate every assignment once give an invalid map.
    pub fn from_rows(variables: &[String], rows: &[Row], form: Form) -> Self {
        match Self::build(variables, rows) {
            Ok((layout, cells)) => KarnaughMap {
                variables: variables.to_vec(),
                form,
                layout: Some(layout),
                cells,
                error: None,
            },
            Err(error) => {
                warn!("Karnaugh map over {:?} is invalid: {}", variables, error);
                KarnaughMap {
                    variables: variables.to_vec(),
                    form,
                    layout: None,
                    cells: Vec::new(),
                    error: Some(error),
                }
            }
        }
    }

    fn build(variables: &[String], rows: &[Row]) -> Result<(KarnaughLayout, Vec<Cell>)> {
        if rows.is_empty() {
            return Err(Error::EmptyTruthTable);
        }
        let layout = KarnaughLayout::for_variables(variables.len())?;
        TruthTable::check_rows(variables, rows)?;

        let mut cells = vec![Cell::default(); layout.num_cells()];
        for row in rows {
            let (r, c) = layout.position(row.index());
            cells[layout.cell_index(r, c)] = Cell {
                value: row.result(),
                values: row.values().to_vec(),
            };
        }
        Ok((layout, cells))
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Why the map is invalid, if it is.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn layout(&self) -> Option<KarnaughLayout> {
        self.layout
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Cell at grid position `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        let layout = self.layout?;
        if row >= layout.rows() || col >= layout.cols() {
            return None;
        }
        self.cells.get(layout.cell_index(row, col))
    }

    fn target_cells(&self) -> CellSet {
        let capacity = self.cells.len();
        let target = self.form.target_value();
        CellSet::from_indices(
            capacity,
            self.cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.value == target)
                .map(|(index, _)| index),
        )
    }

    /// Per variable, the value shared by every cell of `cells`, if any.
    fn constant_values(&self, cells: &[usize]) -> Vec<Option<bool>> {
        let mut constant: Vec<Option<bool>> = self.cells[cells[0]].values.iter().copied().map(Some).collect();
        for &index in &cells[1..] {
            for (slot, &value) in constant.iter_mut().zip(&self.cells[index].values) {
                if *slot != Some(value) {
                    *slot = None;
                }
            }
        }
        constant
    }

    /// Distinct cells, all holding the target value, forming a subcube.
    fn is_implicant(&self, layout: &KarnaughLayout, region: &Region, targets: &CellSet) -> Option<CellSet> {
        let cells = region.cells(layout);
        let set = CellSet::from_indices(self.cells.len(), cells.iter().copied());
        if set.len() != cells.len() || !set.is_subset(targets) {
            return None;
        }
        let fixed = self.constant_values(&cells).iter().filter(|v| v.is_some()).count();
        (set.len() == 1 << (layout.num_vars() - fixed)).then_some(set)
    }

    fn clause_of(&self, cells: &CellSet) -> Clause {
        let cells: Vec<usize> = cells.iter().collect();
        self.constant_values(&cells)
            .into_iter()
            .zip(&self.variables)
            .filter_map(|(value, name)| value.map(|value| self.form.literal(name.as_str(), value)))
            .collect()
    }

    /// All prime implicants, sorted by clause.
    ///
    /// Empty for an invalid map.
    pub fn prime_implicants(&self) -> Vec<PrimeImplicant> {
        let Some(layout) = self.layout else {
            return Vec::new();
        };
        let targets = self.target_cells();
        let sides = |limit: usize| (0..).map(|k| 1usize << k).take_while(move |&side| side <= limit);

        // Valid rectangles that cannot be doubled in either direction.
        let mut candidates: Vec<(Region, CellSet)> = Vec::new();
        for height in sides(layout.rows()) {
            for width in sides(layout.cols()) {
                for row in 0..layout.rows() {
                    for col in 0..layout.cols() {
                        let region = Region { row, col, height, width };
                        let Some(cells) = self.is_implicant(&layout, &region, &targets) else {
                            continue;
                        };
                        let taller = Region { height: height * 2, ..region };
                        let wider = Region { width: width * 2, ..region };
                        let grows = (taller.height <= layout.rows()
                            && self.is_implicant(&layout, &taller, &targets).is_some())
                            || (wider.width <= layout.cols() && self.is_implicant(&layout, &wider, &targets).is_some());
                        if !grows && !candidates.iter().any(|(_, seen)| *seen == cells) {
                            candidates.push((region, cells));
                        }
                    }
                }
            }
        }

        let mut primes: Vec<PrimeImplicant> = candidates
            .iter()
            .filter(|(_, cells)| {
                !candidates
                    .iter()
                    .any(|(_, other)| other.len() > cells.len() && cells.is_subset(other))
            })
            .map(|(region, cells)| PrimeImplicant {
                region: *region,
                cells: cells.clone(),
                clause: self.clause_of(cells),
            })
            .collect();
        primes.sort_by(|a, b| a.clause.cmp(&b.clause));
        for prime in &primes {
            debug!(
                "prime implicant {:?} covering {} cell(s): {:?}",
                prime.region,
                prime.cells.len(),
                prime.clause
            );
        }
        primes
    }

    /// Selects a cover of the target cells among the prime implicants.
    ///
    /// An invalid map gives an empty result with `valid == false`.
    pub fn minimize(&self) -> Result<KarnaughMinimization> {
        if !self.is_valid() {
            warn!("minimizing an invalid Karnaugh map");
            return Ok(KarnaughMinimization {
                valid: false,
                expression: NormalForm::new(self.form, Vec::new()),
                implicants: Vec::new(),
                selection: Selection::default(),
            });
        }

        let implicants = self.prime_implicants();
        let mut coverage = CoverageMap::new(self.target_cells());
        for prime in &implicants {
            coverage.add(prime.cells.clone(), prime.clause.len());
        }
        let selection = coverage.select()?;
        let clauses = selection
            .chosen
            .iter()
            .map(|&index| implicants[index].clause.clone())
            .collect();
        let expression = NormalForm::new(self.form, clauses).sorted();
        debug!("minimize({}): {}", self.form, expression);

        Ok(KarnaughMinimization {
            valid: true,
            expression,
            implicants,
            selection,
        })
    }
}

impl fmt::Display for KarnaughMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(layout) = self.layout else {
            let reason = self.error.as_ref().map(ToString::to_string).unwrap_or_default();
            return writeln!(f, "invalid Karnaugh map: {}", reason);
        };
        let (row_names, col_names) = self.variables.split_at(layout.row_vars());
        let corner = format!("{}\\{}", row_names.concat(), col_names.concat());
        let label_width = corner.chars().count().max(layout.row_vars());
        let cell_width = layout.col_vars();

        write!(f, "{}", corner)?;
        for code in gray_sequence(layout.col_vars()) {
            write!(f, " | {}", format_bits(code, layout.col_vars()))?;
        }
        writeln!(f)?;
        for (row, code) in gray_sequence(layout.row_vars()).into_iter().enumerate() {
            write!(f, "{:<w$}", format_bits(code, layout.row_vars()), w = label_width)?;
            for col in 0..layout.cols() {
                let value = self.cells[layout.cell_index(row, col)].value as u8;
                write!(f, " | {:<w$}", value, w = cell_width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Outcome of [`KarnaughMap::minimize`].
#[derive(Debug, Clone)]
pub struct KarnaughMinimization {
    valid: bool,
    expression: NormalForm,
    implicants: Vec<PrimeImplicant>,
    selection: Selection,
}

impl KarnaughMinimization {
    /// False when the map was invalid; the expression is then meaningless.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn expression(&self) -> &NormalForm {
        &self.expression
    }

    pub fn into_expression(self) -> NormalForm {
        self.expression
    }

    /// All prime implicants of the map.
    pub fn implicants(&self) -> &[PrimeImplicant] {
        &self.implicants
    }

    /// How the cover was assembled, as indices into [`implicants`][Self::implicants].
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The implicants making up the expression.
    pub fn selected(&self) -> impl Iterator<Item = &PrimeImplicant> + '_ {
        self.selection.chosen.iter().map(|&index| &self.implicants[index])
    }
}

impl fmt::Display for KarnaughMinimization {
    /// Renders the expression, or nothing for an invalid map.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "{}", self.expression)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::formula::Formula;

    fn table(text: &str) -> TruthTable {
        Formula::parse(text).unwrap().truth_table().unwrap()
    }

    fn minimize(text: &str, form: Form) -> String {
        KarnaughMap::new(&table(text), form).minimize().unwrap().to_string()
    }

    #[test]
    fn test_layouts() {
        let shapes: Vec<(usize, usize)> = (2..=5)
            .map(|n| KarnaughLayout::for_variables(n).unwrap())
            .map(|layout| (layout.rows(), layout.cols()))
            .collect();
        assert_eq!(shapes, vec![(2, 2), (2, 4), (4, 4), (8, 4)]);
        assert_eq!(
            KarnaughLayout::for_variables(6),
            Err(Error::UnsupportedVariableCount { count: 6 })
        );
    }

    #[test]
    fn test_position_roundtrip() {
        let layout = KarnaughLayout::for_variables(5).unwrap();
        for index in 0..32 {
            let (row, col) = layout.position(index);
            assert_eq!(layout.table_index(row, col), index);
        }
        // Row 4 of the 3-bit axis is Gray code 110.
        assert_eq!(layout.position(0b110_00), (4, 0));
    }

    #[test]
    fn test_cells_store_assignments() {
        let map = KarnaughMap::new(&table("a ∧ b ∧ c"), Form::Dnf);
        // Columns bc in Gray order: 00 01 11 10
        let cell = map.cell(1, 2).unwrap();
        assert_eq!(cell.values(), &[true, true, true]);
        assert!(cell.value());
        assert!(map.cell(2, 0).is_none());
    }

    #[test]
    fn test_absorbed_term() {
        assert_eq!(minimize("a ∨ (a ∧ b)", Form::Dnf), "(a)");
        assert_eq!(minimize("a ∨ (a ∧ b)", Form::Cnf), "(a)");
    }

    #[test]
    fn test_three_variables() {
        assert_eq!(minimize("(a ∨ b) ∧ ¬c", Form::Cnf), "(a ∨ b) ∧ (¬c)");
        assert_eq!(minimize("(a ∨ b) ∧ ¬c", Form::Dnf), "(a ∧ ¬c) ∨ (b ∧ ¬c)");
    }

    #[test]
    fn test_wrapped_corners() {
        let t = table("¬b ∧ ¬d ∧ (a ∨ ¬a) ∧ (c ∨ ¬c)");
        let result = KarnaughMap::new(&t, Form::Dnf).minimize().unwrap();
        assert_eq!(result.to_string(), "(¬b ∧ ¬d)");
        let prime = result.selected().next().unwrap();
        assert_eq!(prime.cells().len(), 4);
    }

    #[test]
    fn test_five_variables() {
        let t = table("a ∧ b ∧ c ∧ d ∨ e");
        let result = KarnaughMap::new(&t, Form::Dnf).minimize().unwrap();
        assert_eq!(result.to_string(), "(a ∧ b ∧ c ∧ d) ∨ (e)");
        let sizes: Vec<usize> = result.selected().map(|p| p.cells().len()).collect();
        assert_eq!(sizes, vec![2, 16]);
    }

    #[test]
    fn test_five_variable_rows_form_subcubes() {
        // Rows 1..=4 of the 3-bit axis (001 011 010 110) are not a subcube.
        let t = table("(¬a ∧ (b ∨ c)) ∨ (a ∧ b ∧ ¬c) ∨ (d ∧ e ∧ ¬d)");
        let map = KarnaughMap::new(&t, Form::Dnf);
        for prime in map.prime_implicants() {
            let fixed = prime.clause().len();
            assert_eq!(prime.cells().len(), 1 << (5 - fixed));
        }
        let result = map.minimize().unwrap();
        let check = result.expression().truth_table(t.variables()).unwrap();
        assert!(check.equivalent(&t));
    }

    #[test]
    fn test_constant_functions() {
        assert_eq!(minimize("a ∨ ¬a ∨ b", Form::Dnf), "True");
        assert_eq!(minimize("a ∨ ¬a ∨ b", Form::Cnf), "True");
        assert_eq!(minimize("a ∧ ¬a ∧ b", Form::Dnf), "False");
        assert_eq!(minimize("a ∧ ¬a ∧ b", Form::Cnf), "False");
    }

    #[test]
    fn test_unsupported_variable_count() {
        let map = KarnaughMap::new(&table("a ∨ b ∨ c ∨ d ∨ e ∨ f"), Form::Dnf);
        assert!(!map.is_valid());
        assert_eq!(map.error(), Some(&Error::UnsupportedVariableCount { count: 6 }));
        let result = map.minimize().unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.to_string(), "");

        assert!(!KarnaughMap::new(&table("¬a"), Form::Cnf).is_valid());
    }

    #[test]
    fn test_empty_truth_table() {
        let vars: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();
        let map = KarnaughMap::from_rows(&vars, &[], Form::Cnf);
        assert_eq!(map.error(), Some(&Error::EmptyTruthTable));
        assert!(map.prime_implicants().is_empty());
    }

    #[test]
    fn test_rows_in_any_order() {
        let t = table("a → b");
        let mut rows = t.rows().to_vec();
        rows.reverse();
        let map = KarnaughMap::from_rows(t.variables(), &rows, Form::Cnf);
        assert_eq!(map.minimize().unwrap().to_string(), "(¬a ∨ b)");

        rows.pop();
        let map = KarnaughMap::from_rows(t.variables(), &rows, Form::Cnf);
        assert!(matches!(map.error(), Some(Error::InconsistentTruthTable { .. })));
    }

    #[test]
    fn test_display() {
        let map = KarnaughMap::new(&table("a ∧ b"), Form::Dnf);
        assert_eq!(map.to_string(), "a\\b | 0 | 1\n0   | 0 | 0\n1   | 0 | 1\n");
    }
}
