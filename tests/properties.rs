use boolnf::consensus::ConsensusReducer;
use boolnf::error::{Error, Malformed};
use boolnf::formula::Formula;
use boolnf::karnaugh::{KarnaughLayout, KarnaughMap};
use boolnf::normal_form::NormalForm;
use boolnf::tabular::TabularMinimizer;
use boolnf::truth_table::TruthTable;
use boolnf::types::Form;

use test_log::test;

/// Formulas over 0 to 5 variables.
const CORPUS: &[&str] = &[
    "1",
    "0 ∨ ¬1",
    "a",
    "¬a",
    "a ∧ b",
    "a ∨ b",
    "a → b",
    "a ↔ b",
    "¬(a ∧ b) ∨ ¬a",
    "(a ∨ b) ∧ ¬c",
    "a ∧ (b ∨ c) → ¬a ∧ c",
    "(a ↔ b) ↔ c",
    "(a & b) | (!a & c) | (b & c)",
    "(a ∨ b) ∧ (c ∨ d) ∧ ¬(a ∧ d)",
    "a ↔ b ∧ c ∨ d",
    "¬b ∧ ¬d ∨ a ∧ c",
    "a ∧ b ∧ c ∧ d ∨ e",
    "(a → b) ∧ (c → d) ∧ (e ∨ ¬a)",
    "(a ↔ b) ∨ (c ↔ d) ∨ ¬e",
    "(a ∨ b ∨ c) ∧ (¬a ∨ d) ∧ (b ∨ ¬e) ∧ (c ↔ e)",
];

fn table(text: &str) -> TruthTable {
    Formula::parse(text).unwrap().truth_table().unwrap()
}

fn agrees(form: &NormalForm, table: &TruthTable) -> bool {
    form.truth_table(table.variables()).unwrap().equivalent(table)
}

#[test]
fn test_rows_enumerate_every_assignment_once() {
    for text in CORPUS {
        let t = table(text);
        assert_eq!(t.len(), 1 << t.num_vars(), "{}", text);
        for (i, row) in t.rows().iter().enumerate() {
            assert_eq!(row.index(), i, "{}", text);
        }
    }
}

#[test]
fn test_canonical_forms_agree_with_formula() {
    for text in CORPUS {
        let t = table(text);
        assert!(agrees(&t.canonical_dnf(), &t), "DNF of {}", text);
        assert!(agrees(&t.canonical_cnf(), &t), "CNF of {}", text);
    }
}

#[test]
fn test_canonical_forms_read_back() {
    for text in CORPUS {
        let t = table(text);
        for form in [Form::Cnf, Form::Dnf] {
            let canonical = t.canonical(form);
            let parsed = NormalForm::parse(form, &canonical.to_string()).unwrap();
            assert!(agrees(&parsed, &t), "{} {} did not read back", form, text);
        }
    }
}

#[test]
fn test_consensus_agrees_and_is_idempotent() {
    for text in CORPUS {
        let t = table(text);
        for form in [Form::Cnf, Form::Dnf] {
            let reduced = ConsensusReducer::from_truth_table(&t, form).minimize();
            assert!(agrees(&reduced, &t), "{} of {}: {}", form, text, reduced);
            let again = ConsensusReducer::new(reduced.clone()).minimize();
            assert_eq!(again, reduced, "{} of {}", form, text);
        }
    }
}

#[test]
fn test_karnaugh_agrees_and_shrinks() {
    for text in CORPUS {
        let t = table(text);
        let supported = KarnaughLayout::for_variables(t.num_vars()).is_ok();
        for form in [Form::Cnf, Form::Dnf] {
            let result = KarnaughMap::new(&t, form).minimize().unwrap();
            assert_eq!(result.is_valid(), supported, "{}", text);
            if !supported {
                continue;
            }
            let minimized = result.expression();
            assert!(agrees(minimized, &t), "{} of {}: {}", form, text, minimized);
            assert!(
                minimized.literal_count() <= t.canonical(form).literal_count(),
                "{} of {}: {}",
                form,
                text,
                minimized
            );
        }
    }
}

#[test]
fn test_tabular_agrees_and_shrinks() {
    for text in CORPUS {
        let t = table(text);
        for form in [Form::Cnf, Form::Dnf] {
            let minimized = TabularMinimizer::from_truth_table(&t, form).minimize().unwrap();
            assert!(agrees(&minimized, &t), "{} of {}: {}", form, text, minimized);
            assert!(minimized.literal_count() <= t.canonical(form).literal_count());
        }
    }
}

#[test]
fn test_karnaugh_and_tabular_agree_on_size() {
    // Up to 4 variables every subcube is a rectangle, so both see the same primes.
    for text in CORPUS {
        let t = table(text);
        if !(2..=4).contains(&t.num_vars()) {
            continue;
        }
        for form in [Form::Cnf, Form::Dnf] {
            let karnaugh = KarnaughMap::new(&t, form).minimize().unwrap();
            let primes = TabularMinimizer::from_truth_table(&t, form).prime_implicants();
            assert_eq!(karnaugh.implicants().len(), primes.len(), "{} of {}", form, text);
        }
    }
}

#[test]
fn test_scenario_and() {
    let t = table("a ∧ b");
    assert_eq!(t.results(), vec![false, false, false, true]);
    assert_eq!(t.canonical_dnf().to_string(), "(a ∧ b)");
    assert_eq!(t.canonical_cnf().to_string(), "(a ∨ b) ∧ (a ∨ ¬b) ∧ (¬a ∨ b)");
}

#[test]
fn test_scenario_or() {
    let t = table("a ∨ b");
    assert_eq!(ConsensusReducer::from_truth_table(&t, Form::Cnf).minimize().to_string(), "(a ∨ b)");
    assert_eq!(
        KarnaughMap::new(&t, Form::Cnf).minimize().unwrap().to_string(),
        "(a ∨ b)"
    );
}

#[test]
fn test_scenario_implication() {
    // (a, b) = (0,0), (0,1), (1,0), (1,1)
    assert_eq!(table("a → b").results(), vec![true, true, false, true]);
}

#[test]
fn test_scenario_five_variables() {
    let t = table("a ∧ b ∧ c ∧ d ∨ e");
    let result = KarnaughMap::new(&t, Form::Dnf).minimize().unwrap();
    assert_eq!(result.to_string(), "(a ∧ b ∧ c ∧ d) ∨ (e)");
    assert!(result.selected().any(|p| p.cells().len() == 16));
}

#[test]
fn test_scenario_consensus_merge() {
    let reducer = ConsensusReducer::parse(Form::Cnf, "(a ∨ b) ∧ (a ∨ ¬b)").unwrap();
    assert_eq!(reducer.minimize().to_string(), "(a)");
}

#[test]
fn test_errors_reach_the_caller() {
    assert_eq!(
        Formula::parse("(a ∧ b").unwrap_err(),
        Error::MalformedExpression {
            reason: Malformed::UnbalancedOpen
        }
    );
    let f = Formula::parse("a ∨ z").unwrap();
    let empty = boolnf::types::Assignment::new();
    assert_eq!(
        f.evaluate(&empty).unwrap_err().to_string(),
        "undefined variable(s): a, z"
    );
}
