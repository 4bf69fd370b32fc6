use clap::Parser;

use boolnf::consensus::ConsensusReducer;
use boolnf::formula::Formula;
use boolnf::karnaugh::KarnaughMap;
use boolnf::tabular::TabularMinimizer;
use boolnf::types::Form;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Formula to minimize, e.g. "a ∧ b ∧ c ∧ d ∨ e" or "(a | b) & !c".
    #[arg(value_name = "FORMULA", default_value = "a∧b∧c∧d∨e")]
    formula: String,

    /// Print the consensus reduction rounds.
    #[clap(long)]
    trace: bool,

    /// Print the Karnaugh maps.
    #[clap(long)]
    maps: bool,

    /// Print the prime implicant coverage matrices.
    #[clap(long)]
    matrix: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let formula = Formula::parse(&args.formula)?;
    println!("variables = {:?}", formula.variables());

    let table = formula.truth_table()?;
    println!("\nTruth table:\n{}", table);
    println!("Canonical DNF: {}", table.canonical_dnf());
    println!("Canonical CNF: {}", table.canonical_cnf());
    println!("Numeric forms:\n{}", table.numeric_forms());
    println!("Index form: {} ({})", table.index_form(), table.index_form_bits());

    for form in [Form::Cnf, Form::Dnf] {
        println!("\n=== {} ===", form);

        let reduction = ConsensusReducer::from_truth_table(&table, form).reduce();
        if args.trace {
            println!("{}", reduction);
        }
        println!("Consensus: {}", reduction.result());

        let tabular = TabularMinimizer::from_truth_table(&table, form);
        if args.matrix {
            print!("{}", tabular.coverage_matrix());
        }
        println!("Tabular:   {}", tabular.minimize()?);

        let map = KarnaughMap::new(&table, form);
        if args.maps {
            print!("{}", map);
        }
        let karnaugh = map.minimize()?;
        if karnaugh.is_valid() {
            println!("Karnaugh:  {}", karnaugh);
        } else if let Some(error) = map.error() {
            println!("Karnaugh:  skipped ({})", error);
        }
    }

    println!("\nAll done in {:.3} s", time_total.elapsed().as_secs_f64());

    Ok(())
}
