use grammar_fa::batch::{run_batch, split_test_strings};
use grammar_fa::compile;
use std::error::Error;

/// Binary words with an even number of ones
fn main() -> Result<(), Box<dyn Error>> {
    let rules = ["S -> 0S | 1A | ε", "A -> 0A | 1S"];
    let automaton = compile(&rules, "S")?;

    println!("{}", automaton.describe());

    for verdict in run_batch(&automaton, &split_test_strings("0110, 1, 11011, , 0111")) {
        println!("{}", verdict);
    }

    Ok(())
}
