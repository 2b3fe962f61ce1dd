use grammar_fa::export::Graph;
use grammar_fa::generator::Generator;
use grammar_fa::{GrammarBuilder, GrammarConfig};
use std::error::Error;

/// Builds identifiers of the form `x`, `xy`, `xyy`, ... with a custom
/// epsilon marker and sink name, then prints samples and a DOT diagram.
fn main() -> Result<(), Box<dyn Error>> {
    let config = GrammarConfig {
        epsilon_marker: "eps".to_string(),
        sink_state: "done".to_string(),
        max_word_length: 10,
    };

    let grammar = GrammarBuilder::new("Id")
        .config(config)
        .alternatives("Id", &["xTail"])
        .alternatives("Tail", &["yTail", "eps"])
        .build()?;
    let automaton = grammar.compile();

    println!("Deterministic: {}", automaton.determinism());
    println!("\nSample words:");
    for (i, word) in Generator::new(&automaton, grammar.config().max_word_length)
        .samples(5)
        .iter()
        .enumerate()
    {
        println!("{}. {}", i + 1, word);
    }

    println!("\n{}", Graph::from_automaton(&automaton).to_dot());
    Ok(())
}
