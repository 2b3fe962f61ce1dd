use clap::{Parser, Subcommand, ValueEnum};
use grammar_fa::batch::{run_batch, split_test_strings};
use grammar_fa::export::Graph;
use grammar_fa::generator::Generator;
use grammar_fa::{Automaton, Grammar, GrammarConfig};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Right-regular grammar to finite automaton simulator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration (epsilon marker, sink state name, word length limit)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test comma-separated strings against the grammar
    Test {
        #[arg(help = "Path to the grammar file, one rule per line")]
        grammar_file: PathBuf,

        #[arg(help = "Start symbol")]
        start_symbol: String,

        #[arg(help = "Strings to test, separated by commas")]
        strings: String,

        /// Print the frontier after every symbol
        #[arg(long)]
        trace: bool,
    },

    /// Print the states, alphabet and transitions of the automaton
    Describe {
        #[arg(help = "Path to the grammar file, one rule per line")]
        grammar_file: PathBuf,

        #[arg(help = "Start symbol")]
        start_symbol: String,
    },

    /// Export the automaton as a node-link diagram
    Export {
        #[arg(help = "Path to the grammar file, one rule per line")]
        grammar_file: PathBuf,

        #[arg(help = "Start symbol")]
        start_symbol: String,

        #[arg(long, value_enum, default_value = "dot")]
        format: Format,

        /// Output file path; prints to stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate random words accepted by the automaton
    Generate {
        #[arg(help = "Path to the grammar file, one rule per line")]
        grammar_file: PathBuf,

        #[arg(help = "Start symbol")]
        start_symbol: String,

        #[arg(long, default_value = "5")]
        count: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Dot,
    Json,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GrammarConfig::from_json_file(path)?,
        None => GrammarConfig::default(),
    };

    match cli.command {
        Commands::Test {
            grammar_file,
            start_symbol,
            strings,
            trace,
        } => {
            let automaton = load(&grammar_file, &start_symbol, config)?;
            if strings.trim().is_empty() {
                return Err("Test strings required".into());
            }

            let words = split_test_strings(&strings);
            for verdict in run_batch(&automaton, &words) {
                println!("{}", verdict);
                if trace {
                    for (i, frontier) in automaton.trace(&verdict.word).iter().enumerate() {
                        let states: Vec<&str> = frontier.iter().map(String::as_str).collect();
                        println!("    {}: {{{}}}", i, states.join(", "));
                    }
                }
            }
        }
        Commands::Describe {
            grammar_file,
            start_symbol,
        } => {
            let automaton = load(&grammar_file, &start_symbol, config)?;
            print!("{}", automaton.describe());
        }
        Commands::Export {
            grammar_file,
            start_symbol,
            format,
            output,
        } => {
            let automaton = load(&grammar_file, &start_symbol, config)?;
            let graph = Graph::from_automaton(&automaton);
            let rendered = match format {
                Format::Dot => graph.to_dot(),
                Format::Json => graph.to_json()?,
            };

            match output {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    println!("Wrote automaton graph to: {}", path.display());
                }
                None => print!("{}", rendered),
            }
        }
        Commands::Generate {
            grammar_file,
            start_symbol,
            count,
        } => {
            let max_length = config.max_word_length;
            let automaton = load(&grammar_file, &start_symbol, config)?;
            let words = Generator::new(&automaton, max_length).samples(count);

            if words.is_empty() {
                println!("No accepted words found within {} symbols.", max_length);
            }
            for (i, word) in words.iter().enumerate() {
                println!("{}. '{}'", i + 1, word);
            }
        }
    }

    Ok(())
}

fn load(
    grammar_file: &Path,
    start_symbol: &str,
    config: GrammarConfig,
) -> Result<Automaton, Box<dyn std::error::Error>> {
    let start_symbol = start_symbol.trim();
    if start_symbol.is_empty() {
        return Err("Start symbol required".into());
    }

    let grammar = Grammar::from_file(grammar_file, start_symbol, config)?;
    if grammar.rules().is_empty() {
        return Err(format!("No rules found in {}", grammar_file.display()).into());
    }
    info!(
        "Loaded {} rules from {}",
        grammar.rules().len(),
        grammar_file.display()
    );

    Ok(grammar.compile())
}
