use grammar_fa::batch::{run_batch, split_test_strings};
use grammar_fa::export::Graph;
use grammar_fa::generator::Generator;
use grammar_fa::{compile, compile_with_config, Determinism, Grammar, GrammarConfig, GrammarError};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_terminal_then_nonterminal() {
    let fa = compile(&["S -> aA", "A -> b"], "S").unwrap();

    assert!(fa.accepts("ab"));
    assert!(!fa.accepts("a"));
    assert!(!fa.accepts("ba"));
    assert!(!fa.accepts(""));
}

#[test]
fn test_epsilon_rule() {
    let fa = compile(&["S -> ε"], "S").unwrap();

    assert!(fa.accepts(""));
    assert!(!fa.accepts("a"));
    assert_eq!(fa.transition_count(), 0);
    assert_eq!(fa.determinism(), Determinism::Unknown);
}

#[test]
fn test_empty_word_follows_epsilon_on_start() {
    let with_epsilon = compile(&["S -> aS | ε"], "S").unwrap();
    let without_epsilon = compile(&["S -> aS | bT", "T -> ε"], "S").unwrap();

    assert!(with_epsilon.accepts(""));
    assert!(with_epsilon.accepts("aaa"));
    assert!(!without_epsilon.accepts(""));
    assert!(without_epsilon.accepts("aab"));
}

#[test]
fn test_lone_terminals_share_sink() {
    let fa = compile(&["S -> a", "T -> a"], "S").unwrap();

    assert_eq!(fa.transition("S", 'a'), Some("accept"));
    assert_eq!(fa.transition("T", 'a'), Some("accept"));
    assert!(fa.accepts("a"));
    assert_eq!(fa.accept_states().len(), 1);
}

#[test]
fn test_sink_name_clash_over_accepts() {
    // A user non-terminal named like the sink merges with it
    let fa = compile(&["S -> a", "accept -> b"], "S").unwrap();

    assert!(fa.accepts("a"));
    assert!(fa.accepts("ab"));

    // Renaming the sink keeps the two apart
    let config = GrammarConfig {
        sink_state: "#sink".to_string(),
        ..GrammarConfig::default()
    };
    let fa = Grammar::parse("S -> a\naccept -> b", "S", config).unwrap().compile();
    assert!(fa.accepts("a"));
    assert!(!fa.accepts("ab"));
}

#[test]
fn test_malformed_rule() {
    let err = compile(&["S -> aA", "S a A"], "S").unwrap_err();

    match err {
        GrammarError::Syntax { line, ref rule, .. } => {
            assert_eq!(line, 2);
            assert_eq!(rule, "S a A");
        }
        ref other => panic!("Expected syntax error, got {:?}", other),
    }
    assert!(err.to_string().contains("S a A"));
}

#[test]
fn test_empty_epsilon_marker_rejected() {
    let config = GrammarConfig {
        epsilon_marker: String::new(),
        ..GrammarConfig::default()
    };
    let result = compile_with_config(&["S -> a |"], "S", config);

    assert!(matches!(result, Err(GrammarError::InvalidConfig(_))));
}

#[test]
fn test_duplicate_separator() {
    let err = compile(&["S -> a -> b"], "S").unwrap_err();
    assert_eq!(err.rule(), Some("S -> a -> b"));
}

#[test]
fn test_collision_keeps_first_target() {
    let fa = compile(&["S -> aA | aB", "A -> b", "B -> c"], "S").unwrap();

    assert_eq!(fa.determinism(), Determinism::NonDeterministic);
    assert!(!fa.is_deterministic());
    assert!(fa.accepts("ab"));
    // The second target was discarded
    assert!(!fa.accepts("ac"));
}

#[test]
fn test_collision_across_rules() {
    let fa = compile(&["S -> aA", "S -> a"], "S").unwrap();

    assert!(!fa.is_deterministic());
    assert_eq!(fa.transition("S", 'a'), Some("A"));
    assert!(!fa.accepts("a"));
}

#[test]
fn test_no_collision_is_deterministic() {
    let fa = compile(&["S -> aA | bB", "A -> a", "B -> b"], "S").unwrap();
    assert_eq!(fa.determinism(), Determinism::Deterministic);
}

#[test]
fn test_describe_has_one_line_per_transition() {
    let fa = compile(&["S -> aA | bS | aS", "A -> b | ε"], "S").unwrap();
    let text = fa.describe();

    let lines: HashSet<&str> = text.lines().filter(|l| l.contains(" --> ")).collect();
    let expected: HashSet<&str> = ["S -- a --> A", "S -- b --> S", "A -- b --> accept"]
        .into_iter()
        .collect();

    assert_eq!(lines, expected);
    assert!(text.contains("Deterministic: false"));
    assert!(text.contains("Initial state: S"));
    assert!(text.contains("Accept states: {A, accept}"));
}

#[test]
fn test_compilation_is_idempotent() {
    let rules = ["S -> 0S | 1A | ε", "A -> 0A | 1S"];
    let first = compile(&rules, "S").unwrap();
    let second = compile(&rules, "S").unwrap();

    for word in ["", "0", "1", "11", "101", "0110", "111", "1001"] {
        assert_eq!(first.accepts(word), second.accepts(word), "word {:?}", word);
    }
    assert_eq!(first.describe(), second.describe());
}

#[test]
fn test_even_number_of_ones() {
    let fa = compile(&["S -> 0S | 1A | ε", "A -> 0A | 1S"], "S").unwrap();

    assert!(fa.accepts(""));
    assert!(fa.accepts("0110"));
    assert!(fa.accepts("11011"));
    assert!(!fa.accepts("1"));
    assert!(!fa.accepts("0111"));
    assert!(!fa.accepts("012"));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "S -> aS | bA").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "A -> b | ε").unwrap();

    let grammar = Grammar::from_file(file.path(), "S", GrammarConfig::default()).unwrap();
    assert_eq!(grammar.rules().len(), 2);
    assert!(grammar.has_non_terminal("A"));

    let fa = grammar.compile();
    assert!(fa.accepts("aab"));
    assert!(fa.accepts("abb"));
    assert!(!fa.accepts("ba"));
}

#[test]
fn test_load_missing_file() {
    let result = Grammar::from_file("/nonexistent/grammar.txt", "S", GrammarConfig::default());
    assert!(matches!(result, Err(GrammarError::Io(_))));
}

#[test]
fn test_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"epsilon_marker": "eps", "sink_state": "F"}}"#).unwrap();

    let config = GrammarConfig::from_json_file(file.path()).unwrap();
    let grammar = Grammar::parse("S -> a | bS | eps", "S", config).unwrap();
    let fa = grammar.compile();

    assert!(fa.accepts(""));
    assert!(fa.accepts("bba"));
    assert_eq!(fa.transition("S", 'a'), Some("F"));
}

#[test]
fn test_batch_report() {
    let fa = compile(&["S -> aA", "A -> b"], "S").unwrap();
    let report: Vec<String> = run_batch(&fa, &split_test_strings("ab,ba, a ,"))
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        report,
        vec![
            "'ab' -> Accepted",
            "'ba' -> Rejected",
            "'a' -> Rejected",
            "'' -> Rejected",
        ]
    );
}

#[test]
fn test_export_dot_has_edge_per_transition() {
    let fa = compile(&["S -> 0S | 1A | ε", "A -> 0A | 1S"], "S").unwrap();
    let dot = Graph::from_automaton(&fa).to_dot();

    let edge_lines = dot.lines().filter(|l| l.contains("[label=")).count();
    assert_eq!(edge_lines, fa.transition_count());
    assert!(dot.contains("__start -> \"S\";"));
    assert!(dot.contains("\"S\" [shape=doublecircle];"));
}

#[test]
fn test_generated_words_are_accepted() {
    let fa = compile(&["S -> 0S | 1A | ε", "A -> 0A | 1S"], "S").unwrap();
    let words = Generator::new(&fa, 12).samples(10);

    assert!(!words.is_empty());
    for word in &words {
        assert!(fa.accepts(word), "generated {:?} is rejected", word);
    }
}
