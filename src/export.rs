use std::fs;
use std::path::Path;

use log::debug;
use serde::Serialize;

use crate::automaton::Automaton;
use crate::utils::Result;

/// A state drawn as a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub initial: bool,
    pub accepting: bool,
}

/// A transition drawn as a labelled edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub label: char,
}

/// Node-link view of an automaton, sorted for stable output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Collect the states and transitions of `automaton`
    pub fn from_automaton(automaton: &Automaton) -> Self {
        let initial = automaton.initial_state();

        let mut nodes: Vec<Node> = automaton
            .states()
            .iter()
            .map(|state| Node {
                id: state.clone(),
                initial: initial == Some(state.as_str()),
                accepting: automaton.is_accepting(state),
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<Edge> = automaton
            .transitions()
            .map(|(source, label, target)| Edge {
                source: source.to_string(),
                target: target.to_string(),
                label,
            })
            .collect();
        edges.sort_by(|a, b| (&a.source, a.label).cmp(&(&b.source, b.label)));

        Graph { nodes, edges }
    }

    /// Render as a Graphviz digraph.
    ///
    /// Accepting states are double circles; an invisible `__start` node
    /// points at the initial state.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph Automaton {\n");
        dot.push_str("  rankdir=LR;\n");
        dot.push_str("  __start [shape=point, style=invis];\n");

        for node in &self.nodes {
            let shape = if node.accepting { "doublecircle" } else { "circle" };
            dot.push_str(&format!("  {} [shape={}];\n", quote(&node.id), shape));
        }
        for node in self.nodes.iter().filter(|n| n.initial) {
            dot.push_str(&format!("  __start -> {};\n", quote(&node.id)));
        }
        for edge in &self.edges {
            dot.push_str(&format!(
                "  {} -> {} [label={}];\n",
                quote(&edge.source),
                quote(&edge.target),
                quote(&edge.label.to_string())
            ));
        }

        dot.push_str("}\n");
        dot
    }

    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the DOT rendering to a file
    pub fn write_dot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("Writing automaton graph to {}", path.display());
        fs::write(path, self.to_dot())?;
        Ok(())
    }
}

/// Quote a DOT identifier, escaping quotes and backslashes
fn quote(id: &str) -> String {
    let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
