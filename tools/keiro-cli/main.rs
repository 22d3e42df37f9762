use clap::Parser;
use keiro::prelude::*;
use keiro::template;
use serde::Deserialize;
use std::fs;
use std::process;
use std::time::Instant;

// --- JSON Deserialization Structs (Input Format Specific) ---

/// The persisted graph file shape: the node and edge arrays side by side.
#[derive(Deserialize)]
struct GraphFile {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

/// A workflow graph consistency checker and normalizer CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow graph JSON file ({"nodes": [...], "edges": [...]})
    graph_path: Option<String>,

    /// Validate a template document instead of a graph
    #[arg(short, long)]
    template: Option<String>,

    /// Print the normalized graph as JSON to stdout
    #[arg(short, long)]
    normalize: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Some(template_path) = cli.template {
        run_template_validation(&template_path);
        return;
    }

    let Some(graph_path) = cli.graph_path else {
        exit_with_error("Provide a graph file path or --template <path>");
    };
    run_graph_check(&graph_path, cli.normalize);
}

fn run_graph_check(graph_path: &str, print_normalized: bool) {
    let total_start = Instant::now();

    let graph_json = fs::read_to_string(graph_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read graph file '{}': {}", graph_path, e))
    });
    let graph: GraphFile = serde_json::from_str(&graph_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse graph JSON: {}", e)));

    println!(
        "Loaded {} nodes and {} edges from '{}'",
        graph.nodes.len(),
        graph.edges.len(),
        graph_path
    );

    let mut session = GraphSession::with_graph(graph.nodes, graph.edges);
    let normalize_start = Instant::now();
    session.normalize();
    println!("Normalization finished in {:?}", normalize_start.elapsed());

    let report = template::validate_export(session.nodes(), session.edges());
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    for error in &report.errors {
        println!("error: {}", error);
    }

    if print_normalized {
        let doc = serde_json::json!({
            "nodes": session.nodes(),
            "edges": session.edges(),
        });
        let rendered = serde_json::to_string_pretty(&doc)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
        println!("{}", rendered);
    }

    println!(
        "Checked {} nodes and {} edges in {:?}",
        report.node_count,
        report.edge_count,
        total_start.elapsed()
    );
    if !report.is_valid {
        process::exit(1);
    }
}

fn run_template_validation(template_path: &str) {
    let template_json = fs::read_to_string(template_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read template file '{}': {}",
            template_path, e
        ))
    });
    let doc: serde_json::Value = serde_json::from_str(&template_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse template JSON: {}", e)));

    if let Err(e) = template::validate_structure(&doc) {
        exit_with_error(&format!("Template structure invalid: {}", e));
    }
    let typed: Template = serde_json::from_value(doc)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to deserialize template: {}", e)));
    if let Err(e) = template::validate_rules(&typed) {
        exit_with_error(&format!("Template rejected: {}", e));
    }

    println!(
        "Template '{}' v{} is valid ({} nodes, {} edges)",
        typed.name,
        typed.version,
        typed.graph.nodes.len(),
        typed.graph.edges.len()
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
