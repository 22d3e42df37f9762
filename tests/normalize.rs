//! Tests for the load-time graph normalizer.
mod common;

use common::*;
use keiro::normalize::normalize_graph;
use keiro::prelude::*;

#[test]
fn test_normalization_is_idempotent() {
    let (mut nodes, mut edges) = simple_graph();
    normalize_graph(&mut nodes, &mut edges);
    let (once_nodes, once_edges) = (nodes.clone(), edges.clone());
    normalize_graph(&mut nodes, &mut edges);
    assert_eq!(nodes, once_nodes);
    assert_eq!(edges, once_edges);
}

#[test]
fn test_legacy_binding_keys_are_renamed() {
    let (mut nodes, mut edges) = simple_graph();
    // A pre-migration graph stored the end node's input as "answer".
    let end = nodes.iter_mut().find(|n| n.id == "end-1").unwrap();
    end.variable_mappings.insert(
        "answer".to_string(),
        Binding::new(
            "answer",
            ValueSelector::node("llm-1", "response", PortType::String),
        ),
    );

    normalize_graph(&mut nodes, &mut edges);

    let end = nodes.iter().find(|n| n.id == "end-1").unwrap();
    assert!(!end.variable_mappings.contains_key("answer"));
    let binding = end.variable_mappings.get("response").unwrap();
    assert_eq!(binding.target_port, "response");
}

#[test]
fn test_legacy_selector_ports_are_renamed() {
    let (mut nodes, mut edges) = simple_graph();
    let end = nodes.iter_mut().find(|n| n.id == "end-1").unwrap();
    // "completion" was the llm output's name before the migration.
    end.variable_mappings.insert(
        "response".to_string(),
        Binding::new(
            "response",
            ValueSelector::node("llm-1", "completion", PortType::String),
        ),
    );

    normalize_graph(&mut nodes, &mut edges);

    let end = nodes.iter().find(|n| n.id == "end-1").unwrap();
    let binding = end.variable_mappings.get("response").unwrap();
    assert_eq!(binding.source.variable, "llm-1.response");
}

#[test]
fn test_placeholder_handles_snap_to_preferred_ports() {
    let (mut nodes, mut edges) = simple_graph();
    edges[0] = Edge::new("start-1", "llm-1").with_handles("source", "target");

    normalize_graph(&mut nodes, &mut edges);

    let edge = &edges[0];
    assert_eq!(edge.source_handle.as_deref(), Some("query"));
    assert_eq!(edge.target_handle.as_deref(), Some("query"));
}

#[test]
fn test_duplicate_edges_collapse_onto_canonical_id() {
    let (mut nodes, mut edges) = simple_graph();
    edges.push(Edge {
        id: "a-duplicate-with-random-id".to_string(),
        ..Edge::new("start-1", "llm-1")
    });

    normalize_graph(&mut nodes, &mut edges);

    let between: Vec<&Edge> = edges
        .iter()
        .filter(|e| e.source == "start-1" && e.target == "llm-1")
        .collect();
    assert_eq!(between.len(), 1);
    assert_eq!(between[0].id, "edge-start-1-llm-1");
    // Handles from the first record survive the merge.
    assert_eq!(between[0].source_handle.as_deref(), Some("query"));
}

#[test]
fn test_duplicate_collapse_fills_missing_metadata() {
    // The first record carries no metadata; a later duplicate does.
    let (mut nodes, mut edges) = simple_graph();
    edges.push(
        Edge {
            id: "a-duplicate-with-random-id".to_string(),
            ..Edge::new("start-1", "llm-1")
        }
        .with_metadata("start", "llm"),
    );

    normalize_graph(&mut nodes, &mut edges);

    let edge = edges
        .iter()
        .find(|e| e.source == "start-1" && e.target == "llm-1")
        .unwrap();
    assert_eq!(edge.metadata.source_type, "start");
    assert_eq!(edge.metadata.target_type, "llm");
}

#[test]
fn test_bindings_synthesized_for_bare_edges() {
    // An old graph carries edges but no variable mappings at all.
    let (mut nodes, mut edges) = simple_graph();
    for node in &mut nodes {
        node.variable_mappings.clear();
    }

    normalize_graph(&mut nodes, &mut edges);

    let llm = nodes.iter().find(|n| n.id == "llm-1").unwrap();
    let binding = llm.variable_mappings.get("query").unwrap();
    assert_eq!(binding.source.variable, "start-1.query");
    let end = nodes.iter().find(|n| n.id == "end-1").unwrap();
    assert!(end.variable_mappings.contains_key("response"));
}

#[test]
fn test_edges_materialized_for_unbacked_bindings() {
    let (mut nodes, mut edges) = simple_graph();
    // A binding reads the knowledge node, but the edge was lost.
    nodes.push(knowledge_node("kb-1"));
    let llm = nodes.iter_mut().find(|n| n.id == "llm-1").unwrap();
    llm.variable_mappings.insert(
        "context".to_string(),
        Binding::new(
            "context",
            ValueSelector::node("kb-1", "context", PortType::String),
        ),
    );

    normalize_graph(&mut nodes, &mut edges);

    let edge = edges
        .iter()
        .find(|e| e.source == "kb-1" && e.target == "llm-1")
        .expect("edge materialized from the binding");
    assert_eq!(edge.id, "edge-kb-1-llm-1");
    assert_eq!(edge.source_handle.as_deref(), Some("context"));
    assert_eq!(edge.target_handle.as_deref(), Some("context"));
    assert_eq!(edge.metadata.source_type, "knowledge-retrieval");
}

#[test]
fn test_long_range_start_bindings_stay_edgeless() {
    let (mut nodes, mut edges) = simple_graph();
    // The end node reads the start node's query directly, two hops away.
    let end = nodes.iter_mut().find(|n| n.id == "end-1").unwrap();
    end.variable_mappings.insert(
        "response".to_string(),
        Binding::new(
            "response",
            ValueSelector::node("start-1", "query", PortType::String),
        ),
    );

    normalize_graph(&mut nodes, &mut edges);

    assert!(
        !edges.iter().any(|e| e.source == "start-1" && e.target == "end-1"),
        "a start node two hops upstream must not gain a direct edge"
    );
    let end = nodes.iter().find(|n| n.id == "end-1").unwrap();
    assert!(
        end.variable_mappings.contains_key("response"),
        "the binding itself is kept"
    );
}

#[test]
fn test_non_start_unbacked_binding_always_materializes() {
    let (mut nodes, mut edges) = simple_graph();
    nodes.push(answer_node("answer-1"));
    let answer = nodes.iter_mut().find(|n| n.id == "answer-1").unwrap();
    answer.variable_mappings.insert(
        "response".to_string(),
        Binding::new(
            "response",
            ValueSelector::node("llm-1", "response", PortType::String),
        ),
    );

    normalize_graph(&mut nodes, &mut edges);

    assert!(edges
        .iter()
        .any(|e| e.source == "llm-1" && e.target == "answer-1"));
}

#[test]
fn test_dynamic_ports_regenerate_on_load() {
    use keiro::graph::{AssignerConfig, AssignerOperation, OperationInput, WriteMode};

    let mut assigner = Node::new(
        "assigner-1",
        "Assigner",
        Position::new(0.0, 0.0),
        NodeKind::Assigner(AssignerConfig::default()),
    );
    // Simulate a stored node whose config gained an operation while the
    // persisted ports stayed empty.
    if let NodeKind::Assigner(config) = &mut assigner.kind {
        config.operations.push(AssignerOperation {
            write_mode: WriteMode::Overwrite,
            input_type: OperationInput::Constant,
            constant_value: Some(serde_json::json!(1)),
            target_variable: Some("conv.counter".to_string()),
            source_variable: None,
        });
    }
    assigner.ports = PortSchema::default();

    let mut nodes = vec![assigner];
    let mut edges = Vec::new();
    normalize_graph(&mut nodes, &mut edges);

    assert_eq!(nodes[0].ports.inputs[0].name, "operation_0_target");
}
