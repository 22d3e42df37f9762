//! End-to-end tests: build a workflow through the session, publish it as a
//! template, and import it into a second workflow.
mod common;

use common::*;
use keiro::error::RemoteValidationError;
use keiro::history::History;
use keiro::prelude::*;
use keiro::remote::{classify, RemoteValidationReport, RemoteValidator, ValidationStatus};
use keiro::template::{
    self, materialize_template, validate_export, Author, TemplateGraph, TemplateMetadata,
};

#[test]
fn test_build_publish_import_round_trip() {
    // Build: start -> knowledge -> llm -> end, wired through connect so
    // every step is validated and bindings are synthesized.
    let mut session = GraphSession::new();
    session.add_node(start_node("start-1"));
    session.add_node(knowledge_node("kb-1"));
    session.add_node(llm_node("llm-1"));
    session.add_node(end_node("end-1"));

    session
        .connect("start-1", Some("query"), "kb-1", Some("query"))
        .unwrap();
    session
        .connect("kb-1", Some("context"), "llm-1", Some("context"))
        .unwrap();
    session
        .connect("llm-1", Some("response"), "end-1", Some("response"))
        .unwrap();

    let llm = session.node("llm-1").unwrap();
    assert_eq!(
        llm.variable_mappings.get("context").unwrap().source.variable,
        "kb-1.context"
    );

    // Publish: the export check passes and derives both schemas.
    let report = validate_export(session.nodes(), session.edges());
    assert!(report.is_valid, "errors: {:?}", report.errors);

    let template = template::Template {
        id: "tpl-rag".to_string(),
        name: "RAG Assistant".to_string(),
        description: String::new(),
        version: "1.0.0".to_string(),
        created_at: "2026-02-01T12:00:00Z".to_string(),
        updated_at: "2026-02-01T12:00:00Z".to_string(),
        author: Author::default(),
        metadata: TemplateMetadata {
            node_count: report.node_count,
            edge_count: report.edge_count,
            ..TemplateMetadata::default()
        },
        graph: TemplateGraph {
            nodes: session.nodes().to_vec(),
            edges: session.edges().to_vec(),
        },
        input_schema: report.detected_input_ports.clone(),
        output_schema: report.detected_output_ports.clone(),
        thumbnail_url: None,
    };
    let doc = serde_json::to_value(&template).unwrap();
    assert_eq!(template::validate_structure(&doc), Ok(()));

    // Import into a fresh workflow, expanded.
    let imported =
        materialize_template(&template, "imp-1", Position::new(400.0, 0.0), true).unwrap();
    let mut other = GraphSession::new();
    other.add_node(start_node("start-1"));
    for node in imported.nodes {
        other.add_node(node);
    }
    for edge in imported.edges {
        other.add_edge(edge);
    }

    assert!(other.node("imp-1").is_some());
    let inner_llm = other.node("imp-1_llm-1").unwrap();
    assert!(!inner_llm.flags.deletable);
    assert_eq!(
        other
            .edge("edge-imp-1_kb-1-imp-1_llm-1")
            .unwrap()
            .target_handle
            .as_deref(),
        Some("context")
    );
}

#[test]
fn test_session_history_snapshot_isolation() {
    let mut session = simple_session();
    let mut history = History::new();
    history.push(session.nodes(), session.edges());

    // Mutating the live graph must not leak into the stored snapshot.
    session.delete_node("llm-1");
    assert_eq!(session.nodes().len(), 2);

    let snapshot = history.present().unwrap();
    assert_eq!(snapshot.nodes.len(), 3);
    assert_eq!(snapshot.edges.len(), 2);

    // Restoring the snapshot brings the bindings back too.
    let mut restored = GraphSession::with_graph(snapshot.nodes.clone(), snapshot.edges.clone());
    restored.normalize();
    let end = restored.node("end-1").unwrap();
    assert_eq!(
        end.variable_mappings.get("response").unwrap().source.variable,
        "llm-1.response"
    );
}

#[test]
fn test_normalize_after_load_repairs_persisted_graph() {
    // A persisted document with a legacy handle, a duplicate edge, and no
    // bindings comes out of one normalize call fully reconciled.
    let doc = serde_json::json!({
        "nodes": [
            { "id": "start-1", "kind": "start", "title": "Start",
              "position": { "x": 0.0, "y": 0.0 },
              "ports": { "inputs": [], "outputs": [
                  { "name": "query", "type": "string", "required": true }
              ] } },
            { "id": "llm-1", "kind": "llm", "title": "LLM",
              "position": { "x": 250.0, "y": 0.0 },
              "ports": { "inputs": [
                  { "name": "query", "type": "string", "required": true }
              ], "outputs": [
                  { "name": "response", "type": "string", "required": true }
              ] } }
        ],
        "edges": [
            { "id": "uuid-1", "source": "start-1", "target": "llm-1",
              "sourceHandle": "source", "targetHandle": "target" },
            { "id": "uuid-2", "source": "start-1", "target": "llm-1" }
        ]
    });
    let nodes: Vec<Node> = serde_json::from_value(doc["nodes"].clone()).unwrap();
    let edges: Vec<Edge> = serde_json::from_value(doc["edges"].clone()).unwrap();

    let mut session = GraphSession::with_graph(nodes, edges);
    session.normalize();

    assert_eq!(session.edges().len(), 1);
    let edge = &session.edges()[0];
    assert_eq!(edge.id, "edge-start-1-llm-1");
    assert_eq!(edge.source_handle.as_deref(), Some("query"));
    let llm = session.node("llm-1").unwrap();
    assert_eq!(
        llm.variable_mappings.get("query").unwrap().source.variable,
        "start-1.query"
    );
}

struct FixedValidator(Result<RemoteValidationReport, RemoteValidationError>);

impl RemoteValidator for FixedValidator {
    fn validate(
        &self,
        _nodes: &[Node],
        _edges: &[Edge],
    ) -> Result<RemoteValidationReport, RemoteValidationError> {
        self.0.clone()
    }
}

#[test]
fn test_remote_outcomes_classify_three_ways() {
    let session = simple_session();

    let valid = FixedValidator(Ok(RemoteValidationReport {
        is_valid: true,
        ..RemoteValidationReport::default()
    }));
    assert_eq!(
        classify(valid.validate(session.nodes(), session.edges())),
        ValidationStatus::Valid
    );

    let invalid = FixedValidator(Ok(RemoteValidationReport {
        is_valid: false,
        errors: vec!["cycle detected".to_string()],
        ..RemoteValidationReport::default()
    }));
    assert_eq!(
        classify(invalid.validate(session.nodes(), session.edges())),
        ValidationStatus::Invalid(vec!["cycle detected".to_string()])
    );

    let down = FixedValidator(Err(RemoteValidationError::Unavailable(
        "connection refused".to_string(),
    )));
    let status = classify(down.validate(session.nodes(), session.edges()));
    assert_eq!(status, ValidationStatus::Unknown);
    assert!(!status.is_valid(), "a transport failure is never a pass");
}
