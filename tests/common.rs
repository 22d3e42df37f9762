//! Common test utilities for building workflow graphs and templates.
use keiro::graph::{AnswerConfig, KnowledgeConfig};
use keiro::prelude::*;
use keiro::template::{Author, Template, TemplateGraph, TemplateMetadata};

#[allow(dead_code)]
pub fn start_node(id: &str) -> Node {
    Node::new(id, "Start", Position::new(0.0, 0.0), NodeKind::Start)
}

#[allow(dead_code)]
pub fn llm_node(id: &str) -> Node {
    Node::new(
        id,
        "LLM",
        Position::new(250.0, 0.0),
        NodeKind::Llm(LlmConfig::default()),
    )
}

#[allow(dead_code)]
pub fn knowledge_node(id: &str) -> Node {
    Node::new(
        id,
        "Knowledge Retrieval",
        Position::new(250.0, 150.0),
        NodeKind::KnowledgeRetrieval(KnowledgeConfig::default()),
    )
}

#[allow(dead_code)]
pub fn end_node(id: &str) -> Node {
    Node::new(id, "End", Position::new(500.0, 0.0), NodeKind::End)
}

#[allow(dead_code)]
pub fn answer_node(id: &str) -> Node {
    Node::new(
        id,
        "Answer",
        Position::new(500.0, 150.0),
        NodeKind::Answer(AnswerConfig::default()),
    )
}

/// A minimal valid workflow: start -> llm -> end, fully wired.
#[allow(dead_code)]
pub fn simple_graph() -> (Vec<Node>, Vec<Edge>) {
    let nodes = vec![start_node("start-1"), llm_node("llm-1"), end_node("end-1")];
    let edges = vec![
        Edge::new("start-1", "llm-1").with_handles("query", "query"),
        Edge::new("llm-1", "end-1").with_handles("response", "response"),
    ];
    (nodes, edges)
}

/// A session over [`simple_graph`] with the bindings the edges imply.
#[allow(dead_code)]
pub fn simple_session() -> GraphSession {
    let (nodes, edges) = simple_graph();
    let mut session = GraphSession::with_graph(nodes, Vec::new());
    for edge in edges {
        session.add_edge(edge);
    }
    session.mark_saved();
    session
}

/// A valid publishable template wrapping [`simple_graph`].
#[allow(dead_code)]
pub fn simple_template(id: &str) -> Template {
    let (nodes, edges) = simple_graph();
    let input_schema = nodes[0].ports.outputs.clone();
    let output_schema = nodes[2].ports.inputs.clone();
    Template {
        id: id.to_string(),
        name: "Support Bot".to_string(),
        description: "Drafts a reply to the user's question".to_string(),
        version: "1.0.0".to_string(),
        created_at: "2026-01-10T09:00:00Z".to_string(),
        updated_at: "2026-01-10T09:00:00Z".to_string(),
        author: Author {
            id: "author-1".to_string(),
            name: "Test Author".to_string(),
            email: "author@example.com".to_string(),
        },
        metadata: TemplateMetadata {
            tags: vec!["support".to_string()],
            category: "assistants".to_string(),
            node_count: nodes.len(),
            edge_count: edges.len(),
            ..TemplateMetadata::default()
        },
        graph: TemplateGraph { nodes, edges },
        input_schema,
        output_schema,
        thumbnail_url: None,
    }
}
