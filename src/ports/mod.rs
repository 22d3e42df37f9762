//! Pure, deterministic port schema generation.
//!
//! Dynamic kinds (if-else, question-classifier, assigner, variable-aggregator)
//! compute their schema from configuration; the remaining kinds carry a fixed
//! default scaffold. Identical configurations always yield structurally equal
//! schemas.

mod aggregator;
mod assigner;
mod branch;
mod classifier;

pub use branch::default_branch_case;
pub use classifier::default_classes;

use crate::graph::{NodeKind, PortDefinition, PortSchema, PortType};

/// Schema for a dynamic-schema kind, `None` for kinds whose ports are not a
/// function of configuration.
pub fn generate(kind: &NodeKind) -> Option<PortSchema> {
    match kind {
        NodeKind::IfElse(config) => Some(branch::generate(config)),
        NodeKind::QuestionClassifier(config) => Some(classifier::generate(config)),
        NodeKind::Assigner(config) => Some(assigner::generate(config)),
        NodeKind::VariableAggregator(config) => Some(aggregator::generate(config)),
        _ => None,
    }
}

/// The initial schema for a freshly created node of any kind.
pub fn schema_for(kind: &NodeKind) -> PortSchema {
    if let Some(schema) = generate(kind) {
        return schema;
    }
    match kind {
        NodeKind::Start => start_schema(),
        NodeKind::Llm(_) => llm_schema(),
        NodeKind::KnowledgeRetrieval(_) => knowledge_schema(),
        NodeKind::End => end_schema(),
        NodeKind::Answer(_) => answer_schema(),
        NodeKind::Mcp(_) => PortSchema::new(
            vec![PortDefinition::new("input", PortType::Any, false)],
            vec![PortDefinition::new("result", PortType::Object, true)],
        ),
        NodeKind::TavilySearch(_) => PortSchema::new(
            vec![PortDefinition::new("query", PortType::String, true)],
            vec![
                PortDefinition::new("results", PortType::Array, true),
                PortDefinition::new("answer", PortType::String, false),
            ],
        ),
        NodeKind::HttpRequest(_) => PortSchema::new(
            vec![PortDefinition::new("body", PortType::Any, false)],
            vec![
                PortDefinition::new("response", PortType::String, true),
                PortDefinition::new("status_code", PortType::Number, true),
            ],
        ),
        NodeKind::Code(_) => PortSchema::new(
            vec![PortDefinition::new("input", PortType::Any, false)],
            vec![PortDefinition::new("output", PortType::Any, true)],
        ),
        NodeKind::TemplateTransform(_) => PortSchema::new(
            vec![PortDefinition::new("input", PortType::Any, false)],
            vec![PortDefinition::new("output", PortType::String, true)],
        ),
        // Ports come from the imported template's schemas.
        NodeKind::ImportedWorkflow(_) => PortSchema::default(),
        // Dynamic kinds are handled by `generate` above.
        _ => PortSchema::default(),
    }
}

fn start_schema() -> PortSchema {
    PortSchema::new(
        vec![],
        vec![
            PortDefinition::new("query", PortType::String, true)
                .with_display_name("User query")
                .with_description("The user's question or message")
                .with_default(serde_json::json!("")),
            PortDefinition::new("session_id", PortType::String, false)
                .with_display_name("Session id")
                .with_default(serde_json::json!("")),
        ],
    )
}

fn llm_schema() -> PortSchema {
    PortSchema::new(
        vec![
            PortDefinition::new("query", PortType::String, true)
                .with_display_name("Query")
                .with_description("The user's question"),
            PortDefinition::new("context", PortType::String, false)
                .with_display_name("Context")
                .with_description("Retrieved context"),
            PortDefinition::new("system_prompt", PortType::String, false)
                .with_display_name("System prompt"),
        ],
        vec![
            PortDefinition::new("response", PortType::String, true)
                .with_display_name("Response")
                .with_description("Model completion"),
            PortDefinition::new("tokens", PortType::Number, false).with_display_name("Tokens"),
            PortDefinition::new("model", PortType::String, false).with_display_name("Model"),
        ],
    )
}

fn knowledge_schema() -> PortSchema {
    PortSchema::new(
        vec![
            PortDefinition::new("query", PortType::String, true)
                .with_display_name("Search query")
                .with_description("Text to search for"),
        ],
        vec![
            PortDefinition::new("context", PortType::String, true)
                .with_display_name("Context")
                .with_description("Concatenated retrieved documents"),
            PortDefinition::new("documents", PortType::Array, false)
                .with_display_name("Documents"),
            PortDefinition::new("doc_count", PortType::Number, false)
                .with_display_name("Document count"),
        ],
    )
}

fn end_schema() -> PortSchema {
    PortSchema::new(
        vec![
            PortDefinition::new("response", PortType::String, true)
                .with_display_name("Response")
                .with_description("Final response text"),
        ],
        vec![
            PortDefinition::new("final_output", PortType::Object, true)
                .with_display_name("Final output"),
        ],
    )
}

fn answer_schema() -> PortSchema {
    PortSchema::new(
        vec![
            PortDefinition::new("response", PortType::String, true)
                .with_display_name("Response"),
        ],
        vec![],
    )
}
