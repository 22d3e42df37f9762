//! Template document validation.
//!
//! Two layers: [`validate_structure`] checks a raw JSON document before any
//! typed deserialization is attempted, and [`validate_rules`] checks the
//! business invariants of an already-typed [`Template`]. Both collect every
//! violation instead of stopping at the first.

use ahash::AHashSet;
use serde_json::Value;

use crate::error::TemplateError;
use crate::graph::{Node, NodeKind};

use super::model::{Template, Visibility, MAX_EDGES, MAX_NAME_LENGTH, MAX_NODES, MIN_NODES};

/// `MAJOR.MINOR.PATCH`, each part a non-empty run of ASCII digits.
pub fn is_valid_version(version: &str) -> bool {
    let mut parts = version.split('.');
    let valid = (&mut parts)
        .take(3)
        .filter(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        .count()
        == 3;
    valid && parts.next().is_none()
}

fn string_field<'a>(doc: &'a Value, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

/// Checks a raw template document for the fields every template must carry,
/// without deserializing the graph.
pub fn validate_structure(doc: &Value) -> Result<(), TemplateError> {
    if !doc.is_object() {
        return Err(TemplateError::NotAnObject);
    }
    let mut errors = Vec::new();

    for field in ["id", "name", "version"] {
        if string_field(doc, field).is_none() {
            errors.push(format!("missing required string field '{field}'"));
        }
    }
    if let Some(name) = string_field(doc, "name") {
        if name.trim().is_empty() {
            errors.push("name must not be empty".to_string());
        } else if name.len() > MAX_NAME_LENGTH {
            errors.push(format!("name exceeds {MAX_NAME_LENGTH} characters"));
        }
    }
    if let Some(version) = string_field(doc, "version") {
        if !is_valid_version(version) {
            errors.push(format!("version '{version}' is not MAJOR.MINOR.PATCH"));
        }
    }
    if let Some(visibility) = doc
        .get("metadata")
        .and_then(|m| m.get("visibility"))
        .and_then(Value::as_str)
    {
        if !Visibility::NAMES.contains(&visibility) {
            errors.push(format!("unknown visibility '{visibility}'"));
        }
    }
    match doc.get("graph") {
        Some(graph) if graph.is_object() => {
            for field in ["nodes", "edges"] {
                if !graph.get(field).is_some_and(Value::is_array) {
                    errors.push(format!("graph.{field} must be an array"));
                }
            }
        }
        _ => errors.push("missing graph object".to_string()),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TemplateError::from_errors(&errors))
    }
}

/// Checks the business invariants of a typed template.
pub fn validate_rules(template: &Template) -> Result<(), TemplateError> {
    let mut errors = Vec::new();
    let nodes = &template.graph.nodes;
    let edges = &template.graph.edges;

    if nodes.len() < MIN_NODES {
        errors.push(format!("template must contain at least {MIN_NODES} nodes"));
    }
    if nodes.len() > MAX_NODES {
        errors.push(format!("template exceeds {MAX_NODES} nodes"));
    }
    if edges.len() > MAX_EDGES {
        errors.push(format!("template exceeds {MAX_EDGES} edges"));
    }

    let mut ids: AHashSet<&str> = AHashSet::with_capacity(nodes.len());
    for node in nodes {
        if !ids.insert(&node.id) {
            errors.push(format!("duplicate node id '{}'", node.id));
        }
        let kind = node.kind_name();
        if !NodeKind::TEMPLATE_ALLOWLIST.contains(&kind) {
            if matches!(node.kind, NodeKind::ImportedWorkflow(_)) {
                errors.push(format!(
                    "node '{}' nests an imported workflow; templates must be flat",
                    node.id
                ));
            } else {
                errors.push(format!("node '{}' has unsupported kind '{kind}'", node.id));
            }
        }
    }

    if !nodes.iter().any(Node::is_start) {
        errors.push("template has no start node".to_string());
    }
    if !nodes.iter().any(Node::is_terminal) {
        errors.push("template has no end or answer node".to_string());
    }

    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !ids.contains(endpoint.as_str()) {
                errors.push(format!(
                    "edge '{}' references missing node '{endpoint}'",
                    edge.id
                ));
            }
        }
    }

    if template.input_schema.is_empty() {
        errors.push("template declares no input schema".to_string());
    }
    if template.metadata.node_count != nodes.len() {
        errors.push(format!(
            "metadata.node_count is {} but the graph has {} nodes",
            template.metadata.node_count,
            nodes.len()
        ));
    }
    if template.metadata.edge_count != edges.len() {
        errors.push(format!(
            "metadata.edge_count is {} but the graph has {} edges",
            template.metadata.edge_count,
            edges.len()
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TemplateError::from_errors(&errors))
    }
}
