//! Export readiness check over a live graph.

use ahash::AHashSet;

use crate::graph::{Edge, Node, PortDefinition};
use crate::validate::validate_required_inputs;

use super::model::MIN_NODES;

/// Outcome of [`validate_export`]. `errors` non-empty means the graph cannot
/// be published; `warnings` flag likely mistakes that do not block export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportValidation {
    pub is_valid: bool,
    pub has_start_node: bool,
    pub has_end_node: bool,
    /// The start node's outputs, the template's implied input schema.
    pub detected_input_ports: Vec<PortDefinition>,
    /// The first terminal node's inputs, the implied output schema.
    pub detected_output_ports: Vec<PortDefinition>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub node_count: usize,
    pub edge_count: usize,
}

/// Checks whether a live graph is ready to be published as a template and
/// derives its input and output schemas. Pure: the graph is not touched.
pub fn validate_export(nodes: &[Node], edges: &[Edge]) -> ExportValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let start = nodes.iter().find(|n| n.is_start());
    let terminal = nodes.iter().find(|n| n.is_terminal());

    if start.is_none() {
        errors.push("workflow has no start node".to_string());
    }
    if terminal.is_none() {
        errors.push("workflow has no end or answer node".to_string());
    }
    if nodes.len() < MIN_NODES {
        errors.push(format!(
            "workflow has {} nodes, templates need at least {MIN_NODES}",
            nodes.len()
        ));
    }

    for node in nodes {
        let connected = connected_inputs(node, edges);
        if let Err(err) = validate_required_inputs(&node.id, &node.ports.inputs, &connected) {
            warnings.push(err.to_string());
        }
    }

    ExportValidation {
        is_valid: errors.is_empty(),
        has_start_node: start.is_some(),
        has_end_node: terminal.is_some(),
        detected_input_ports: start.map(|n| n.ports.outputs.clone()).unwrap_or_default(),
        detected_output_ports: terminal.map(|n| n.ports.inputs.clone()).unwrap_or_default(),
        errors,
        warnings,
        node_count: nodes.len(),
        edge_count: edges.len(),
    }
}

/// Input ports satisfied either by an incoming edge handle or by a variable
/// mapping.
fn connected_inputs(node: &Node, edges: &[Edge]) -> AHashSet<String> {
    let mut connected: AHashSet<String> = node.variable_mappings.keys().cloned().collect();
    for edge in edges {
        if edge.target == node.id {
            if let Some(handle) = &edge.target_handle {
                connected.insert(handle.clone());
            }
        }
    }
    connected
}
