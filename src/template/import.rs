//! Template import materialization.
//!
//! Importing a template produces a single composite node carrying the
//! template's internal graph in its payload. Expansion clones the internal
//! nodes and edges into the outer graph under namespaced ids so they render
//! inline, flagged read-only. Both steps are pure functions of the template
//! and the caller-supplied instance id, so re-importing or re-expanding is
//! deterministic.

use crate::error::TemplateError;
use crate::graph::{
    canonical_edge_id, Edge, ImportedWorkflowConfig, InternalGraph, Node, NodeFlags, NodeKind,
    ParsedSelector, Position,
};

use super::model::Template;
use super::validator::validate_rules;

/// Offset applied to expanded internal nodes relative to the composite.
const EXPANSION_OFFSET: f64 = 50.0;

/// Everything one import adds to the outer graph. `nodes[0]` is always the
/// composite node; the rest is the expansion, present only when expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Builds the graph fragment for importing `template` under `instance_id`.
///
/// All-or-nothing: a template failing business validation produces an error
/// and no fragment.
pub fn materialize_template(
    template: &Template,
    instance_id: &str,
    position: Position,
    expanded: bool,
) -> Result<ImportedGraph, TemplateError> {
    validate_rules(template)?;

    let internal = InternalGraph {
        nodes: template.graph.nodes.clone(),
        edges: template.graph.edges.clone(),
    };
    let mut composite = Node::new(
        instance_id,
        &template.name,
        position,
        NodeKind::ImportedWorkflow(ImportedWorkflowConfig {
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            template_version: template.version.clone(),
            is_expanded: expanded,
            read_only: true,
            internal_graph: internal,
        }),
    );
    composite.ports.inputs = template.input_schema.clone();
    composite.ports.outputs = template.output_schema.clone();

    let mut nodes = vec![composite];
    let mut edges = Vec::new();
    if expanded {
        let (inner_nodes, inner_edges) = expand(&nodes[0]);
        nodes.extend(inner_nodes);
        edges.extend(inner_edges);
    }
    Ok(ImportedGraph { nodes, edges })
}

/// Clones the composite's internal graph into outer-graph form: ids become
/// `{instance_id}_{original_id}`, positions shift relative to the composite,
/// and every node is flagged read-only. Selectors and edge endpoints are
/// rewritten consistently, so the internal wiring survives the renaming.
///
/// Idempotent: the output ids are a pure function of the composite, so
/// re-expanding replaces the same nodes rather than duplicating them.
/// Returns nothing for non-composite nodes.
pub fn expand(composite: &Node) -> (Vec<Node>, Vec<Edge>) {
    let NodeKind::ImportedWorkflow(config) = &composite.kind else {
        return (Vec::new(), Vec::new());
    };
    let namespace = |id: &str| format!("{}_{}", composite.id, id);

    let nodes = config
        .internal_graph
        .nodes
        .iter()
        .map(|original| {
            let mut node = original.clone();
            node.id = namespace(&original.id);
            node.position = composite.position.offset(
                original.position.x + EXPANSION_OFFSET,
                original.position.y + EXPANSION_OFFSET,
            );
            node.flags = NodeFlags::read_only();
            let mappings = std::mem::take(&mut node.variable_mappings);
            for (key, mut binding) in mappings {
                if let ParsedSelector::Node { node_id, port } = binding.source.parse() {
                    let (node_id, port) = (node_id.to_owned(), port.to_owned());
                    binding.source.variable =
                        crate::graph::build_variable_path(&namespace(&node_id), &port);
                }
                node.variable_mappings.insert(key, binding);
            }
            node
        })
        .collect();

    let edges = config
        .internal_graph
        .edges
        .iter()
        .map(|original| {
            let mut edge = original.clone();
            edge.source = namespace(&original.source);
            edge.target = namespace(&original.target);
            edge.id = canonical_edge_id(&edge.source, &edge.target);
            edge
        })
        .collect();

    (nodes, edges)
}

/// Undoes [`expand`]: removes every node and edge under the composite's
/// namespace from the outer graph. The composite itself stays.
pub fn collapse(composite_id: &str, nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
    let prefix = format!("{composite_id}_");
    nodes.retain(|n| !n.id.starts_with(&prefix));
    edges.retain(|e| !e.source.starts_with(&prefix) && !e.target.starts_with(&prefix));
}
