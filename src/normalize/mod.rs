//! Graph normalizer.
//!
//! [`normalize_graph`] repairs a freshly loaded graph in place: dynamic port
//! schemas are regenerated from node configuration, legacy port names and
//! stale edge handles are rewritten, duplicate edges are collapsed onto
//! canonical identifiers, and variable bindings are reconciled with the edge
//! set in both directions. The pass is idempotent: running it on an already
//! normalized graph changes nothing.

mod rename;

pub use rename::{renamed_input, renamed_output};

use ahash::{AHashMap, AHashSet};

use crate::graph::{
    canonical_edge_id, Binding, Edge, Node, ParsedSelector, PortSchema, ValueSelector,
};
use crate::traverse::Adjacency;
use crate::validate::are_types_compatible;

/// Resolves a handle against a port list. A handle naming an existing port
/// is kept; a missing handle, or a stale or editor stand-in name such as
/// `source` or `default`, falls back to the list's preferred port. An empty
/// port list keeps the handle untouched.
fn normalize_handle(
    ports: &[crate::graph::PortDefinition],
    current: Option<&str>,
) -> Option<String> {
    if ports.is_empty() {
        return current.map(str::to_owned);
    }
    if let Some(handle) = current {
        if ports.iter().any(|p| p.name == handle) {
            return Some(handle.to_owned());
        }
    }
    // Missing, placeholder, or stale handle snaps onto the preferred port.
    preferred_port_name(ports)
}

fn preferred_port_name(ports: &[crate::graph::PortDefinition]) -> Option<String> {
    PortSchema::preferred_name(ports).map(str::to_owned)
}

struct NodeIndex {
    kinds: AHashMap<String, String>,
    schemas: AHashMap<String, PortSchema>,
    start_ids: AHashSet<String>,
}

impl NodeIndex {
    fn build(nodes: &[Node]) -> Self {
        let mut kinds = AHashMap::with_capacity(nodes.len());
        let mut schemas = AHashMap::with_capacity(nodes.len());
        let mut start_ids = AHashSet::new();
        for node in nodes {
            kinds.insert(node.id.clone(), node.kind_name().to_owned());
            schemas.insert(node.id.clone(), node.ports.clone());
            if node.is_start() {
                start_ids.insert(node.id.clone());
            }
        }
        Self {
            kinds,
            schemas,
            start_ids,
        }
    }

    fn kind(&self, id: &str) -> Option<&str> {
        self.kinds.get(id).map(String::as_str)
    }

    fn schema(&self, id: &str) -> Option<&PortSchema> {
        self.schemas.get(id)
    }
}

/// Runs the full normalization pass over `nodes` and `edges` in place.
pub fn normalize_graph(nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
    // Dynamic schemas first so every later step sees current port lists.
    for node in nodes.iter_mut() {
        node.regenerate_ports();
    }

    let index = NodeIndex::build(nodes);
    rewrite_bindings(nodes, &index);
    rewrite_edge_handles(edges, &index);
    dedup_edges(edges);

    // Port lists did not change above, but binding keys did; rebuild so the
    // reconciliation steps resolve against the rewritten state.
    let index = NodeIndex::build(nodes);
    synthesize_bindings_from_edges(nodes, edges, &index);
    materialize_binding_edges(nodes, edges, &index);
}

/// Rewrites legacy binding keys and selector ports to their current names,
/// then snaps selectors whose port no longer exists onto the source node's
/// preferred output.
fn rewrite_bindings(nodes: &mut [Node], index: &NodeIndex) {
    for node in nodes.iter_mut() {
        if node.variable_mappings.is_empty() {
            continue;
        }
        let kind = node.kind_name().to_owned();
        let old = std::mem::take(&mut node.variable_mappings);
        for (key, mut binding) in old {
            let key = renamed_input(&kind, &key)
                .map(str::to_owned)
                .unwrap_or(key);
            binding.target_port = renamed_input(&kind, &binding.target_port)
                .map(str::to_owned)
                .unwrap_or(binding.target_port);
            rewrite_selector(&mut binding.source, index);
            // A rename can collide with a mapping already stored under the
            // current name; the current one wins.
            node.variable_mappings.entry(key).or_insert(binding);
        }
    }
}

fn rewrite_selector(selector: &mut ValueSelector, index: &NodeIndex) {
    let ParsedSelector::Node { node_id, port } = selector.parse() else {
        return;
    };
    let (node_id, port) = (node_id.to_owned(), port.to_owned());
    let Some(kind) = index.kind(&node_id) else {
        return;
    };
    let port = renamed_output(kind, &port)
        .map(str::to_owned)
        .unwrap_or(port);
    let resolved = index
        .schema(&node_id)
        .and_then(|schema| normalize_handle(&schema.outputs, Some(&port)))
        .unwrap_or(port);
    selector.variable = crate::graph::build_variable_path(&node_id, &resolved);
}

fn rewrite_edge_handles(edges: &mut [Edge], index: &NodeIndex) {
    for edge in edges.iter_mut() {
        if let Some(schema) = index.schema(&edge.source) {
            edge.source_handle = normalize_handle(&schema.outputs, edge.source_handle.as_deref());
        }
        if let Some(schema) = index.schema(&edge.target) {
            edge.target_handle = normalize_handle(&schema.inputs, edge.target_handle.as_deref());
        }
    }
}

/// Rewrites every edge id onto its canonical form and collapses duplicate
/// ordered pairs, merging handles and metadata from later duplicates into
/// the survivor.
fn dedup_edges(edges: &mut Vec<Edge>) {
    let mut seen: AHashMap<(String, String), usize> = AHashMap::new();
    let mut kept: Vec<Edge> = Vec::with_capacity(edges.len());
    for mut edge in edges.drain(..) {
        edge.id = canonical_edge_id(&edge.source, &edge.target);
        let pair = (edge.source.clone(), edge.target.clone());
        match seen.get(&pair) {
            Some(&at) => {
                let survivor = &mut kept[at];
                if survivor.source_handle.is_none() {
                    survivor.source_handle = edge.source_handle;
                }
                if survivor.target_handle.is_none() {
                    survivor.target_handle = edge.target_handle;
                }
                if survivor.metadata.source_type.is_empty() {
                    survivor.metadata.source_type = edge.metadata.source_type;
                }
                if survivor.metadata.target_type.is_empty() {
                    survivor.metadata.target_type = edge.metadata.target_type;
                }
            }
            None => {
                seen.insert(pair, kept.len());
                kept.push(edge);
            }
        }
    }
    *edges = kept;
}

/// Backfills variable mappings for edges predating the binding model. For
/// each edge whose implied target port carries no mapping, a binding to the
/// source node's resolved output is written, provided the port types are
/// compatible.
fn synthesize_bindings_from_edges(nodes: &mut [Node], edges: &[Edge], index: &NodeIndex) {
    for edge in edges {
        let Some(source_schema) = index.schema(&edge.source) else {
            continue;
        };
        let Some(source_port) = edge
            .source_handle
            .as_deref()
            .and_then(|h| source_schema.output(h))
        else {
            continue;
        };
        let Some(target) = nodes.iter_mut().find(|n| n.id == edge.target) else {
            continue;
        };
        let target_port = match edge
            .target_handle
            .as_deref()
            .and_then(|h| target.ports.input(h))
        {
            Some(port) => port,
            // Editors historically wrote the source handle on both ends.
            None => match target.ports.input(&source_port.name) {
                Some(port) => port,
                None => continue,
            },
        };
        if target.variable_mappings.contains_key(&target_port.name) {
            continue;
        }
        if !are_types_compatible(source_port.port_type, target_port.port_type) {
            continue;
        }
        let selector = ValueSelector::node(&edge.source, &source_port.name, source_port.port_type);
        let key = target_port.name.clone();
        let binding = Binding::new(&key, selector);
        target.variable_mappings.insert(key, binding);
    }
}

/// Ensures every node-sourced binding is backed by an edge. Bindings that
/// reference a start node only materialize an edge when the start node is
/// already exactly one hop upstream of the referencing node, so long-range
/// references to start outputs stay data-only.
fn materialize_binding_edges(nodes: &[Node], edges: &mut Vec<Edge>, index: &NodeIndex) {
    let adjacency = Adjacency::from_edges(edges);
    let mut pairs: AHashSet<(String, String)> = edges
        .iter()
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect();
    for node in nodes {
        for binding in node.variable_mappings.values() {
            let ParsedSelector::Node { node_id, port } = binding.source.parse() else {
                continue;
            };
            if node_id == node.id || !index.kinds.contains_key(node_id) {
                continue;
            }
            let pair = (node_id.to_owned(), node.id.clone());
            if pairs.contains(&pair) {
                continue;
            }
            if index.start_ids.contains(node_id)
                && adjacency.shortest_path_len(node_id, &node.id) != Some(1)
            {
                continue;
            }
            let source_kind = index.kind(node_id).unwrap_or_default();
            edges.push(
                Edge::new(node_id, &node.id)
                    .with_handles(port, &binding.target_port)
                    .with_metadata(source_kind, node.kind_name()),
            );
            pairs.insert(pair);
        }
    }
}
