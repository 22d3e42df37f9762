//! Mutable graph store.
//!
//! [`GraphSession`] owns the working copy of a workflow graph and keeps its
//! consistency invariants through every mutation: at most one edge per
//! ordered node pair, variable bindings that only reference live nodes, and
//! dynamic port schemas that track node configuration. Deletions cascade so
//! no dangling reference survives a removal.

use ahash::{AHashMap, AHashSet};

use crate::error::ConnectionError;
use crate::graph::{
    build_variable_path, AggregatorConfig, Binding, Edge, Node, NodeKind, PortType,
    ValueSelector, SESSION_SCOPES,
};
use crate::normalize::normalize_graph;
use crate::traverse::Adjacency;
use crate::validate::{
    are_types_compatible, default_input_port, validate_multiple_connections,
    validate_port_connection, CompatibilityWarning,
};

/// A session-scoped variable, addressable as `{scope}.{name}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionVariable {
    pub scope: String,
    pub name: String,
    pub value_type: PortType,
}

impl SessionVariable {
    pub fn path(&self) -> String {
        format!("{}.{}", self.scope, self.name)
    }
}

/// One entry in the variable picker for a given node.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableVariable {
    /// Selector path, `{node_id}.{port}` or `{scope}.{key}`.
    pub path: String,
    pub value_type: PortType,
    /// Human label of where the value comes from, the producing node's
    /// title or the session scope.
    pub source_label: String,
}

/// Result of a successful [`GraphSession::connect`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOutcome {
    pub edge_id: String,
    pub warning: Option<CompatibilityWarning>,
}

/// The working copy of one workflow graph.
#[derive(Debug, Clone, Default)]
pub struct GraphSession {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    session_variables: Vec<SessionVariable>,
    /// Aggregator configurations mirrored by node id so pickers and port
    /// regeneration never scan the node list.
    aggregator_mirror: AHashMap<String, AggregatorConfig>,
    dirty: bool,
}

impl GraphSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a session over an existing graph without marking it dirty.
    pub fn with_graph(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut session = Self {
            nodes,
            edges,
            ..Self::default()
        };
        session.rebuild_mirror();
        session
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn aggregator_config(&self, node_id: &str) -> Option<&AggregatorConfig> {
        self.aggregator_mirror.get(node_id)
    }

    /// Whether the graph changed since the last [`mark_saved`].
    ///
    /// [`mark_saved`]: GraphSession::mark_saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Declares a session variable; an existing variable with the same scope
    /// and name is replaced. Unknown scopes are ignored.
    pub fn define_session_variable(&mut self, scope: &str, name: &str, value_type: PortType) {
        if !SESSION_SCOPES.contains(&scope) {
            return;
        }
        self.session_variables
            .retain(|v| !(v.scope == scope && v.name == name));
        self.session_variables.push(SessionVariable {
            scope: scope.to_string(),
            name: name.to_string(),
            value_type,
        });
    }

    pub fn session_variables(&self) -> &[SessionVariable] {
        &self.session_variables
    }

    /// Replaces the node list wholesale, pruning mirror entries for nodes
    /// that no longer exist.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
        self.rebuild_mirror();
        self.dirty = true;
    }

    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
        self.dirty = true;
    }

    /// Adds a node. An existing node with the same id is replaced in place.
    pub fn add_node(&mut self, node: Node) {
        self.mirror_node(&node);
        match self.nodes.iter_mut().find(|n| n.id == node.id) {
            Some(slot) => *slot = node,
            None => self.nodes.push(node),
        }
        self.dirty = true;
    }

    /// Applies `apply` to the node, then regenerates dynamic ports and the
    /// aggregator mirror so the schema reflects the new configuration.
    /// Returns false when the node does not exist.
    pub fn update_node(&mut self, id: &str, apply: impl FnOnce(&mut Node)) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        apply(node);
        node.regenerate_ports();
        let mirrored = node.clone();
        self.mirror_node(&mirrored);
        self.dirty = true;
        true
    }

    /// Removes a node and everything that referenced it: its edges, variable
    /// mappings selecting its outputs, and assigner or aggregator selectors
    /// pointing at it. Returns false when the node does not exist.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return false;
        }
        self.edges.retain(|e| !e.touches(id));
        self.aggregator_mirror.remove(id);
        for node in &mut self.nodes {
            node.variable_mappings
                .retain(|_, binding| binding.source.node_id() != Some(id));
            scrub_node_references(node, id);
            node.regenerate_ports();
            if let NodeKind::VariableAggregator(config) = &node.kind {
                self.aggregator_mirror.insert(node.id.clone(), config.clone());
            }
        }
        self.dirty = true;
        true
    }

    /// Inserts an edge, collapsing onto the canonical id for its node pair.
    /// When the pair already has an edge, the incoming handles overwrite the
    /// existing ones. A variable mapping is synthesized on the target when
    /// the connected ports resolve and their types are compatible. Returns
    /// the id of the surviving edge.
    pub fn add_edge(&mut self, mut edge: Edge) -> String {
        edge.id = crate::graph::canonical_edge_id(&edge.source, &edge.target);
        if edge.metadata.source_type.is_empty() {
            if let Some(source) = self.node(&edge.source) {
                edge.metadata.source_type = source.kind_name().to_string();
            }
        }
        if edge.metadata.target_type.is_empty() {
            if let Some(target) = self.node(&edge.target) {
                edge.metadata.target_type = target.kind_name().to_string();
            }
        }

        self.synthesize_mapping(&edge);

        let id = edge.id.clone();
        match self.edges.iter_mut().find(|e| e.same_pair(&edge)) {
            Some(existing) => {
                if edge.source_handle.is_some() {
                    existing.source_handle = edge.source_handle;
                }
                if edge.target_handle.is_some() {
                    existing.target_handle = edge.target_handle;
                }
                existing.metadata = edge.metadata;
            }
            None => self.edges.push(edge),
        }
        self.dirty = true;
        id
    }

    /// Removes an edge and the target-side variable mappings it carried,
    /// identified by selectors reading from the edge's source node. Returns
    /// false when the edge does not exist.
    pub fn delete_edge(&mut self, edge_id: &str) -> bool {
        let Some(at) = self.edges.iter().position(|e| e.id == edge_id) else {
            return false;
        };
        let edge = self.edges.remove(at);
        if let Some(target) = self.nodes.iter_mut().find(|n| n.id == edge.target) {
            target
                .variable_mappings
                .retain(|_, binding| binding.source.node_id() != Some(edge.source.as_str()));
        }
        self.dirty = true;
        true
    }

    /// Validated connection between two nodes' ports.
    ///
    /// Handles default to the preferred port on each side. A target that
    /// declares no input ports accepts the connection on a synthesized
    /// any-typed handle. An input port already fed by a different source is
    /// rejected as a duplicate connection; reconnecting the same pair merges
    /// instead. On success the edge is stored and the outcome carries the
    /// runtime-check warning when one side is any-typed.
    pub fn connect(
        &mut self,
        source_id: &str,
        source_handle: Option<&str>,
        target_id: &str,
        target_handle: Option<&str>,
    ) -> Result<ConnectOutcome, ConnectionError> {
        let source = self
            .node(source_id)
            .ok_or_else(|| ConnectionError::NodeNotFound {
                node_id: source_id.to_string(),
            })?;
        let target = self
            .node(target_id)
            .ok_or_else(|| ConnectionError::NodeNotFound {
                node_id: target_id.to_string(),
            })?;

        let source_port = match source_handle {
            Some(handle) => {
                source
                    .ports
                    .output(handle)
                    .ok_or_else(|| ConnectionError::UnknownSourcePort {
                        node_id: source_id.to_string(),
                        port: handle.to_string(),
                    })?
            }
            None => crate::graph::PortSchema::preferred_name(&source.ports.outputs)
                .and_then(|name| source.ports.output(name))
                .ok_or_else(|| ConnectionError::UnknownSourcePort {
                    node_id: source_id.to_string(),
                    port: String::new(),
                })?,
        }
        .clone();

        let target_port = if target.ports.inputs.is_empty() {
            default_input_port(target_handle.unwrap_or("input"))
        } else {
            match target_handle {
                Some(handle) => target
                    .ports
                    .input(handle)
                    .ok_or_else(|| ConnectionError::UnknownTargetPort {
                        node_id: target_id.to_string(),
                        port: handle.to_string(),
                    })?
                    .clone(),
                None => crate::graph::PortSchema::preferred_name(&target.ports.inputs)
                    .and_then(|name| target.ports.input(name))
                    .ok_or_else(|| ConnectionError::UnknownTargetPort {
                        node_id: target_id.to_string(),
                        port: String::new(),
                    })?
                    .clone(),
            }
        };

        let warning = validate_port_connection(&source_port, &target_port)?;

        // Reconnecting the same pair merges; a second source claiming the
        // same input port is a duplicate connection.
        let occupied: Vec<String> = self
            .edges
            .iter()
            .filter(|e| e.target == target_id && e.source != source_id)
            .filter_map(|e| e.target_handle.clone())
            .collect();
        validate_multiple_connections(&target_port.name, &occupied, false)?;

        let edge = Edge::new(source_id, target_id)
            .with_handles(&source_port.name, &target_port.name);
        let edge_id = self.add_edge(edge);
        Ok(ConnectOutcome { edge_id, warning })
    }

    /// Variables a node may legally read: every output port of its upstream
    /// nodes plus all session variables, optionally narrowed to types
    /// compatible with `wanted`.
    pub fn variables_visible_to(
        &self,
        node_id: &str,
        wanted: Option<PortType>,
    ) -> Vec<AvailableVariable> {
        let upstream: AHashSet<String> = Adjacency::from_edges(&self.edges).upstream_of(node_id);
        let accepts = |value_type: PortType| match wanted {
            Some(wanted) => are_types_compatible(value_type, wanted),
            None => true,
        };

        let mut variables = Vec::new();
        for node in &self.nodes {
            if !upstream.contains(&node.id) {
                continue;
            }
            for port in &node.ports.outputs {
                if accepts(port.port_type) {
                    variables.push(AvailableVariable {
                        path: build_variable_path(&node.id, &port.name),
                        value_type: port.port_type,
                        source_label: node.title.clone(),
                    });
                }
            }
        }
        for var in &self.session_variables {
            if accepts(var.value_type) {
                variables.push(AvailableVariable {
                    path: var.path(),
                    value_type: var.value_type,
                    source_label: var.scope.clone(),
                });
            }
        }
        variables
    }

    /// Runs the full normalization pass over the stored graph.
    pub fn normalize(&mut self) {
        normalize_graph(&mut self.nodes, &mut self.edges);
        self.rebuild_mirror();
        self.dirty = true;
    }

    fn rebuild_mirror(&mut self) {
        self.aggregator_mirror.clear();
        for node in &self.nodes {
            if let NodeKind::VariableAggregator(config) = &node.kind {
                self.aggregator_mirror.insert(node.id.clone(), config.clone());
            }
        }
    }

    fn mirror_node(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::VariableAggregator(config) => {
                self.aggregator_mirror.insert(node.id.clone(), config.clone());
            }
            _ => {
                self.aggregator_mirror.remove(&node.id);
            }
        }
    }

    /// Writes the variable mapping implied by an edge onto the target node
    /// when one is not already present and the port types line up.
    fn synthesize_mapping(&mut self, edge: &Edge) {
        let Some(source) = self.node(&edge.source) else {
            return;
        };
        let Some(source_port) = edge
            .source_handle
            .as_deref()
            .or_else(|| crate::graph::PortSchema::preferred_name(&source.ports.outputs))
            .and_then(|name| source.ports.output(name))
            .cloned()
        else {
            return;
        };
        let source_id = edge.source.clone();

        let Some(target) = self.nodes.iter_mut().find(|n| n.id == edge.target) else {
            return;
        };
        // Stale or placeholder target handles fall back to the input port
        // named like the source output.
        let Some(target_port) = edge
            .target_handle
            .as_deref()
            .and_then(|h| target.ports.input(h))
            .or_else(|| target.ports.input(&source_port.name))
            .cloned()
        else {
            return;
        };
        if target.variable_mappings.contains_key(&target_port.name) {
            return;
        }
        if !are_types_compatible(source_port.port_type, target_port.port_type) {
            return;
        }
        let selector = ValueSelector::node(&source_id, &source_port.name, source_port.port_type);
        target
            .variable_mappings
            .insert(target_port.name.clone(), Binding::new(&target_port.name, selector));
    }
}

/// Clears selectors inside kind payloads that point at a deleted node. The
/// containing operation or group survives with the reference blanked.
fn scrub_node_references(node: &mut Node, deleted_id: &str) {
    let prefix = format!("{deleted_id}.");
    match &mut node.kind {
        NodeKind::Assigner(config) => {
            for op in &mut config.operations {
                if op
                    .target_variable
                    .as_deref()
                    .is_some_and(|v| v.starts_with(&prefix))
                {
                    op.target_variable = None;
                }
                if op
                    .source_variable
                    .as_deref()
                    .is_some_and(|v| v.starts_with(&prefix))
                {
                    op.source_variable = None;
                }
            }
        }
        NodeKind::VariableAggregator(config) => {
            config
                .variables
                .retain(|path| path.first().map(String::as_str) != Some(deleted_id));
            for group in &mut config.advanced_settings.groups {
                group
                    .variables
                    .retain(|path| path.first().map(String::as_str) != Some(deleted_id));
            }
        }
        NodeKind::IfElse(config) => {
            for case in &mut config.cases {
                for condition in &mut case.conditions {
                    if condition.variable_selector.starts_with(&prefix) {
                        condition.variable_selector.clear();
                    }
                }
            }
        }
        _ => {}
    }
}
