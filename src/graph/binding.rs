use serde::{Deserialize, Serialize};

use super::port::PortType;

/// Session-scoped selector prefixes that never refer to a graph node.
pub const SESSION_SCOPES: [&str; 3] = ["env", "conv", "sys"];

/// A reference to the value feeding a binding: either an upstream node's
/// output port (`node_id.port_name`) or a session-scoped variable
/// (`env.key`, `conv.key`, `sys.key`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSelector {
    pub variable: String,
    #[serde(default)]
    pub value_type: PortType,
}

impl ValueSelector {
    pub fn node(node_id: &str, port_name: &str, value_type: PortType) -> Self {
        Self {
            variable: build_variable_path(node_id, port_name),
            value_type,
        }
    }

    pub fn parse(&self) -> ParsedSelector<'_> {
        parse_selector(&self.variable)
    }

    /// The node id this selector points at, if it is a node reference.
    pub fn node_id(&self) -> Option<&str> {
        match self.parse() {
            ParsedSelector::Node { node_id, .. } => Some(node_id),
            _ => None,
        }
    }
}

/// An explicit mapping from an input port to an upstream output port or
/// session variable, independent of the visual edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub target_port: String,
    pub source: ValueSelector,
}

impl Binding {
    pub fn new(target_port: &str, source: ValueSelector) -> Self {
        Self {
            target_port: target_port.to_string(),
            source,
        }
    }
}

/// The decomposed form of a selector string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedSelector<'a> {
    /// `node_id.port_name`
    Node { node_id: &'a str, port: &'a str },
    /// `env.key` / `conv.key` / `sys.key`
    Session { scope: &'a str, key: &'a str },
    /// No dot, or an empty half: not resolvable as a reference.
    Opaque,
}

pub fn parse_selector(selector: &str) -> ParsedSelector<'_> {
    let Some((head, tail)) = selector.split_once('.') else {
        return ParsedSelector::Opaque;
    };
    if head.is_empty() || tail.is_empty() {
        return ParsedSelector::Opaque;
    }
    if SESSION_SCOPES.contains(&head) {
        ParsedSelector::Session { scope: head, key: tail }
    } else {
        ParsedSelector::Node { node_id: head, port: tail }
    }
}

pub fn build_variable_path(node_id: &str, port_name: &str) -> String {
    format!("{}.{}", node_id, port_name)
}

pub fn is_valid_variable_path(path: &str) -> bool {
    matches!(parse_selector(path), ParsedSelector::Node { .. })
}
