use serde::{Deserialize, Serialize};

/// Builds the deterministic id enforcing at most one edge per ordered
/// (source, target) pair.
pub fn canonical_edge_id(source: &str, target: &str) -> String {
    format!("edge-{}-{}", source, target)
}

/// Node-kind names recorded on an edge for rendering without a node lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EdgeMetadata {
    #[serde(rename = "sourceType", default)]
    pub source_type: String,
    #[serde(rename = "targetType", default)]
    pub target_type: String,
}

/// A directed connection between two nodes' ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "sourceHandle", default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(rename = "targetHandle", default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default = "default_edge_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: EdgeMetadata,
}

fn default_edge_kind() -> String {
    "custom".to_string()
}

impl Edge {
    /// Creates an edge with the canonical id for its endpoint pair.
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: canonical_edge_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: None,
            target_handle: None,
            kind: default_edge_kind(),
            metadata: EdgeMetadata::default(),
        }
    }

    pub fn with_handles(mut self, source_handle: &str, target_handle: &str) -> Self {
        self.source_handle = Some(source_handle.to_string());
        self.target_handle = Some(target_handle.to_string());
        self
    }

    pub fn with_metadata(mut self, source_type: &str, target_type: &str) -> Self {
        self.metadata = EdgeMetadata {
            source_type: source_type.to_string(),
            target_type: target_type.to_string(),
        };
        self
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Same ordered endpoint pair, regardless of recorded id or handles.
    pub fn same_pair(&self, other: &Edge) -> bool {
        self.source == other.source && self.target == other.target
    }
}
