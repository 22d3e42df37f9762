//! The canonical in-memory data model: nodes, ports, edges, and bindings.

pub mod binding;
pub mod edge;
pub mod node;
pub mod port;

pub use binding::{
    Binding, ParsedSelector, SESSION_SCOPES, ValueSelector, build_variable_path,
    is_valid_variable_path, parse_selector,
};
pub use edge::{Edge, EdgeMetadata, canonical_edge_id};
pub use node::{
    AggregatorConfig, AggregatorSettings, AnswerConfig, AssignerConfig, AssignerOperation,
    BranchCase, BranchCondition, BranchConfig, ClassifierConfig, CodeConfig, HttpRequestConfig,
    ImportedWorkflowConfig, InternalGraph, KnowledgeConfig, LlmConfig, McpConfig, Node, NodeFlags,
    NodeKind, OperationInput, Position, RetrievalMode, TavilySearchConfig,
    TemplateTransformConfig, TopicClass, VariableGroup, VisionConfig, WriteMode,
};
pub use port::{PortDefinition, PortSchema, PortType};
