use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::binding::Binding;
use super::port::{PortSchema, PortType};

/// Canvas position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Interaction flags; all true for ordinary nodes, restricted for nodes
/// materialized from a read-only template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeFlags {
    pub draggable: bool,
    pub connectable: bool,
    pub deletable: bool,
    pub selectable: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            draggable: true,
            connectable: true,
            deletable: true,
            selectable: true,
        }
    }
}

impl NodeFlags {
    pub fn read_only() -> Self {
        Self {
            draggable: false,
            connectable: false,
            deletable: false,
            selectable: true,
        }
    }

    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A single node in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub ports: PortSchema,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variable_mappings: BTreeMap<String, Binding>,
    #[serde(default, skip_serializing_if = "NodeFlags::is_default")]
    pub flags: NodeFlags,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Creates a node with the default port scaffold for its kind.
    pub fn new(id: &str, title: &str, position: Position, kind: NodeKind) -> Self {
        let ports = crate::ports::schema_for(&kind);
        Self {
            id: id.to_string(),
            title: title.to_string(),
            position,
            ports,
            variable_mappings: BTreeMap::new(),
            flags: NodeFlags::default(),
            kind,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_start(&self) -> bool {
        matches!(self.kind, NodeKind::Start)
    }

    /// End and answer nodes may legally end traversal.
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::End | NodeKind::Answer(_))
    }

    /// Whether this kind's port schema is a function of its configuration
    /// and must be regenerated after a payload change.
    pub fn has_dynamic_ports(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::IfElse(_)
                | NodeKind::QuestionClassifier(_)
                | NodeKind::Assigner(_)
                | NodeKind::VariableAggregator(_)
        )
    }

    /// Recomputes `ports` from the current configuration; a no-op for
    /// static-schema kinds.
    pub fn regenerate_ports(&mut self) {
        if let Some(schema) = crate::ports::generate(&self.kind) {
            self.ports = schema;
        }
    }
}

/// The tagged variant over all supported node kinds. The `kind` field on the
/// wire discriminates; kind-specific payloads flatten into the node object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeKind {
    Start,
    Llm(LlmConfig),
    End,
    Answer(AnswerConfig),
    KnowledgeRetrieval(KnowledgeConfig),
    Mcp(McpConfig),
    IfElse(BranchConfig),
    QuestionClassifier(ClassifierConfig),
    Assigner(AssignerConfig),
    VariableAggregator(AggregatorConfig),
    ImportedWorkflow(ImportedWorkflowConfig),
    TavilySearch(TavilySearchConfig),
    HttpRequest(HttpRequestConfig),
    Code(CodeConfig),
    TemplateTransform(TemplateTransformConfig),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Llm(_) => "llm",
            NodeKind::End => "end",
            NodeKind::Answer(_) => "answer",
            NodeKind::KnowledgeRetrieval(_) => "knowledge-retrieval",
            NodeKind::Mcp(_) => "mcp",
            NodeKind::IfElse(_) => "if-else",
            NodeKind::QuestionClassifier(_) => "question-classifier",
            NodeKind::Assigner(_) => "assigner",
            NodeKind::VariableAggregator(_) => "variable-aggregator",
            NodeKind::ImportedWorkflow(_) => "imported-workflow",
            NodeKind::TavilySearch(_) => "tavily-search",
            NodeKind::HttpRequest(_) => "http-request",
            NodeKind::Code(_) => "code",
            NodeKind::TemplateTransform(_) => "template-transform",
        }
    }

    /// Every kind name a template is allowed to contain. Imported-workflow is
    /// deliberately absent: templates must not nest templates.
    pub const TEMPLATE_ALLOWLIST: [&'static str; 14] = [
        "start",
        "llm",
        "end",
        "answer",
        "knowledge-retrieval",
        "mcp",
        "if-else",
        "question-classifier",
        "assigner",
        "variable-aggregator",
        "tavily-search",
        "http-request",
        "code",
        "template-transform",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub prompt_template: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            prompt_template: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnswerConfig {
    #[serde(default)]
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KnowledgeConfig {
    #[serde(default)]
    pub dataset_id: String,
    #[serde(default)]
    pub mode: RetrievalMode,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default)]
    pub document_ids: Vec<String>,
}

fn default_top_k() -> u32 {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    #[default]
    Semantic,
    Keyword,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct McpConfig {
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// If-Else configuration: an ordered case list, each case a conjunction of
/// conditions over upstream variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BranchConfig {
    #[serde(default)]
    pub cases: Vec<BranchCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchCase {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<BranchCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchCondition {
    #[serde(default)]
    pub variable_selector: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub classes: Vec<TopicClass>,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub query_variable_selector: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<VisionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicClass {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VisionConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignerConfig {
    #[serde(default = "default_assigner_version")]
    pub version: String,
    #[serde(default)]
    pub operations: Vec<AssignerOperation>,
}

impl Default for AssignerConfig {
    fn default() -> Self {
        Self {
            version: default_assigner_version(),
            operations: Vec::new(),
        }
    }
}

fn default_assigner_version() -> String {
    "2".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignerOperation {
    pub write_mode: WriteMode,
    pub input_type: OperationInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant_value: Option<serde_json::Value>,
    /// Selector of the conversation variable being written; cleared (not
    /// removed) when the referenced node disappears.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_variable: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    Overwrite,
    Append,
    Extend,
    Increment,
    Decrement,
    Clear,
    RemoveFirst,
    RemoveLast,
}

impl WriteMode {
    /// Clear and the remove modes operate on the target alone.
    pub fn consumes_value(&self) -> bool {
        !matches!(
            self,
            WriteMode::Clear | WriteMode::RemoveFirst | WriteMode::RemoveLast
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationInput {
    Variable,
    Constant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub output_type: PortType,
    /// Declared variable selectors, each a `["node_id", "port"]` path.
    #[serde(default)]
    pub variables: Vec<Vec<String>>,
    #[serde(default)]
    pub advanced_settings: AggregatorSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AggregatorSettings {
    #[serde(default)]
    pub group_enabled: bool,
    #[serde(default)]
    pub groups: Vec<VariableGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableGroup {
    pub group_id: String,
    pub group_name: String,
    #[serde(default)]
    pub output_type: PortType,
    #[serde(default)]
    pub variables: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImportedWorkflowConfig {
    pub template_id: String,
    #[serde(default)]
    pub template_name: String,
    #[serde(default)]
    pub template_version: String,
    #[serde(default)]
    pub is_expanded: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub internal_graph: InternalGraph,
}

/// The template's own nodes and edges, carried verbatim inside the composite
/// node so expansion never needs the catalog again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InternalGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<super::edge::Edge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TavilySearchConfig {
    #[serde(default)]
    pub search_depth: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default)]
    pub include_answer: bool,
}

fn default_max_results() -> u32 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HttpRequestConfig {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CodeConfig {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemplateTransformConfig {
    #[serde(default)]
    pub template: String,
}
