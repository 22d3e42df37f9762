use serde::{Deserialize, Serialize};
use std::fmt;

/// The value type carried by a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PortType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    #[default]
    Any,
    File,
    ArrayFile,
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortType::String => "string",
            PortType::Number => "number",
            PortType::Boolean => "boolean",
            PortType::Array => "array",
            PortType::Object => "object",
            PortType::Any => "any",
            PortType::File => "file",
            PortType::ArrayFile => "array_file",
        };
        write!(f, "{}", name)
    }
}

/// A single named, typed input or output slot on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub port_type: PortType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl PortDefinition {
    pub fn new(name: &str, port_type: PortType, required: bool) -> Self {
        Self {
            name: name.to_string(),
            port_type,
            required,
            display_name: name.to_string(),
            description: String::new(),
            default_value: None,
        }
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = display_name.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

/// The complete input/output port list of a node.
///
/// All copies are deep: a cloned schema shares no storage with the original,
/// so a snapshot pushed into history can never alias the live graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortSchema {
    #[serde(default)]
    pub inputs: Vec<PortDefinition>,
    #[serde(default)]
    pub outputs: Vec<PortDefinition>,
}

impl PortSchema {
    pub fn new(inputs: Vec<PortDefinition>, outputs: Vec<PortDefinition>) -> Self {
        Self { inputs, outputs }
    }

    pub fn input(&self, name: &str) -> Option<&PortDefinition> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&PortDefinition> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// The canonical fallback handle for a port list: the first required
    /// port, else the first port.
    pub fn preferred_name(ports: &[PortDefinition]) -> Option<&str> {
        ports
            .iter()
            .find(|p| p.required)
            .or_else(|| ports.first())
            .map(|p| p.name.as_str())
    }
}
