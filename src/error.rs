use thiserror::Error;

use crate::graph::PortType;

/// Errors that reject a connection attempt synchronously at connect time.
/// The graph is left unchanged; no partial edge is ever created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    #[error("Node '{node_id}' not found")]
    NodeNotFound { node_id: String },

    #[error("Node '{node_id}' has no output port named '{port}'")]
    UnknownSourcePort { node_id: String, port: String },

    #[error("Node '{node_id}' has no input port named '{port}'")]
    UnknownTargetPort { node_id: String, port: String },

    #[error(
        "Type mismatch: '{source_port}' ({source_type}) cannot connect to '{target_port}' ({target_type})"
    )]
    IncompatibleTypes {
        source_port: String,
        source_type: PortType,
        target_port: String,
        target_type: PortType,
    },

    #[error("Port '{port}' is already connected")]
    PortAlreadyConnected { port: String },
}

/// Errors that block persistence of a graph. Never silently recovered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    #[error("The workflow has no start node")]
    MissingStartNode,

    #[error("The workflow has no end or answer node")]
    MissingTerminalNode,

    #[error("Node '{node_id}' has unconnected required input ports: {port_names}")]
    MissingRequiredInputs {
        node_id: String,
        /// Comma-joined display names of every unconnected required port.
        port_names: String,
    },
}

/// Template import/export failures. Import is all-or-nothing: on error no
/// composite node and no internal nodes are created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Template validation failed: {0}")]
    Validation(String),

    #[error("Template document is not an object")]
    NotAnObject,
}

impl TemplateError {
    pub fn from_errors(errors: &[String]) -> Self {
        TemplateError::Validation(errors.join(", "))
    }
}

/// A remote validation call that did not produce a verdict. The result is
/// "unknown", never coerced into a false "valid".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteValidationError {
    #[error("Remote validator unavailable: {0}")]
    Unavailable(String),

    #[error("Remote validator returned a malformed response: {0}")]
    MalformedResponse(String),
}
