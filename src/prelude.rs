//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need: the graph model, the session,
//! and the error taxonomy. Import this module instead of naming each type
//! individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! let mut session = GraphSession::new();
//! session.add_node(Node::new(
//!     "start-1",
//!     "Start",
//!     Position::new(0.0, 0.0),
//!     NodeKind::Start,
//! ));
//! session.normalize();
//! ```

// The session and its query results
pub use crate::session::{AvailableVariable, ConnectOutcome, GraphSession, SessionVariable};

// Graph model
pub use crate::graph::{
    Binding, Edge, LlmConfig, Node, NodeFlags, NodeKind, PortDefinition, PortSchema, PortType,
    Position, ValueSelector,
};

// Validation and errors
pub use crate::error::{ConnectionError, StructuralError, TemplateError};
pub use crate::validate::CompatibilityWarning;

// History and templates
pub use crate::history::History;
pub use crate::template::{Template, Visibility};
