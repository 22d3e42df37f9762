//! # Keiro - Workflow Graph Consistency Engine
//!
//! **Keiro** is the consistency core of a node-based chatbot workflow
//! builder. It owns the canonical graph model (nodes, edges, port schemas,
//! variable bindings) and every operation that must keep that model
//! coherent: connection validation, cascading deletes, binding
//! normalization on load, undo history, and template import/export.
//!
//! ## Core Workflow
//!
//! The engine is UI-agnostic. An editor (or a persistence layer) feeds it
//! graphs in the serde shape of [`graph::Node`] and [`graph::Edge`]:
//!
//! 1.  **Load**: deserialize a stored graph and hand it to
//!     [`session::GraphSession::with_graph`].
//! 2.  **Normalize**: run [`session::GraphSession::normalize`] once so
//!     legacy port names, stale handles, and unbacked bindings are repaired
//!     before anything reads the graph.
//! 3.  **Mutate**: go through the session's operations
//!     ([`connect`](session::GraphSession::connect),
//!     [`delete_node`](session::GraphSession::delete_node), ...) so the
//!     consistency invariants hold after every step.
//! 4.  **Snapshot**: push states into [`history::History`] for undo/redo,
//!     and publish with [`template::validate_export`].
//!
//! ## Quick Start
//!
//! ```rust
//! use keiro::prelude::*;
//!
//! fn main() -> Result<(), ConnectionError> {
//!     let mut session = GraphSession::new();
//!     session.add_node(Node::new(
//!         "start-1",
//!         "Start",
//!         Position::new(0.0, 0.0),
//!         NodeKind::Start,
//!     ));
//!     session.add_node(Node::new(
//!         "llm-1",
//!         "Draft Reply",
//!         Position::new(250.0, 0.0),
//!         NodeKind::Llm(LlmConfig::default()),
//!     ));
//!
//!     // Validated connection: resolves ports, checks types, stores the
//!     // edge under its canonical id, and synthesizes the variable binding
//!     // on the target.
//!     let outcome = session.connect("start-1", Some("query"), "llm-1", Some("query"))?;
//!     assert_eq!(outcome.edge_id, "edge-start-1-llm-1");
//!
//!     let llm = session.node("llm-1").unwrap();
//!     assert!(llm.variable_mappings.contains_key("query"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod graph;
pub mod history;
pub mod normalize;
pub mod ports;
pub mod prelude;
pub mod remote;
pub mod session;
pub mod template;
pub mod traverse;
pub mod validate;
