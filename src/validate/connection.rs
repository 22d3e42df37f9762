use std::fmt;

use ahash::AHashSet;
use itertools::Itertools;

use crate::error::{ConnectionError, StructuralError};
use crate::graph::{PortDefinition, PortType};

use super::compatibility::are_types_compatible;

/// Non-fatal notice attached to a legal connection whose real type is only
/// knowable at runtime (`any` paired with a concrete type).
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityWarning {
    pub source_type: PortType,
    pub target_type: PortType,
}

impl fmt::Display for CompatibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "any-typed connection ({} -> {}): runtime type check required",
            self.source_type, self.target_type
        )
    }
}

/// Decides whether an output port may legally connect to an input port.
///
/// Returns the optional warning for a legal-but-untyped pairing, or a
/// [`ConnectionError::IncompatibleTypes`] rejection.
pub fn validate_port_connection(
    source: &PortDefinition,
    target: &PortDefinition,
) -> Result<Option<CompatibilityWarning>, ConnectionError> {
    if !are_types_compatible(source.port_type, target.port_type) {
        return Err(ConnectionError::IncompatibleTypes {
            source_port: source.display_name.clone(),
            source_type: source.port_type,
            target_port: target.display_name.clone(),
            target_type: target.port_type,
        });
    }

    let involves_any =
        source.port_type == PortType::Any || target.port_type == PortType::Any;
    if involves_any && source.port_type != target.port_type {
        return Ok(Some(CompatibilityWarning {
            source_type: source.port_type,
            target_type: target.port_type,
        }));
    }

    Ok(None)
}

/// Fails when any required input port is not in `connected`, listing every
/// missing port's display name.
pub fn validate_required_inputs(
    node_id: &str,
    input_ports: &[PortDefinition],
    connected: &AHashSet<String>,
) -> Result<(), StructuralError> {
    let missing: Vec<&PortDefinition> = input_ports
        .iter()
        .filter(|port| port.required && !connected.contains(&port.name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(StructuralError::MissingRequiredInputs {
        node_id: node_id.to_string(),
        port_names: missing.iter().map(|p| p.display_name.as_str()).join(", "),
    })
}

/// Rejects a second connection to an already-connected port unless multiple
/// connections are allowed.
pub fn validate_multiple_connections(
    port_name: &str,
    existing_connections: &[String],
    allow_multiple: bool,
) -> Result<(), ConnectionError> {
    if !allow_multiple && existing_connections.iter().any(|p| p == port_name) {
        return Err(ConnectionError::PortAlreadyConnected {
            port: port_name.to_string(),
        });
    }
    Ok(())
}

/// The generic handle synthesized for a target node that declares no input
/// ports at all, keeping placeholder and legacy nodes connectable.
pub fn default_input_port(handle: &str) -> PortDefinition {
    PortDefinition::new(handle, PortType::Any, false)
        .with_display_name(handle)
        .with_description("default handle")
}
