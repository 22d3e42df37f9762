//! Connection legality: the type compatibility matrix and the port-level
//! validators gating every connect attempt.

mod compatibility;
mod connection;

pub use compatibility::{are_types_compatible, compatible_types};
pub use connection::{
    CompatibilityWarning, default_input_port, validate_multiple_connections,
    validate_port_connection, validate_required_inputs,
};
