//! Template documents: validation, export readiness, and import
//! materialization.

mod export;
mod import;
mod model;
mod validator;

pub use export::{validate_export, ExportValidation};
pub use import::{collapse, expand, materialize_template, ImportedGraph};
pub use model::{
    Author, Template, TemplateGraph, TemplateMetadata, Visibility, MAX_EDGES, MAX_NAME_LENGTH,
    MAX_NODES, MIN_NODES,
};
pub use validator::{is_valid_version, validate_rules, validate_structure};
