//! Schema-migration rename tables.
//!
//! Port names that shipped in older graphs are rewritten to their current
//! names so persisted bindings and edge handles stay resolvable after a
//! schema migration. Tables are keyed by node kind name; the global table
//! applies to every kind.

const GLOBAL_RENAMES: &[(&str, &str)] = &[("user_message", "query")];

const START_OUTPUT_RENAMES: &[(&str, &str)] = &[("message", "query")];

const LLM_INPUT_RENAMES: &[(&str, &str)] = &[("question", "query")];
const LLM_OUTPUT_RENAMES: &[(&str, &str)] = &[("completion", "response"), ("answer", "response")];

const END_INPUT_RENAMES: &[(&str, &str)] = &[("answer", "response")];

fn lookup(table: &[(&str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(old, _)| *old == name)
        .map(|(_, new)| *new)
}

/// Current name for an input port of the given kind, `None` when the name
/// is not a known legacy alias.
pub fn renamed_input(kind_name: &str, port: &str) -> Option<&'static str> {
    let per_kind = match kind_name {
        "llm" => lookup(LLM_INPUT_RENAMES, port),
        "end" | "answer" => lookup(END_INPUT_RENAMES, port),
        _ => None,
    };
    per_kind.or_else(|| lookup(GLOBAL_RENAMES, port))
}

/// Current name for an output port of the given kind.
pub fn renamed_output(kind_name: &str, port: &str) -> Option<&'static str> {
    let per_kind = match kind_name {
        "start" => lookup(START_OUTPUT_RENAMES, port),
        "llm" => lookup(LLM_OUTPUT_RENAMES, port),
        _ => None,
    };
    per_kind.or_else(|| lookup(GLOBAL_RENAMES, port))
}
