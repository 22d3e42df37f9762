use crate::graph::{BranchCase, BranchConfig, PortDefinition, PortSchema, PortType};

/// A single always-true case, used so a branch node is never generated with
/// an empty output list.
pub fn default_branch_case() -> BranchCase {
    BranchCase {
        id: "case_1".to_string(),
        conditions: Vec::new(),
    }
}

/// Port schema of an If-Else node.
///
/// Inputs: one `any`-typed port per distinct variable referenced by any
/// condition, named by its selector. Outputs: one boolean port per case
/// (`if`, `elif_1`, ...) plus the implicit `else` branch.
pub fn generate(config: &BranchConfig) -> PortSchema {
    let ensured;
    let cases: &[BranchCase] = if config.cases.is_empty() {
        ensured = [default_branch_case()];
        &ensured
    } else {
        &config.cases
    };

    let mut seen = Vec::new();
    for case in cases {
        for condition in &case.conditions {
            if !condition.variable_selector.is_empty()
                && !seen.iter().any(|s| s == &condition.variable_selector)
            {
                seen.push(condition.variable_selector.clone());
            }
        }
    }

    let inputs = seen
        .into_iter()
        .map(|selector| {
            let display = selector
                .rsplit('.')
                .next()
                .unwrap_or(selector.as_str())
                .to_string();
            PortDefinition::new(&selector, PortType::Any, false)
                .with_display_name(&display)
                .with_description(&format!("Variable: {}", selector))
        })
        .collect();

    let mut outputs: Vec<PortDefinition> = cases
        .iter()
        .enumerate()
        .map(|(index, _)| {
            let (name, display) = if index == 0 {
                ("if".to_string(), "IF".to_string())
            } else {
                (format!("elif_{}", index), format!("ELIF {}", index))
            };
            PortDefinition::new(&name, PortType::Boolean, true)
                .with_display_name(&display)
                .with_description(&format!("{} branch output (conditions matched)", display))
        })
        .collect();

    outputs.push(
        PortDefinition::new("else", PortType::Boolean, true)
            .with_display_name("ELSE")
            .with_description("ELSE branch output (no conditions matched)"),
    );

    PortSchema::new(inputs, outputs)
}
