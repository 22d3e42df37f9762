use crate::graph::{AggregatorConfig, PortDefinition, PortSchema, PortType};

/// Port schema of a Variable Aggregator node.
///
/// One `any`-typed input per declared selector. Without grouping a single
/// `output` port of the declared type; with grouping one output per named
/// group, typed by the group.
pub fn generate(config: &AggregatorConfig) -> PortSchema {
    let grouped = config.group_variables();

    let inputs = grouped
        .iter()
        .map(|selector| {
            let path = selector.join(".");
            let display = selector.last().cloned().unwrap_or_else(|| path.clone());
            PortDefinition::new(&path, PortType::Any, false)
                .with_display_name(&display)
                .with_description(&format!("Aggregated variable: {}", path))
        })
        .collect();

    let outputs = if config.advanced_settings.group_enabled {
        config
            .advanced_settings
            .groups
            .iter()
            .map(|group| {
                PortDefinition::new(&group.group_name, group.output_type, true)
                    .with_display_name(&group.group_name)
                    .with_description("Group output")
            })
            .collect()
    } else {
        vec![
            PortDefinition::new("output", config.output_type, true)
                .with_display_name("Output")
                .with_description("Aggregated output"),
        ]
    };

    PortSchema::new(inputs, outputs)
}

trait GroupVariables {
    fn group_variables(&self) -> Vec<Vec<String>>;
}

impl GroupVariables for AggregatorConfig {
    /// Distinct selectors across the flat list and every group, declaration
    /// order preserved.
    fn group_variables(&self) -> Vec<Vec<String>> {
        let mut seen: Vec<Vec<String>> = Vec::new();
        let flat = self.variables.iter();
        let grouped = self
            .advanced_settings
            .groups
            .iter()
            .flat_map(|g| g.variables.iter());
        for selector in flat.chain(grouped) {
            if !selector.is_empty() && !seen.contains(selector) {
                seen.push(selector.clone());
            }
        }
        seen
    }
}
