use crate::graph::{AssignerConfig, OperationInput, PortDefinition, PortSchema, PortType};

/// Port schema of an Assigner node, regenerated on every operation change.
///
/// Per operation *i*: input `operation_{i}_target` always; input
/// `operation_{i}_value` only when the operation reads a variable and its
/// write mode consumes a value; output `operation_{i}_result`. An empty
/// operation list yields an empty schema.
pub fn generate(config: &AssignerConfig) -> PortSchema {
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    for (index, operation) in config.operations.iter().enumerate() {
        inputs.push(
            PortDefinition::new(&format!("operation_{}_target", index), PortType::Any, true)
                .with_display_name(&format!("Operation {} target", index))
                .with_description("Conversation variable to write"),
        );

        if operation.input_type == OperationInput::Variable
            && operation.write_mode.consumes_value()
        {
            inputs.push(
                PortDefinition::new(&format!("operation_{}_value", index), PortType::Any, false)
                    .with_display_name(&format!("Operation {} value", index))
                    .with_description("Variable providing the written value"),
            );
        }

        outputs.push(
            PortDefinition::new(&format!("operation_{}_result", index), PortType::Any, false)
                .with_display_name(&format!("Operation {} result", index))
                .with_description("Value after the write"),
        );
    }

    PortSchema::new(inputs, outputs)
}
