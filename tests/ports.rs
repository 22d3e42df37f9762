//! Tests for dynamic port schema generation.

use keiro::graph::{
    AggregatorConfig, AggregatorSettings, AssignerConfig, AssignerOperation, BranchCase,
    BranchCondition, BranchConfig, ClassifierConfig, OperationInput, TopicClass, VariableGroup,
    VisionConfig, WriteMode,
};
use keiro::ports;
use keiro::prelude::*;

fn operation(write_mode: WriteMode, input_type: OperationInput) -> AssignerOperation {
    AssignerOperation {
        write_mode,
        input_type,
        constant_value: None,
        target_variable: None,
        source_variable: None,
    }
}

#[test]
fn test_assigner_with_no_operations_has_no_ports() {
    let schema = ports::generate(&NodeKind::Assigner(AssignerConfig::default())).unwrap();
    assert!(schema.inputs.is_empty());
    assert!(schema.outputs.is_empty());
}

#[test]
fn test_assigner_variable_operation_gets_value_port() {
    let config = AssignerConfig {
        operations: vec![operation(WriteMode::Overwrite, OperationInput::Variable)],
        ..AssignerConfig::default()
    };
    let schema = ports::generate(&NodeKind::Assigner(config)).unwrap();
    let names: Vec<&str> = schema.inputs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["operation_0_target", "operation_0_value"]);
    assert_eq!(schema.outputs[0].name, "operation_0_result");
}

#[test]
fn test_assigner_constant_operation_has_no_value_port() {
    let config = AssignerConfig {
        operations: vec![operation(WriteMode::Overwrite, OperationInput::Constant)],
        ..AssignerConfig::default()
    };
    let schema = ports::generate(&NodeKind::Assigner(config)).unwrap();
    let names: Vec<&str> = schema.inputs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["operation_0_target"]);
}

#[test]
fn test_assigner_non_consuming_write_modes_suppress_value_port() {
    for mode in [WriteMode::Clear, WriteMode::RemoveFirst, WriteMode::RemoveLast] {
        let config = AssignerConfig {
            operations: vec![operation(mode, OperationInput::Variable)],
            ..AssignerConfig::default()
        };
        let schema = ports::generate(&NodeKind::Assigner(config)).unwrap();
        assert_eq!(
            schema.inputs.len(),
            1,
            "{mode:?} operates on the target alone"
        );
    }
}

#[test]
fn test_branch_without_cases_still_has_if_and_else() {
    let schema = ports::generate(&NodeKind::IfElse(BranchConfig::default())).unwrap();
    let names: Vec<&str> = schema.outputs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["if", "else"]);
    assert!(schema.outputs.iter().all(|p| p.port_type == PortType::Boolean));
}

#[test]
fn test_branch_cases_produce_elif_outputs_and_distinct_inputs() {
    let condition = |selector: &str| BranchCondition {
        variable_selector: selector.to_string(),
        operator: "equals".to_string(),
        value: serde_json::json!("yes"),
    };
    let config = BranchConfig {
        cases: vec![
            BranchCase {
                id: "case_1".to_string(),
                conditions: vec![condition("llm-1.response"), condition("start-1.query")],
            },
            BranchCase {
                id: "case_2".to_string(),
                // Repeated selector must not duplicate the input port.
                conditions: vec![condition("llm-1.response")],
            },
        ],
    };
    let schema = ports::generate(&NodeKind::IfElse(config)).unwrap();
    let outputs: Vec<&str> = schema.outputs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(outputs, ["if", "elif_1", "else"]);
    let inputs: Vec<&str> = schema.inputs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(inputs, ["llm-1.response", "start-1.query"]);
    assert_eq!(schema.inputs[0].display_name, "response");
}

#[test]
fn test_classifier_vision_adds_files_port() {
    let without = ports::generate(&NodeKind::QuestionClassifier(ClassifierConfig::default()))
        .unwrap();
    assert!(without.input("files").is_none());

    let config = ClassifierConfig {
        vision: Some(VisionConfig { enabled: true }),
        ..ClassifierConfig::default()
    };
    let with = ports::generate(&NodeKind::QuestionClassifier(config)).unwrap();
    let files = with.input("files").expect("vision adds a files port");
    assert_eq!(files.port_type, PortType::ArrayFile);
}

#[test]
fn test_classifier_branch_per_class() {
    let config = ClassifierConfig {
        classes: vec![
            TopicClass {
                id: "class_billing".to_string(),
                name: "Billing".to_string(),
            },
            TopicClass {
                id: "shipping".to_string(),
                name: "Shipping".to_string(),
            },
        ],
        ..ClassifierConfig::default()
    };
    let schema = ports::generate(&NodeKind::QuestionClassifier(config)).unwrap();
    let outputs: Vec<&str> = schema.outputs.iter().map(|p| p.name.as_str()).collect();
    // Ids not already class_-prefixed get the prefix before the suffix.
    assert_eq!(
        outputs,
        ["class_name", "usage", "class_billing_branch", "class_shipping_branch"]
    );
}

#[test]
fn test_aggregator_flat_output() {
    let config = AggregatorConfig {
        output_type: PortType::String,
        variables: vec![
            vec!["llm-1".to_string(), "response".to_string()],
            vec!["kb-1".to_string(), "context".to_string()],
        ],
        ..AggregatorConfig::default()
    };
    let schema = ports::generate(&NodeKind::VariableAggregator(config)).unwrap();
    let inputs: Vec<&str> = schema.inputs.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(inputs, ["llm-1.response", "kb-1.context"]);
    assert_eq!(schema.outputs.len(), 1);
    assert_eq!(schema.outputs[0].name, "output");
    assert_eq!(schema.outputs[0].port_type, PortType::String);
}

#[test]
fn test_aggregator_grouped_outputs() {
    let config = AggregatorConfig {
        advanced_settings: AggregatorSettings {
            group_enabled: true,
            groups: vec![
                VariableGroup {
                    group_id: "g1".to_string(),
                    group_name: "answers".to_string(),
                    output_type: PortType::String,
                    variables: vec![vec!["llm-1".to_string(), "response".to_string()]],
                },
                VariableGroup {
                    group_id: "g2".to_string(),
                    group_name: "counts".to_string(),
                    output_type: PortType::Number,
                    variables: vec![vec!["kb-1".to_string(), "doc_count".to_string()]],
                },
            ],
        },
        ..AggregatorConfig::default()
    };
    let schema = ports::generate(&NodeKind::VariableAggregator(config)).unwrap();
    let outputs: Vec<(&str, PortType)> = schema
        .outputs
        .iter()
        .map(|p| (p.name.as_str(), p.port_type))
        .collect();
    assert_eq!(
        outputs,
        [("answers", PortType::String), ("counts", PortType::Number)]
    );
    assert_eq!(schema.inputs.len(), 2, "group variables become inputs");
}

#[test]
fn test_generation_is_pure() {
    let config = BranchConfig {
        cases: vec![BranchCase {
            id: "case_1".to_string(),
            conditions: vec![BranchCondition {
                variable_selector: "start-1.query".to_string(),
                operator: "contains".to_string(),
                value: serde_json::json!("refund"),
            }],
        }],
    };
    let kind = NodeKind::IfElse(config);
    assert_eq!(ports::generate(&kind), ports::generate(&kind));
}

#[test]
fn test_static_kinds_do_not_regenerate() {
    assert!(ports::generate(&NodeKind::Start).is_none());
    assert!(ports::generate(&NodeKind::End).is_none());
}
