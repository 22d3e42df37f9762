use crate::graph::{ClassifierConfig, PortDefinition, PortSchema, PortType, TopicClass};

pub fn default_classes() -> Vec<TopicClass> {
    vec![TopicClass {
        id: "class_1".to_string(),
        name: String::new(),
    }]
}

/// Port schema of a Question Classifier node.
///
/// Inputs: the text to classify, plus image files when vision is enabled.
/// Outputs: the selected class name, token usage, and one boolean branch per
/// class.
pub fn generate(config: &ClassifierConfig) -> PortSchema {
    let mut inputs = vec![
        PortDefinition::new("query", PortType::String, true)
            .with_display_name("Query")
            .with_description("Text to classify"),
    ];

    if config.vision.is_some_and(|v| v.enabled) {
        inputs.push(
            PortDefinition::new("files", PortType::ArrayFile, false)
                .with_display_name("Files")
                .with_description("Image files for vision classification"),
        );
    }

    let mut outputs = vec![
        PortDefinition::new("class_name", PortType::String, true)
            .with_display_name("Class Name")
            .with_description("Selected class name"),
        PortDefinition::new("usage", PortType::Object, true)
            .with_display_name("Usage")
            .with_description("LLM token usage information"),
    ];

    let ensured;
    let classes: &[TopicClass] = if config.classes.is_empty() {
        ensured = default_classes();
        &ensured
    } else {
        &config.classes
    };

    for topic in classes {
        let base = if topic.id.starts_with("class_") {
            topic.id.clone()
        } else {
            format!("class_{}", topic.id)
        };
        let display = if topic.name.is_empty() {
            "Unnamed"
        } else {
            topic.name.as_str()
        };
        outputs.push(
            PortDefinition::new(&format!("{}_branch", base), PortType::Boolean, true)
                .with_display_name(display)
                .with_description(&format!("Branch for class: {}", display)),
        );
    }

    PortSchema::new(inputs, outputs)
}
