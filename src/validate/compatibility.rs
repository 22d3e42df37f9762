use crate::graph::PortType;

/// Whether a source port of `source` type may feed a target port of
/// `target` type.
///
/// Identical types are compatible; `any` on either side is compatible with
/// everything; `array_file` additionally pairs with `array` and `file` in
/// both directions. All other heterogeneous pairs are incompatible.
pub fn are_types_compatible(source: PortType, target: PortType) -> bool {
    if source == target {
        return true;
    }
    if source == PortType::Any || target == PortType::Any {
        return true;
    }
    matches!(
        (source, target),
        (PortType::ArrayFile, PortType::Array)
            | (PortType::ArrayFile, PortType::File)
            | (PortType::Array, PortType::ArrayFile)
            | (PortType::File, PortType::ArrayFile)
    )
}

/// Every type compatible with `port_type`, in declaration order.
pub fn compatible_types(port_type: PortType) -> Vec<PortType> {
    const ALL: [PortType; 8] = [
        PortType::String,
        PortType::Number,
        PortType::Boolean,
        PortType::Array,
        PortType::Object,
        PortType::Any,
        PortType::File,
        PortType::ArrayFile,
    ];
    ALL.into_iter()
        .filter(|candidate| are_types_compatible(port_type, *candidate))
        .collect()
}
