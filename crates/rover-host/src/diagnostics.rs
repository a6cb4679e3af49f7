use crate::value::{PropMap, PropValue};
use crate::view_config::{AttributeConfig, AttributeMap};

/// Receiver for non-fatal development warnings
pub trait DiagnosticSink {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "rover_host", "{}", message);
    }
}

pub const MEASURE_LAYOUT_TARGET_WARNING: &str = "Warning: ref.measureLayout must be called with a node handle or a ref to a native component.";

/// Warnings for style keys passed as top-level props, which would otherwise
/// hide bugs where the style object should have been used.
pub fn warn_for_style_props(props: &PropMap, valid_attributes: &AttributeMap) -> Vec<String> {
    let Some(AttributeConfig::Nested(style)) = valid_attributes.get("style") else {
        return Vec::new();
    };

    style
        .keys()
        .filter_map(|key| {
            props.get(key).map(|value| {
                let value = match value {
                    PropValue::String(s) => s.to_string(),
                    other => other.to_string(),
                };
                format!(
                    "You are setting the style `{{ {key}: {value} }}` as a prop. You should nest it in a style object. E.g. `{{ style: {{ {key}: {value} }} }}`"
                )
            })
        })
        .collect()
}
