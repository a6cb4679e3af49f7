use crate::value::{PropMap, PropValue};
use crate::view_config::{AttributeConfig, AttributeMap};
use serde::Serialize;
use smartstring::alias::String as SmartString;
use std::collections::BTreeMap;

/// Minimal set of attribute changes sent to the native view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UpdatePayload {
    entries: BTreeMap<SmartString, PropValue>,
}

impl UpdatePayload {
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn insert(&mut self, name: impl Into<SmartString>, value: PropValue) {
        self.entries.insert(name.into(), value);
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl IntoIterator for UpdatePayload {
    type Item = (SmartString, PropValue);
    type IntoIter = std::collections::btree_map::IntoIter<SmartString, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Turns a property bag into an update payload, or `None` when nothing changed
pub trait PayloadBuilder {
    fn create(&self, props: &PropMap, valid_attributes: &AttributeMap) -> Option<UpdatePayload>;
}

/// Default payload builder: diffs against an empty previous bag
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributePayload;

impl AttributePayload {
    /// Compute the changes between two property bags.
    ///
    /// Unknown attributes are dropped and nested attributes (style) are
    /// flattened into the payload. Within a style array later entries win, and
    /// style entries win over top-level props of the same name. Valid keys
    /// missing from `next` are reset with `Nil`.
    pub fn diff(
        prev: &PropMap,
        next: &PropMap,
        valid_attributes: &AttributeMap,
    ) -> Option<UpdatePayload> {
        let prev = flatten(prev, valid_attributes);
        let next = flatten(next, valid_attributes);
        let mut payload = UpdatePayload::default();

        for (name, (value, config)) in &next {
            let changed = match prev.get(name) {
                Some((old, _)) => config.changed(old, value),
                None => true,
            };
            if changed {
                payload.insert(name.clone(), config.encode(value));
            }
        }

        for name in prev.keys() {
            if !next.contains_key(name) {
                payload.insert(name.clone(), PropValue::Nil);
            }
        }

        (!payload.is_empty()).then_some(payload)
    }
}

impl PayloadBuilder for AttributePayload {
    fn create(&self, props: &PropMap, valid_attributes: &AttributeMap) -> Option<UpdatePayload> {
        Self::diff(&PropMap::new(), props, valid_attributes)
    }
}

type Flattened<'a> = BTreeMap<SmartString, (&'a PropValue, &'a AttributeConfig)>;

/// Plain attributes are collected first and nested containers second, so a
/// style entry wins over a top-level prop of the same name.
fn flatten<'a>(props: &'a PropMap, attributes: &'a AttributeMap) -> Flattened<'a> {
    let mut out = Flattened::new();
    let mut nested = Vec::new();
    for (name, value) in props {
        match attributes.get(name) {
            None => {}
            Some(AttributeConfig::Nested(inner)) => nested.push((value, inner)),
            Some(config) => {
                out.insert(name.clone(), (value, config));
            }
        }
    }
    for (value, inner) in nested {
        flatten_nested(value, inner, &mut out);
    }
    out
}

fn flatten_nested<'a>(value: &'a PropValue, attributes: &'a AttributeMap, out: &mut Flattened<'a>) {
    match value {
        PropValue::Map(entries) => {
            for (name, value) in entries {
                match attributes.get(name) {
                    None => {}
                    Some(AttributeConfig::Nested(deeper)) => flatten_nested(value, deeper, out),
                    Some(config) => {
                        out.insert(name.clone(), (value, config));
                    }
                }
            }
        }
        // Style arrays apply in order
        PropValue::Array(items) => {
            for item in items {
                flatten_nested(item, attributes, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::props;
    use crate::view_config::{ViewConfig, process_color};

    fn view_config() -> ViewConfig {
        let mut style = AttributeMap::new();
        style.insert("opacity".into(), AttributeConfig::Plain);
        style.insert("width".into(), AttributeConfig::Plain);
        style.insert("color".into(), AttributeConfig::process(process_color));

        ViewConfig::new("RCTView")
            .with_attribute("testID", AttributeConfig::Plain)
            .with_attribute("opacity", AttributeConfig::Plain)
            .with_style(style)
    }

    #[test]
    fn test_create_emits_valid_attributes_only() {
        let config = view_config();
        let payload = AttributePayload
            .create(
                &props([("opacity", PropValue::Float(0.5)), ("bogus", PropValue::Int(1))]),
                config.valid_attributes(),
            )
            .unwrap();

        assert_eq!(payload.len(), 1);
        assert!(payload.get("opacity").unwrap().eq_value(&PropValue::Float(0.5)));
        assert!(!payload.contains("bogus"));
    }

    #[test]
    fn test_create_returns_none_without_valid_attributes() {
        let config = view_config();
        assert!(
            AttributePayload
                .create(&props([("bogus", 1)]), config.valid_attributes())
                .is_none()
        );
        assert!(
            AttributePayload
                .create(&PropMap::new(), config.valid_attributes())
                .is_none()
        );
    }

    #[test]
    fn test_create_flattens_style() {
        let config = view_config();
        let style = PropValue::Map(props([("width", PropValue::Int(10)), ("color", "#ff0000".into())]));
        let payload = AttributePayload
            .create(&props([("style", style)]), config.valid_attributes())
            .unwrap();

        assert!(!payload.contains("style"));
        assert!(payload.get("width").unwrap().eq_value(&PropValue::Int(10)));
        assert!(payload.get("color").unwrap().eq_value(&PropValue::Int(0xffff0000)));
    }

    #[test]
    fn test_style_array_last_entry_wins() {
        let config = view_config();
        let style = PropValue::Array(vec![
            PropValue::Map(props([("width", 10)])),
            PropValue::Map(props([("width", 20)])),
        ]);
        let payload = AttributePayload
            .create(&props([("style", style)]), config.valid_attributes())
            .unwrap();

        assert!(payload.get("width").unwrap().eq_value(&PropValue::Int(20)));
    }

    #[test]
    fn test_style_entry_wins_over_top_level_prop() {
        let mut style = AttributeMap::new();
        style.insert("opacity".into(), AttributeConfig::Plain);
        style.insert("width".into(), AttributeConfig::Plain);
        let config = ViewConfig::new("RCTView")
            .with_attribute("opacity", AttributeConfig::Plain)
            .with_attribute("width", AttributeConfig::Plain)
            .with_style(style);

        let payload = AttributePayload
            .create(
                &props([
                    ("opacity", PropValue::Float(0.9)),
                    ("width", PropValue::Int(5)),
                    (
                        "style",
                        PropValue::Map(props([
                            ("opacity", PropValue::Float(0.2)),
                            ("width", PropValue::Int(10)),
                        ])),
                    ),
                ]),
                config.valid_attributes(),
            )
            .unwrap();

        let entries: Vec<(&str, &PropValue)> = payload.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "opacity");
        assert!(entries[0].1.eq_value(&PropValue::Float(0.2)));
        assert_eq!(entries[1].0, "width");
        assert!(entries[1].1.eq_value(&PropValue::Int(10)));
    }

    #[test]
    fn test_create_keeps_explicit_nil() {
        let config = view_config();
        let payload = AttributePayload
            .create(&props([("testID", PropValue::Nil)]), config.valid_attributes())
            .unwrap();

        assert!(payload.get("testID").unwrap().is_nil());
    }

    #[test]
    fn test_diff_skips_unchanged_and_resets_removed() {
        let config = view_config();
        let prev = props([("opacity", PropValue::Float(0.5)), ("testID", "a".into())]);
        let next = props([("opacity", PropValue::Float(0.5))]);

        let payload = AttributePayload::diff(&prev, &next, config.valid_attributes()).unwrap();
        assert_eq!(payload.len(), 1);
        assert!(payload.get("testID").unwrap().is_nil());
    }

    #[test]
    fn test_diff_identical_is_none() {
        let config = view_config();
        let bag = props([("opacity", PropValue::Float(0.5))]);
        assert!(AttributePayload::diff(&bag, &bag, config.valid_attributes()).is_none());
    }

    #[test]
    fn test_custom_diff() {
        fn never_changes(_: &PropValue, _: &PropValue) -> bool {
            false
        }

        let config = ViewConfig::new("RCTView")
            .with_attribute("transform", AttributeConfig::diff(never_changes));
        let prev = props([("transform", 1)]);
        let next = props([("transform", 2)]);

        assert!(AttributePayload::diff(&prev, &next, config.valid_attributes()).is_none());
    }

    #[test]
    fn test_payload_to_json() {
        let config = view_config();
        let payload = AttributePayload
            .create(&props([("opacity", PropValue::Float(0.5))]), config.valid_attributes())
            .unwrap();

        assert_eq!(payload.to_json(), serde_json::json!({ "opacity": 0.5 }));
    }
}
