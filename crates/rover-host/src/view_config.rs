use crate::error::{HostError, Result};
use crate::value::PropValue;
use smartstring::alias::String as SmartString;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Returns true when the value changed between `prev` and `next`
pub type DiffFn = fn(&PropValue, &PropValue) -> bool;

/// Encodes a value for the native side
pub type ProcessFn = fn(&PropValue) -> PropValue;

pub type AttributeMap = BTreeMap<SmartString, AttributeConfig>;

/// How a single attribute is compared and encoded
#[derive(Debug, Clone)]
pub enum AttributeConfig {
    /// Sent as-is, compared by value
    Plain,
    Custom {
        diff: Option<DiffFn>,
        process: Option<ProcessFn>,
    },
    /// Container attribute (e.g. `style`) whose keys are flattened into the payload
    Nested(AttributeMap),
}

impl AttributeConfig {
    pub fn process(process: ProcessFn) -> Self {
        AttributeConfig::Custom {
            diff: None,
            process: Some(process),
        }
    }

    pub fn diff(diff: DiffFn) -> Self {
        AttributeConfig::Custom {
            diff: Some(diff),
            process: None,
        }
    }

    pub(crate) fn changed(&self, prev: &PropValue, next: &PropValue) -> bool {
        match self {
            AttributeConfig::Custom {
                diff: Some(diff), ..
            } => diff(prev, next),
            _ => !prev.eq_value(next),
        }
    }

    pub(crate) fn encode(&self, value: &PropValue) -> PropValue {
        match self {
            AttributeConfig::Custom {
                process: Some(process),
                ..
            } if !value.is_nil() => process(value),
            _ => value.clone(),
        }
    }
}

/// Attribute schema of one native view class
#[derive(Debug, Clone)]
pub struct ViewConfig {
    native_class_name: SmartString,
    valid_attributes: AttributeMap,
}

impl ViewConfig {
    pub fn new(native_class_name: impl Into<SmartString>) -> Self {
        Self {
            native_class_name: native_class_name.into(),
            valid_attributes: AttributeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<SmartString>, config: AttributeConfig) -> Self {
        self.valid_attributes.insert(name.into(), config);
        self
    }

    /// Shorthand for a `style` attribute with the given nested keys
    pub fn with_style(mut self, style: AttributeMap) -> Self {
        self.valid_attributes
            .insert("style".into(), AttributeConfig::Nested(style));
        self
    }

    pub fn native_class_name(&self) -> &str {
        &self.native_class_name
    }

    pub fn valid_attributes(&self) -> &AttributeMap {
        &self.valid_attributes
    }

    /// Load a view config in the shape native modules report it:
    ///
    /// ```json
    /// { "uiViewClassName": "RCTView",
    ///   "validAttributes": { "opacity": true, "color": { "process": "color" },
    ///                        "style": { "width": true } } }
    /// ```
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| HostError::InvalidViewConfig("expected an object".into()))?;

        let name = object
            .get("uiViewClassName")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| HostError::InvalidViewConfig("missing uiViewClassName".into()))?;

        let attributes = match object.get("validAttributes") {
            None | Some(serde_json::Value::Null) => AttributeMap::new(),
            Some(raw) => parse_attributes(raw, "validAttributes")?,
        };

        Ok(Self {
            native_class_name: name.into(),
            valid_attributes: attributes,
        })
    }
}

fn parse_attributes(raw: &serde_json::Value, path: &str) -> Result<AttributeMap> {
    let object = raw
        .as_object()
        .ok_or_else(|| HostError::InvalidViewConfig(format!("{} must be an object", path)))?;

    let mut attributes = AttributeMap::new();
    for (name, entry) in object {
        let config = match entry {
            serde_json::Value::Bool(true) => AttributeConfig::Plain,
            serde_json::Value::Object(fields) if fields.contains_key("process") => {
                let process = fields["process"].as_str().ok_or_else(|| {
                    HostError::InvalidViewConfig(format!("{}.{}.process must be a string", path, name))
                })?;
                AttributeConfig::process(named_processor(process).ok_or_else(|| {
                    HostError::InvalidViewConfig(format!(
                        "{}.{}: unknown processor `{}`",
                        path, name, process
                    ))
                })?)
            }
            serde_json::Value::Object(_) => {
                AttributeConfig::Nested(parse_attributes(entry, &format!("{}.{}", path, name))?)
            }
            _ => {
                return Err(HostError::InvalidViewConfig(format!(
                    "{}.{} must be `true` or an object",
                    path, name
                )));
            }
        };
        attributes.insert(name.as_str().into(), config);
    }

    Ok(attributes)
}

fn named_processor(name: &str) -> Option<ProcessFn> {
    match name {
        "color" => Some(process_color),
        _ => None,
    }
}

/// Convert `#rgb`, `#rrggbb` or `#rrggbbaa` into a packed `0xAARRGGBB` integer.
/// Anything else passes through untouched.
pub fn process_color(value: &PropValue) -> PropValue {
    let Some(hex) = value.as_str().and_then(|s| s.strip_prefix('#')) else {
        return value.clone();
    };

    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };

    let parsed = match expanded.len() {
        6 => u32::from_str_radix(&expanded, 16).ok().map(|rgb| 0xff00_0000 | rgb),
        8 => u32::from_str_radix(&expanded, 16)
            .ok()
            .map(|rgba| (rgba << 24) | (rgba >> 8)),
        _ => None,
    };

    match parsed {
        Some(argb) => PropValue::Int(argb as i64),
        None => value.clone(),
    }
}

enum RegistryEntry {
    Pending(Box<dyn FnOnce() -> ViewConfig>),
    Loaded(Rc<ViewConfig>),
}

/// Lazily-built view configs keyed by native class name.
/// Every handle of one class shares the same `Rc<ViewConfig>`.
#[derive(Default)]
pub struct ViewConfigRegistry {
    entries: RefCell<HashMap<SmartString, RegistryEntry>>,
}

impl ViewConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader; it runs on the first `get` for this name
    pub fn register(
        &self,
        name: &str,
        loader: impl FnOnce() -> ViewConfig + 'static,
    ) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(name) {
            return Err(HostError::DuplicateViewConfig(name.to_string()));
        }
        entries.insert(name.into(), RegistryEntry::Pending(Box::new(loader)));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Rc<ViewConfig>> {
        let loader = {
            let mut entries = self.entries.borrow_mut();
            match entries.remove(name) {
                None => return Err(HostError::UnknownViewConfig(name.to_string())),
                Some(RegistryEntry::Loaded(config)) => {
                    entries.insert(name.into(), RegistryEntry::Loaded(Rc::clone(&config)));
                    return Ok(config);
                }
                Some(RegistryEntry::Pending(loader)) => loader,
            }
        };

        // Borrow released: loaders may look up other configs
        let config = loader();
        if config.native_class_name() != name {
            return Err(HostError::ViewConfigMismatch {
                expected: name.to_string(),
                found: config.native_class_name().to_string(),
            });
        }
        tracing::debug!("Loaded view config for {}", name);

        let config = Rc::new(config);
        self.entries
            .borrow_mut()
            .insert(name.into(), RegistryEntry::Loaded(Rc::clone(&config)));
        Ok(config)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let config = ViewConfig::from_json(&json!({
            "uiViewClassName": "RCTView",
            "validAttributes": {
                "opacity": true,
                "backgroundColor": { "process": "color" },
                "style": { "width": true, "height": true }
            }
        }))
        .unwrap();

        assert_eq!(config.native_class_name(), "RCTView");
        let attrs = config.valid_attributes();
        assert!(matches!(attrs["opacity"], AttributeConfig::Plain));
        assert!(matches!(
            attrs["backgroundColor"],
            AttributeConfig::Custom {
                process: Some(_),
                ..
            }
        ));
        match &attrs["style"] {
            AttributeConfig::Nested(style) => assert_eq!(style.len(), 2),
            other => panic!("Expected nested style, got {:?}", other),
        }
    }

    #[test]
    fn test_from_json_requires_class_name() {
        let err = ViewConfig::from_json(&json!({ "validAttributes": {} })).unwrap_err();
        assert!(matches!(err, HostError::InvalidViewConfig(_)));
    }

    #[test]
    fn test_from_json_rejects_unknown_processor() {
        let err = ViewConfig::from_json(&json!({
            "uiViewClassName": "RCTText",
            "validAttributes": { "color": { "process": "sparkle" } }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("sparkle"));
    }

    #[test]
    fn test_from_json_rejects_false_attribute() {
        let err = ViewConfig::from_json(&json!({
            "uiViewClassName": "RCTText",
            "validAttributes": { "color": false }
        }))
        .unwrap_err();
        assert!(matches!(err, HostError::InvalidViewConfig(_)));
    }

    #[test]
    fn test_process_color() {
        assert!(process_color(&"#ff0000".into()).eq_value(&PropValue::Int(0xffff0000)));
        assert!(process_color(&"#0f0".into()).eq_value(&PropValue::Int(0xff00ff00)));
        assert!(process_color(&"#0000ff80".into()).eq_value(&PropValue::Int(0x800000ff)));
        assert!(process_color(&"red".into()).eq_value(&PropValue::from("red")));
    }

    #[test]
    fn test_registry_shares_config() {
        let registry = ViewConfigRegistry::new();
        registry
            .register("RCTView", || ViewConfig::new("RCTView"))
            .unwrap();

        let a = registry.get("RCTView").unwrap();
        let b = registry.get("RCTView").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let registry = ViewConfigRegistry::new();
        registry
            .register("RCTView", || ViewConfig::new("RCTView"))
            .unwrap();
        let err = registry
            .register("RCTView", || ViewConfig::new("RCTView"))
            .unwrap_err();
        assert!(matches!(err, HostError::DuplicateViewConfig(_)));
    }

    #[test]
    fn test_registry_unknown_name() {
        let registry = ViewConfigRegistry::new();
        assert!(matches!(
            registry.get("RCTImage"),
            Err(HostError::UnknownViewConfig(_))
        ));
    }

    #[test]
    fn test_registry_mismatched_class_name() {
        let registry = ViewConfigRegistry::new();
        registry
            .register("RCTView", || ViewConfig::new("RCTText"))
            .unwrap();
        assert!(matches!(
            registry.get("RCTView"),
            Err(HostError::ViewConfigMismatch { .. })
        ));
    }

    #[test]
    fn test_registry_loader_can_extend_another_config() {
        let registry = Rc::new(ViewConfigRegistry::new());
        registry
            .register("RCTView", || {
                ViewConfig::new("RCTView").with_attribute("opacity", AttributeConfig::Plain)
            })
            .unwrap();

        let base = Rc::clone(&registry);
        registry
            .register("RCTText", move || {
                let view = base.get("RCTView").unwrap();
                let mut text = ViewConfig::new("RCTText");
                for (name, config) in view.valid_attributes() {
                    text = text.with_attribute(name.clone(), config.clone());
                }
                text.with_attribute("numberOfLines", AttributeConfig::Plain)
            })
            .unwrap();

        let text = registry.get("RCTText").unwrap();
        assert!(text.valid_attributes().contains_key("opacity"));
        assert!(text.valid_attributes().contains_key("numberOfLines"));
        assert!(Rc::ptr_eq(&text, &registry.get("RCTText").unwrap()));
        assert_eq!(registry.len(), 2);
    }
}
