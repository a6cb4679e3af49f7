use serde::Serialize;
use smartstring::alias::String as SmartString;
use std::collections::BTreeMap;
use std::fmt;

/// Property bag passed to `set_native_props`
pub type PropMap = BTreeMap<SmartString, PropValue>;

/// PropValue represents a single property value headed for a native view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(SmartString),
    Array(Vec<PropValue>),
    Map(PropMap),
}

impl PropValue {
    /// Compare values for change detection
    pub fn eq_value(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Nil, PropValue::Nil) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (PropValue::String(a), PropValue::String(b)) => a == b,
            (PropValue::Array(a), PropValue::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_value(y))
            }
            (PropValue::Map(a), PropValue::Map(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.eq_value(vb))
            }
            _ => false,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, PropValue::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&PropMap> {
        match self {
            PropValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropValue::Nil,
            serde_json::Value::Bool(b) => PropValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => PropValue::Int(i),
                None => PropValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => PropValue::String(s.into()),
            serde_json::Value::Array(items) => {
                PropValue::Array(items.into_iter().map(PropValue::from).collect())
            }
            serde_json::Value::Object(entries) => PropValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (SmartString::from(k), PropValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value.into())
    }
}

impl From<PropMap> for PropValue {
    fn from(value: PropMap) -> Self {
        PropValue::Map(value)
    }
}

/// Build a `PropMap` from `(name, value)` pairs
pub fn props<K, V, I>(entries: I) -> PropMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<SmartString>,
    V: Into<PropValue>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_equality() {
        assert!(PropValue::Float(0.5).eq_value(&PropValue::Float(0.5)));
        assert!(!PropValue::Float(0.5).eq_value(&PropValue::Float(0.25)));
        assert!(PropValue::Float(f64::NAN).eq_value(&PropValue::Float(f64::NAN)));
    }

    #[test]
    fn test_int_and_float_are_distinct() {
        assert!(!PropValue::Int(1).eq_value(&PropValue::Float(1.0)));
    }

    #[test]
    fn test_map_equality() {
        let a = PropValue::Map(props([("opacity", 0.5), ("width", 10.0)]));
        let b = PropValue::Map(props([("width", 10.0), ("opacity", 0.5)]));
        let c = PropValue::Map(props([("opacity", 0.75), ("width", 10.0)]));

        assert!(a.eq_value(&b));
        assert!(!a.eq_value(&c));
    }

    #[test]
    fn test_from_json() {
        let value = PropValue::from(serde_json::json!({
            "opacity": 0.5,
            "zIndex": 3,
            "hidden": false,
            "transform": [{ "scale": 2 }],
            "testID": null,
        }));

        let map = value.as_map().unwrap();
        assert!(map["opacity"].eq_value(&PropValue::Float(0.5)));
        assert!(map["zIndex"].eq_value(&PropValue::Int(3)));
        assert!(map["hidden"].eq_value(&PropValue::Bool(false)));
        assert!(map["testID"].is_nil());
        assert!(matches!(map["transform"], PropValue::Array(ref items) if items.len() == 1));
    }

    #[test]
    fn test_display_is_json() {
        assert_eq!(PropValue::from("red").to_string(), "\"red\"");
        assert_eq!(PropValue::Nil.to_string(), "null");
        assert_eq!(PropValue::Int(4).to_string(), "4");
    }
}
