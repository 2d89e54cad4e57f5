//! Dynamic document values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::reflect::{Reflect, Shape};
use crate::schema::{ShapeInfo, TypeInfo};

/// Value is a parsed JSON/YAML document node.
///
/// For the differ a `Value` is a union slot: `Null` is the empty union and
/// every other variant carries a dynamically typed payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

/// Map is a document mapping, kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Map {
    pub fields: BTreeMap<String, Value>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the payload held by the union, or `None` for `Null`.
    pub fn payload(&self) -> Option<&dyn Reflect> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b),
            Value::Int(i) => Some(i),
            Value::Float(f) => Some(f),
            Value::String(s) => Some(s),
            Value::List(l) => Some(l),
            Value::Map(m) => Some(m),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl Reflect for Value {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<Value>(ShapeInfo::Union)
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Union(self.payload())
    }
}

impl Map {
    pub fn new() -> Self {
        Map {
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Map {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Reflect for Map {
    fn static_type() -> TypeInfo {
        TypeInfo::new::<Map>(ShapeInfo::Map {
            key: String::static_type,
            value: Value::static_type,
        })
    }

    fn type_info(&self) -> TypeInfo {
        Self::static_type()
    }

    fn reflect(&self) -> Shape<'_> {
        Shape::Map(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v as &dyn Reflect))
                .collect(),
        )
    }
}

/// Parse a value from JSON.
pub fn from_json(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Serialize a value to JSON.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Parse a value from YAML.
pub fn from_yaml(yaml: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

/// Serialize a value to YAML.
pub fn to_yaml(value: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(value)
}
