//! Typed side tables of vertex/edge annotations
//!
//! An [`AttributeStore`] maps (element id, key) to a value. The graph never validates
//! element ids stored here, and several stores may annotate the same graph.
//! An [`AttributeRegistry`] declares attribute names per category for schema-aware
//! exporters; it holds no values.

use crate::error::{illegal, GraphResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attribute value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(String),
}

impl AttributeValue {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeValue::Bool(_) => AttributeType::Boolean,
            AttributeValue::Int(_) => AttributeType::Int,
            AttributeValue::Long(_) => AttributeType::Long,
            AttributeValue::Double(_) => AttributeType::Double,
            AttributeValue::Str(_) => AttributeType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(i) => Some(i64::from(*i)),
            AttributeValue::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Int(i) => write!(f, "{}", i),
            AttributeValue::Long(l) => write!(f, "{}", l),
            AttributeValue::Double(d) => write!(f, "{}", d),
            AttributeValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Int(i)
    }
}

impl From<i64> for AttributeValue {
    fn from(l: i64) -> Self {
        AttributeValue::Long(l)
    }
}

impl From<f64> for AttributeValue {
    fn from(d: f64) -> Self {
        AttributeValue::Double(d)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Str(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Str(s)
    }
}

/// Declared type of a registered attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Boolean,
    Int,
    Long,
    Double,
    String,
}

impl AttributeType {
    /// Parse a default value written as text into this type
    pub fn parse_value(self, text: &str) -> GraphResult<AttributeValue> {
        Ok(match self {
            AttributeType::Boolean => AttributeValue::Bool(parse_as(text, self)?),
            AttributeType::Int => AttributeValue::Int(parse_as(text, self)?),
            AttributeType::Long => AttributeValue::Long(parse_as(text, self)?),
            AttributeType::Double => AttributeValue::Double(parse_as(text, self)?),
            AttributeType::String => AttributeValue::Str(text.to_string()),
        })
    }
}

fn parse_as<T: FromStr>(text: &str, attribute_type: AttributeType) -> GraphResult<T> {
    text.trim()
        .parse()
        .map_err(|_| illegal(format!("'{}' is not a valid {} value", text, attribute_type)))
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::Boolean => "boolean",
            AttributeType::Int => "int",
            AttributeType::Long => "long",
            AttributeType::Double => "double",
            AttributeType::String => "string",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for AttributeType {
    type Err = crate::error::GraphError;

    fn from_str(s: &str) -> GraphResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(AttributeType::Boolean),
            "int" | "integer" => Ok(AttributeType::Int),
            "long" => Ok(AttributeType::Long),
            "double" | "float" => Ok(AttributeType::Double),
            "string" => Ok(AttributeType::String),
            other => Err(illegal(format!("unknown attribute type '{}'", other))),
        }
    }
}

/// Per-element key/value annotations
#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    values: IndexMap<u64, IndexMap<String, AttributeValue>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous value under the same key
    pub fn put(&mut self, element: u64, key: &str, value: AttributeValue) {
        self.values.entry(element).or_default().insert(key.to_string(), value);
    }

    pub fn get(&self, element: u64, key: &str) -> Option<&AttributeValue> {
        self.values.get(&element).and_then(|attrs| attrs.get(key))
    }

    pub fn remove(&mut self, element: u64, key: &str) -> Option<AttributeValue> {
        let attrs = self.values.get_mut(&element)?;
        let removed = attrs.shift_remove(key);
        if attrs.is_empty() {
            self.values.shift_remove(&element);
        }
        removed
    }

    /// All attributes of one element in insertion order
    pub fn attributes_of(&self, element: u64) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values
            .get(&element)
            .into_iter()
            .flat_map(|attrs| attrs.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn elements(&self) -> impl Iterator<Item = u64> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A declared attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDeclaration {
    pub attribute_type: AttributeType,
    pub default: Option<AttributeValue>,
}

/// Attribute schema keyed by (name, category), where category is e.g. "node", "edge",
/// "graph" or "all"
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    declarations: IndexMap<(String, String), AttributeDeclaration>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare or redeclare an attribute; a textual default must parse as the declared type
    pub fn register(
        &mut self,
        name: &str,
        category: &str,
        attribute_type: AttributeType,
        default: Option<&str>,
    ) -> GraphResult<()> {
        if name.is_empty() {
            return Err(illegal("attribute name must not be empty"));
        }
        let default = default.map(|text| attribute_type.parse_value(text)).transpose()?;
        self.declarations.insert(
            (name.to_string(), category.to_string()),
            AttributeDeclaration { attribute_type, default },
        );
        Ok(())
    }

    pub fn unregister(&mut self, name: &str, category: &str) -> Option<AttributeDeclaration> {
        self.declarations.shift_remove(&(name.to_string(), category.to_string()))
    }

    pub fn get(&self, name: &str, category: &str) -> Option<&AttributeDeclaration> {
        self.declarations.get(&(name.to_string(), category.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &AttributeDeclaration)> {
        self.declarations
            .iter()
            .map(|((name, category), decl)| (name.as_str(), category.as_str(), decl))
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_put_get_remove() {
        let mut store = AttributeStore::new();
        store.put(1, "color", "red".into());
        store.put(1, "size", AttributeValue::Int(3));
        store.put(2, "color", "blue".into());

        assert_eq!(store.get(1, "color").and_then(|v| v.as_str()), Some("red"));
        assert_eq!(store.get(1, "size").and_then(|v| v.as_long()), Some(3));
        assert!(store.get(3, "color").is_none());
        assert_eq!(store.len(), 3);

        store.put(1, "color", "green".into());
        assert_eq!(store.get(1, "color"), Some(&AttributeValue::Str("green".into())));

        assert!(store.remove(2, "color").is_some());
        assert!(store.remove(2, "color").is_none());
        assert_eq!(store.elements().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_attributes_of_keeps_insertion_order() {
        let mut store = AttributeStore::new();
        store.put(7, "b", true.into());
        store.put(7, "a", 2.5.into());
        let keys: Vec<&str> = store.attributes_of(7).map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_registry() {
        let mut reg = AttributeRegistry::new();
        reg.register("weight", "edge", AttributeType::Double, Some("1.5")).unwrap();
        reg.register("label", "node", "string".parse().unwrap(), None).unwrap();

        let decl = reg.get("weight", "edge").unwrap();
        assert_eq!(decl.default, Some(AttributeValue::Double(1.5)));
        assert!(reg.get("weight", "node").is_none());

        assert!(reg.register("bad", "node", AttributeType::Int, Some("x")).is_err());
        assert_eq!(reg.len(), 2);
        assert!(reg.unregister("label", "node").is_some());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_unknown_type_name() {
        assert!("tensor".parse::<AttributeType>().is_err());
        assert_eq!("Long".parse::<AttributeType>().unwrap(), AttributeType::Long);
    }
}
