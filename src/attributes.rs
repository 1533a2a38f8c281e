// 🏷️ Attribute Layer - Typed values + default schemas
// Models carry an open bag of attributes; variants only declare defaults

use serde_json::Value;
use std::fmt;
use thiserror::Error;

// ============================================================================
// ATTRIBUTE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
    Integer,
    Float,
    Boolean,
    List,
}

impl AttributeType {
    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Integer => "integer",
            AttributeType::Float => "float",
            AttributeType::Boolean => "boolean",
            AttributeType::List => "list",
        }
    }

    /// Value a declared attribute has before anything sets it
    pub fn zero_value(&self) -> AttributeValue {
        match self {
            AttributeType::String => AttributeValue::String(String::new()),
            AttributeType::Integer => AttributeValue::Integer(0),
            AttributeType::Float => AttributeValue::Float(0.0),
            AttributeType::Boolean => AttributeValue::Boolean(false),
            AttributeType::List => AttributeValue::List(Vec::new()),
        }
    }

    /// Coerce raw console text into this type
    ///
    /// List attributes expect a `[...]` literal; everything else parses
    /// the text directly.
    pub fn coerce_text(&self, raw: &str) -> Result<AttributeValue, CoercionError> {
        let mismatch = || CoercionError::Mismatch {
            expected: *self,
            found: raw.to_string(),
        };

        match self {
            AttributeType::String => Ok(AttributeValue::String(raw.to_string())),
            AttributeType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(AttributeValue::Integer)
                .map_err(|_| mismatch()),
            AttributeType::Float => match raw.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(AttributeValue::Float(f)),
                _ => Err(mismatch()),
            },
            AttributeType::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" => Ok(AttributeValue::Boolean(true)),
                "false" => Ok(AttributeValue::Boolean(false)),
                _ => Err(mismatch()),
            },
            AttributeType::List => {
                let parsed = crate::command::literal::parse_literal(raw).map_err(|_| mismatch())?;
                match AttributeValue::from_json(&parsed) {
                    Ok(list @ AttributeValue::List(_)) => Ok(list),
                    _ => Err(mismatch()),
                }
            }
        }
    }

    /// Coerce an already-typed value (from a dict literal) into this type
    pub fn coerce_value(&self, value: AttributeValue) -> Result<AttributeValue, CoercionError> {
        match (self, value) {
            (AttributeType::String, AttributeValue::String(s)) => Ok(AttributeValue::String(s)),
            (AttributeType::String, other) => Ok(AttributeValue::String(other.to_plain_string())),
            (AttributeType::Integer, AttributeValue::Integer(i)) => Ok(AttributeValue::Integer(i)),
            (AttributeType::Integer, AttributeValue::Float(f))
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 =>
            {
                Ok(AttributeValue::Integer(f as i64))
            }
            (AttributeType::Float, AttributeValue::Float(f)) => Ok(AttributeValue::Float(f)),
            (AttributeType::Float, AttributeValue::Integer(i)) => Ok(AttributeValue::Float(i as f64)),
            (AttributeType::Boolean, AttributeValue::Boolean(b)) => Ok(AttributeValue::Boolean(b)),
            (AttributeType::List, AttributeValue::List(items)) => Ok(AttributeValue::List(items)),
            (ty, AttributeValue::String(s)) => ty.coerce_text(&s),
            (ty, other) => Err(CoercionError::Mismatch {
                expected: *ty,
                found: other.to_plain_string(),
            }),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("expected {expected} value, got {found:?}")]
    Mismatch { expected: AttributeType, found: String },

    #[error("unsupported attribute value: {0}")]
    Unsupported(String),
}

// ============================================================================
// ATTRIBUTE VALUE
// ============================================================================

/// A single attribute value stored in a model's attribute bag
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Convert a JSON value into an attribute value
    ///
    /// Objects and nulls have no attribute representation and are rejected.
    pub fn from_json(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::String(s) => Ok(AttributeValue::String(s.clone())),
            Value::Bool(b) => Ok(AttributeValue::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(AttributeValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(AttributeValue::Float(f))
                } else {
                    Err(CoercionError::Unsupported(n.to_string()))
                }
            }
            Value::Array(items) => items
                .iter()
                .map(AttributeValue::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(AttributeValue::List),
            Value::Null | Value::Object(_) => Err(CoercionError::Unsupported(value.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::String(s) => Value::String(s.clone()),
            AttributeValue::Integer(i) => Value::from(*i),
            AttributeValue::Float(f) => Value::from(*f),
            AttributeValue::Boolean(b) => Value::Bool(*b),
            AttributeValue::List(items) => Value::Array(items.iter().map(|v| v.to_json()).collect()),
        }
    }

    /// Text form without quoting (used when a typed value lands in a string slot)
    pub fn to_plain_string(&self) -> String {
        match self {
            AttributeValue::String(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

/// Python-style repr, so a rendered model reads like `{'name': 'x', 'rooms': 3}`
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(x) => write!(f, "{:?}", x),
            AttributeValue::Boolean(true) => f.write_str("True"),
            AttributeValue::Boolean(false) => f.write_str("False"),
            AttributeValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

// ============================================================================
// ATTRIBUTE DEFINITION
// ============================================================================

/// AttributeDefinition - one declared default attribute of a variant
#[derive(Debug, Clone)]
pub struct AttributeDefinition {
    /// Attribute name as it appears in the bag (e.g., "number_rooms")
    pub name: String,

    /// Type the console coerces update values into
    pub type_: AttributeType,

    /// What does this attribute mean?
    pub description: String,

    /// Value reported before the attribute is ever set
    pub default_value: AttributeValue,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, type_: AttributeType) -> Self {
        AttributeDefinition {
            name: name.into(),
            type_,
            description: String::new(),
            default_value: type_.zero_value(),
        }
    }

    /// Builder: add description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

// ============================================================================
// ATTRIBUTE SCHEMA
// ============================================================================

/// AttributeSchema - the default attribute shape of one variant
///
/// Consulted only by the update coercion rule and by `Model::get`;
/// attributes outside the schema are still stored, just never coerced.
#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    definitions: Vec<AttributeDefinition>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: declare an attribute
    pub fn with(mut self, definition: AttributeDefinition) -> Self {
        self.register(definition);
        self
    }

    /// Declare an attribute, replacing an earlier one with the same name
    pub fn register(&mut self, definition: AttributeDefinition) {
        self.definitions.retain(|d| d.name != definition.name);
        self.definitions.push(definition);
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn type_of(&self, name: &str) -> Option<AttributeType> {
        self.get(name).map(|d| d.type_)
    }

    /// Definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> + '_ {
        self.definitions.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_text_integer() {
        assert_eq!(
            AttributeType::Integer.coerce_text("5"),
            Ok(AttributeValue::Integer(5))
        );
        assert!(AttributeType::Integer.coerce_text("five").is_err());
        assert!(AttributeType::Integer.coerce_text("5.5").is_err());
    }

    #[test]
    fn test_coerce_text_float_rejects_non_finite() {
        assert_eq!(
            AttributeType::Float.coerce_text("37.77"),
            Ok(AttributeValue::Float(37.77))
        );
        assert!(AttributeType::Float.coerce_text("NaN").is_err());
        assert!(AttributeType::Float.coerce_text("inf").is_err());
    }

    #[test]
    fn test_coerce_text_boolean_and_list() {
        assert_eq!(
            AttributeType::Boolean.coerce_text("True"),
            Ok(AttributeValue::Boolean(true))
        );
        assert_eq!(
            AttributeType::List.coerce_text("['a', 'b']"),
            Ok(AttributeValue::List(vec!["a".into(), "b".into()]))
        );
        assert!(AttributeType::List.coerce_text("a, b").is_err());
    }

    #[test]
    fn test_coerce_value_widens_and_narrows() {
        assert_eq!(
            AttributeType::Float.coerce_value(AttributeValue::Integer(3)),
            Ok(AttributeValue::Float(3.0))
        );
        assert_eq!(
            AttributeType::Integer.coerce_value(AttributeValue::Float(4.0)),
            Ok(AttributeValue::Integer(4))
        );
        assert!(AttributeType::Integer.coerce_value(AttributeValue::Float(4.5)).is_err());
        assert_eq!(
            AttributeType::Integer.coerce_value(AttributeValue::String("12".into())),
            Ok(AttributeValue::Integer(12))
        );
        assert_eq!(
            AttributeType::String.coerce_value(AttributeValue::Integer(12)),
            Ok(AttributeValue::String("12".into()))
        );
    }

    #[test]
    fn test_json_conversion_keeps_types() {
        let value = json!(["x", 1, 2.5, true]);
        let attr = AttributeValue::from_json(&value).unwrap();
        assert_eq!(
            attr,
            AttributeValue::List(vec![
                AttributeValue::String("x".into()),
                AttributeValue::Integer(1),
                AttributeValue::Float(2.5),
                AttributeValue::Boolean(true),
            ])
        );
        assert_eq!(attr.to_json(), value);

        // A float with no fraction stays a float across the trip
        let float = AttributeValue::Float(5.0);
        let back = AttributeValue::from_json(&float.to_json()).unwrap();
        assert_eq!(back, float);
    }

    #[test]
    fn test_json_conversion_rejects_null_and_objects() {
        assert!(AttributeValue::from_json(&json!(null)).is_err());
        assert!(AttributeValue::from_json(&json!({"a": 1})).is_err());
    }

    #[test]
    fn test_python_style_display() {
        assert_eq!(AttributeValue::from("it's").to_string(), "'it\\'s'");
        assert_eq!(AttributeValue::Float(5.0).to_string(), "5.0");
        assert_eq!(AttributeValue::Boolean(false).to_string(), "False");
        assert_eq!(
            AttributeValue::List(vec![1i64.into(), "a".into()]).to_string(),
            "[1, 'a']"
        );
    }

    #[test]
    fn test_schema_lookup() {
        let schema = AttributeSchema::new()
            .with(AttributeDefinition::new("name", AttributeType::String))
            .with(AttributeDefinition::new("max_guest", AttributeType::Integer));

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.type_of("max_guest"), Some(AttributeType::Integer));
        assert_eq!(schema.type_of("unknown"), None);
        assert_eq!(
            schema.get("max_guest").unwrap().default_value,
            AttributeValue::Integer(0)
        );
    }

    #[test]
    fn test_schema_register_replaces_same_name() {
        let mut schema = AttributeSchema::new();
        schema.register(AttributeDefinition::new("name", AttributeType::String));
        schema.register(
            AttributeDefinition::new("name", AttributeType::Integer).with_description("replaced"),
        );

        assert_eq!(schema.len(), 1);
        assert_eq!(schema.type_of("name"), Some(AttributeType::Integer));
        let descriptions: Vec<&str> = schema.iter().map(|d| d.description.as_str()).collect();
        assert_eq!(descriptions, vec!["replaced"]);
    }
}
