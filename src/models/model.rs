// 🧱 Model - identity + timestamps + open attribute bag
//
// "The id is IDENTITY (never changes), attributes are VALUES (can change)"
//
// Every variant shares this one record type; the variant tag only decides
// which default attributes exist and how update values get coerced.

use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::attributes::{AttributeValue, CoercionError};
use crate::models::registry::ModelKind;

/// Name of the variant tag field in the persisted form
pub const CLASS_FIELD: &str = "__class__";

/// Keys owned by the model itself, never stored in the attribute bag
pub const RESERVED_KEYS: [&str; 4] = ["id", "created_at", "updated_at", CLASS_FIELD];

/// Timestamp layout written to disk (ISO-8601, microseconds, UTC)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid {field} timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("attribute {name:?}: {source}")]
    InvalidAttribute {
        name: String,
        #[source]
        source: CoercionError,
    },

    #[error("attribute {0:?} is managed by the model and cannot be set")]
    ReservedAttribute(String),
}

// ============================================================================
// MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    kind: ModelKind,

    /// Stable identity (UUID) - NEVER changes
    id: String,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    /// Open attribute bag (declared defaults and ad hoc attributes alike)
    attributes: BTreeMap<String, AttributeValue>,
}

impl Model {
    /// Create a fresh model with a new UUID and equal timestamps
    pub fn new(kind: ModelKind) -> Self {
        let now = now();
        Model {
            kind,
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            attributes: BTreeMap::new(),
        }
    }

    /// Build a model, optionally from a persisted record
    ///
    /// A fresh identity is generated first; keys in `record` then override it.
    /// Timestamps are parsed from ISO-8601, the `__class__` tag is dropped,
    /// and every other key lands in the attribute bag as-is.
    pub fn construct(kind: ModelKind, record: Option<&Map<String, Value>>) -> Result<Self, ModelError> {
        let mut model = Model::new(kind);
        let Some(record) = record else {
            return Ok(model);
        };

        for (key, value) in record {
            match key.as_str() {
                CLASS_FIELD => {}
                "id" => model.id = parse_id(value)?,
                "created_at" => model.created_at = parse_timestamp("created_at", value)?,
                "updated_at" => model.updated_at = parse_timestamp("updated_at", value)?,
                _ => {
                    let attr = AttributeValue::from_json(value).map_err(|source| {
                        ModelError::InvalidAttribute {
                            name: key.clone(),
                            source,
                        }
                    })?;
                    model.attributes.insert(key.clone(), attr);
                }
            }
        }

        Ok(model)
    }

    #[cfg(test)]
    pub(crate) fn without_id(kind: ModelKind) -> Self {
        let mut model = Model::new(kind);
        model.id.clear();
        model
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn attributes(&self) -> &BTreeMap<String, AttributeValue> {
        &self.attributes
    }

    /// Composite key `<Variant>.<id>` used by storage and the JSON file
    pub fn key(&self) -> String {
        composite_key(self.kind, &self.id)
    }

    /// Attribute value, falling back to the variant's declared default
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .get(name)
            .or_else(|| self.kind.schema().get(name).map(|d| &d.default_value))
    }

    /// Set an attribute in the bag; identity and timestamps are off limits
    pub fn set(&mut self, name: impl Into<String>, value: AttributeValue) -> Result<(), ModelError> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(ModelError::ReservedAttribute(name));
        }
        self.attributes.insert(name, value);
        Ok(())
    }

    /// Bump `updated_at`, strictly later than before even within one clock tick
    pub fn touch(&mut self) {
        let now = now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// Flat record persisted to disk and fed back into `construct` on reload
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record: Map<String, Value> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        record.insert("id".to_string(), Value::String(self.id.clone()));
        record.insert("created_at".to_string(), Value::String(format_timestamp(&self.created_at)));
        record.insert("updated_at".to_string(), Value::String(format_timestamp(&self.updated_at)));
        record.insert(CLASS_FIELD.to_string(), Value::String(self.class_name().to_string()));
        record
    }
}

/// `[User] (<id>) {'id': '...', 'created_at': '...', ...}`
impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {{'id': '{}', 'created_at': '{}', 'updated_at': '{}'",
            self.class_name(),
            self.id,
            self.id,
            format_timestamp(&self.created_at),
            format_timestamp(&self.updated_at),
        )?;
        for (name, value) in &self.attributes {
            write!(f, ", '{}': {}", name, value)?;
        }
        f.write_str("}")
    }
}

// ============================================================================
// HELPERS
// ============================================================================

pub fn composite_key(kind: ModelKind, id: &str) -> String {
    format!("{}.{}", kind.name(), id)
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_KEYS.contains(&name)
}

/// Current time at the precision we persist, so round trips compare equal
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts RFC 3339 (with offset) or a naive ISO-8601 timestamp read as UTC
pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).trunc_subsecs(6));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).trunc_subsecs(6))
}

fn parse_timestamp(field: &'static str, value: &Value) -> Result<DateTime<Utc>, ModelError> {
    value
        .as_str()
        .and_then(parse_timestamp_str)
        .ok_or_else(|| ModelError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

fn parse_id(value: &Value) -> Result<String, ModelError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ModelError::InvalidId(other.to_string())),
    }
}

// ============================================================================
// TESTS
// ============================================================================
