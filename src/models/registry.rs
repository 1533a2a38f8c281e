// 📇 Class Registry - textual class name → constructor + default schema
//
// The set of variants is closed. Both the console (validating class names)
// and storage (resolving `__class__` tags on reload) go through this table.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::attributes::AttributeSchema;
use crate::models::model::{Model, ModelError};
use crate::models::{amenity, base_model, city, place, review, state, user};

// ============================================================================
// MODEL KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    BaseModel,
    User,
    State,
    City,
    Place,
    Amenity,
    Review,
}

impl ModelKind {
    pub const ALL: [ModelKind; 7] = [
        ModelKind::BaseModel,
        ModelKind::User,
        ModelKind::State,
        ModelKind::City,
        ModelKind::Place,
        ModelKind::Amenity,
        ModelKind::Review,
    ];

    /// Class name as typed at the console and stored in `__class__`
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::BaseModel => "BaseModel",
            ModelKind::User => "User",
            ModelKind::State => "State",
            ModelKind::City => "City",
            ModelKind::Place => "Place",
            ModelKind::Amenity => "Amenity",
            ModelKind::Review => "Review",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_name(name: &str) -> Option<ModelKind> {
        ModelKind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Default attribute shape declared by this variant
    pub fn schema(&self) -> &'static AttributeSchema {
        match self {
            ModelKind::BaseModel => base_model::schema(),
            ModelKind::User => user::schema(),
            ModelKind::State => state::schema(),
            ModelKind::City => city::schema(),
            ModelKind::Place => place::schema(),
            ModelKind::Amenity => amenity::schema(),
            ModelKind::Review => review::schema(),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown class: {0:?}")]
pub struct UnknownClass(pub String);

impl FromStr for ModelKind {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::from_name(s).ok_or_else(|| UnknownClass(s.to_string()))
    }
}

// ============================================================================
// CLASS REGISTRY
// ============================================================================

/// Constructor reference: no record builds a fresh model, a record rebuilds one
pub type ModelFactory = fn(Option<&Map<String, Value>>) -> Result<Model, ModelError>;

/// ClassEntry - everything the registry knows about one variant
#[derive(Clone, Copy)]
pub struct ClassEntry {
    pub kind: ModelKind,
    pub factory: ModelFactory,
    pub schema: &'static AttributeSchema,
}

impl ClassEntry {
    pub fn construct(&self, record: Option<&Map<String, Value>>) -> Result<Model, ModelError> {
        (self.factory)(record)
    }
}

/// Registry of all known classes
///
/// Built once at startup and owned by storage; lookups never allocate.
pub struct ClassRegistry {
    classes: HashMap<&'static str, ClassEntry>,
}

impl ClassRegistry {
    /// Create the registry with the closed set of variants
    pub fn new() -> Self {
        let mut registry = ClassRegistry {
            classes: HashMap::new(),
        };

        registry.register(ModelKind::BaseModel, base_model::construct);
        registry.register(ModelKind::User, user::construct);
        registry.register(ModelKind::State, state::construct);
        registry.register(ModelKind::City, city::construct);
        registry.register(ModelKind::Place, place::construct);
        registry.register(ModelKind::Amenity, amenity::construct);
        registry.register(ModelKind::Review, review::construct);
        registry
    }

    fn register(&mut self, kind: ModelKind, factory: ModelFactory) {
        self.classes.insert(
            kind.name(),
            ClassEntry {
                kind,
                factory,
                schema: kind.schema(),
            },
        );
    }

    /// Resolve a textual class name
    pub fn resolve(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Class names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.classes.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn count(&self) -> usize {
        self.classes.len()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
