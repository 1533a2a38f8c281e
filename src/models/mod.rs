// Models - one shared record type, seven variants
//
// Each variant module declares:
// - its default attribute schema (consulted by the update coercion rule)
// - a constructor registered in the ClassRegistry

pub mod model;
pub mod registry;

pub mod amenity;
pub mod base_model;
pub mod city;
pub mod place;
pub mod review;
pub mod state;
pub mod user;

pub use model::{composite_key, Model, ModelError, CLASS_FIELD};
pub use registry::{ClassEntry, ClassRegistry, ModelFactory, ModelKind, UnknownClass};
