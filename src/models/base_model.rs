// BaseModel - the plain variant, no declared attributes

use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::attributes::AttributeSchema;
use crate::models::model::{Model, ModelError};
use crate::models::registry::ModelKind;

static SCHEMA: OnceLock<AttributeSchema> = OnceLock::new();

pub fn schema() -> &'static AttributeSchema {
    SCHEMA.get_or_init(AttributeSchema::new)
}

pub fn construct(record: Option<&Map<String, Value>>) -> Result<Model, ModelError> {
    Model::construct(ModelKind::BaseModel, record)
}
