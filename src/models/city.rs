// 🏙️ City - belongs to a State through `state_id`

use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::attributes::{AttributeDefinition, AttributeSchema, AttributeType};
use crate::models::model::{Model, ModelError};
use crate::models::registry::ModelKind;

static SCHEMA: OnceLock<AttributeSchema> = OnceLock::new();

/// Default attribute shape of a City
pub fn schema() -> &'static AttributeSchema {
    SCHEMA.get_or_init(|| {
        AttributeSchema::new()
            .with(
                AttributeDefinition::new("state_id", AttributeType::String)
                    .with_description("Id of the owning State"),
            )
            .with(AttributeDefinition::new("name", AttributeType::String))
    })
}

pub fn construct(record: Option<&Map<String, Value>>) -> Result<Model, ModelError> {
    Model::construct(ModelKind::City, record)
}
