// ✍️ Review - a User's text about a Place

use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::attributes::{AttributeDefinition, AttributeSchema, AttributeType};
use crate::models::model::{Model, ModelError};
use crate::models::registry::ModelKind;

static SCHEMA: OnceLock<AttributeSchema> = OnceLock::new();

/// Default attribute shape of a Review
pub fn schema() -> &'static AttributeSchema {
    SCHEMA.get_or_init(|| {
        AttributeSchema::new()
            .with(
                AttributeDefinition::new("place_id", AttributeType::String)
                    .with_description("Id of the reviewed Place"),
            )
            .with(
                AttributeDefinition::new("user_id", AttributeType::String)
                    .with_description("Id of the reviewing User"),
            )
            .with(AttributeDefinition::new("text", AttributeType::String))
    })
}

pub fn construct(record: Option<&Map<String, Value>>) -> Result<Model, ModelError> {
    Model::construct(ModelKind::Review, record)
}
