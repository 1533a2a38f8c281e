// 👤 User - people who list and book places

use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::attributes::{AttributeDefinition, AttributeSchema, AttributeType};
use crate::models::model::{Model, ModelError};
use crate::models::registry::ModelKind;

static SCHEMA: OnceLock<AttributeSchema> = OnceLock::new();

/// Default attribute shape of a User
///
/// All four attributes are strings and start out empty.
pub fn schema() -> &'static AttributeSchema {
    SCHEMA.get_or_init(|| {
        AttributeSchema::new()
            .with(
                AttributeDefinition::new("email", AttributeType::String)
                    .with_description("Login email address"),
            )
            .with(
                AttributeDefinition::new("password", AttributeType::String)
                    .with_description("Account password"),
            )
            .with(AttributeDefinition::new("first_name", AttributeType::String))
            .with(AttributeDefinition::new("last_name", AttributeType::String))
    })
}

/// Build a User, fresh or from a persisted record
pub fn construct(record: Option<&Map<String, Value>>) -> Result<Model, ModelError> {
    Model::construct(ModelKind::User, record)
}
