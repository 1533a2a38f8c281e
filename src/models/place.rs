// 🏠 Place - a bookable listing
//
// The only variant with typed (non-string) defaults, so it is where the
// update coercion rule actually does something: `update Place <id>
// number_rooms "4"` stores the integer 4, not the text "4".

use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::attributes::{AttributeDefinition, AttributeSchema, AttributeType};
use crate::models::model::{Model, ModelError};
use crate::models::registry::ModelKind;

static SCHEMA: OnceLock<AttributeSchema> = OnceLock::new();

/// Default attribute shape of a Place
pub fn schema() -> &'static AttributeSchema {
    SCHEMA.get_or_init(|| {
        AttributeSchema::new()
            // ================================================================
            // LINKS
            // ================================================================
            .with(
                AttributeDefinition::new("city_id", AttributeType::String)
                    .with_description("Id of the City the place is in"),
            )
            .with(
                AttributeDefinition::new("user_id", AttributeType::String)
                    .with_description("Id of the owning User"),
            )
            // ================================================================
            // DESCRIPTIVE
            // ================================================================
            .with(AttributeDefinition::new("name", AttributeType::String))
            .with(AttributeDefinition::new("description", AttributeType::String))
            // ================================================================
            // CAPACITY & PRICE
            // ================================================================
            .with(AttributeDefinition::new("number_rooms", AttributeType::Integer))
            .with(AttributeDefinition::new("number_bathrooms", AttributeType::Integer))
            .with(AttributeDefinition::new("max_guest", AttributeType::Integer))
            .with(
                AttributeDefinition::new("price_by_night", AttributeType::Integer)
                    .with_description("Nightly price in whole currency units"),
            )
            // ================================================================
            // LOCATION
            // ================================================================
            .with(AttributeDefinition::new("latitude", AttributeType::Float))
            .with(AttributeDefinition::new("longitude", AttributeType::Float))
            .with(
                AttributeDefinition::new("amenity_ids", AttributeType::List)
                    .with_description("Ids of the Amenities offered"),
            )
    })
}

/// Build a Place, fresh or from a persisted record
pub fn construct(record: Option<&Map<String, Value>>) -> Result<Model, ModelError> {
    Model::construct(ModelKind::Place, record)
}
