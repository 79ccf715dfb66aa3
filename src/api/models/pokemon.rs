//! API request/response models for pokedex entries.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::pokemon::PokemonDBResponse;

/// Request body for creating a new pokedex entry.
///
/// Any fields beyond `name` and `code` are stored verbatim and returned
/// unchanged on later reads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PokemonCreate {
    /// Species name (stored lowercase, must be unique)
    #[schema(example = "Pikachu")]
    pub name: String,
    /// National dex number (must be unique when supplied)
    #[schema(example = 25)]
    #[serde(default)]
    pub code: Option<i64>,
    /// Additional descriptive fields, passed through unchanged
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Request body for partially updating an entry. All fields are optional;
/// only provided fields are written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PokemonUpdate {
    /// New species name (null to keep unchanged; stored lowercase)
    #[schema(example = "Raichu")]
    pub name: Option<String>,
    /// New dex number (null to keep unchanged)
    pub code: Option<i64>,
    /// Additional descriptive fields to merge in
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A pokedex entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PokemonResponse {
    /// Store-assigned identifier
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    /// National dex number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Species name, always lowercase
    pub name: String,
    /// Additional descriptive fields
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<PokemonDBResponse> for PokemonResponse {
    fn from(db: PokemonDBResponse) -> Self {
        Self {
            id: db.id.to_hex(),
            code: db.code,
            name: db.name,
            extra: db.extra,
        }
    }
}
