//! Document model and lookup criterion for pokedex entries.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::api::models::pokemon::{PokemonCreate, PokemonUpdate};

/// A pokedex entry as stored in the document store.
///
/// `name` is always lowercase on disk; the lowercasing happens in the
/// DB-request constructors below so no caller can bypass it. Fields beyond
/// `code` and `name` are opaque to the service and round-trip through the
/// flattened `extra` map untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonDBResponse {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// National dex number. Unique across all entries when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Species name, stored lowercase. Unique across all entries.
    pub name: String,
    /// Descriptive fields passed through unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PokemonDBResponse {
    /// Shallow-merge an update request over this record, client-side.
    ///
    /// This is how the PATCH response is built: the resolved pre-update
    /// record with the patch fields applied locally, rather than a re-fetch
    /// of the post-update document. A concurrent writer between our resolve
    /// and our write is therefore not reflected in the response.
    pub fn merged_with(mut self, patch: &PokemonUpdateDBRequest) -> Self {
        if let Some(code) = patch.code {
            self.code = Some(code);
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        for (key, value) in &patch.extra {
            self.extra.insert(key.clone(), value.clone());
        }
        self
    }
}

/// Insert request for a new pokedex entry.
#[derive(Debug, Clone, Serialize)]
pub struct PokemonCreateDBRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<PokemonCreate> for PokemonCreateDBRequest {
    fn from(create: PokemonCreate) -> Self {
        Self {
            code: create.code,
            name: create.name.to_lowercase(),
            extra: create.extra,
        }
    }
}

/// Partial update request. Only present fields are written to the store.
#[derive(Debug, Clone, Serialize)]
pub struct PokemonUpdateDBRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<PokemonUpdate> for PokemonUpdateDBRequest {
    fn from(update: PokemonUpdate) -> Self {
        Self {
            code: update.code,
            name: update.name.map(|name| name.to_lowercase()),
            extra: update.extra,
        }
    }
}

/// A lookup criterion, classified once from the raw path segment.
///
/// The raw string is ambiguous: it may be a document id, a dex number, or a
/// species name. Classification is exclusive and ordered - a syntactically
/// valid ObjectId is never treated as a code, and an integer is never treated
/// as a name. Anything that is neither falls through to a name match, so a
/// lookup by name is always reachable. Inapplicable matchers are never sent
/// to the store, so a record with an absent `code` field can't spuriously
/// match a non-numeric criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// A syntactically valid document id
    Id(ObjectId),
    /// An integer dex number
    Code(i64),
    /// A species name, lowercased to match the stored form
    Name(String),
}

impl Criterion {
    pub fn parse(raw: &str) -> Self {
        if let Ok(id) = ObjectId::parse_str(raw) {
            Criterion::Id(id)
        } else if let Ok(code) = raw.parse::<i64>() {
            Criterion::Code(code)
        } else {
            // Stored names are always lowercase, so lowercasing the
            // criterion makes name lookup case-insensitive.
            Criterion::Name(raw.to_lowercase())
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::Id(id) => write!(f, "{id}"),
            Criterion::Code(code) => write!(f, "{code}"),
            Criterion::Name(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_object_id_classifies_as_id() {
        let id = ObjectId::new();
        assert_eq!(Criterion::parse(&id.to_hex()), Criterion::Id(id));
    }

    #[test]
    fn integer_string_classifies_as_code() {
        assert_eq!(Criterion::parse("25"), Criterion::Code(25));
        assert_eq!(Criterion::parse("-3"), Criterion::Code(-3));
    }

    #[test]
    fn anything_else_classifies_as_lowercased_name() {
        assert_eq!(Criterion::parse("Pikachu"), Criterion::Name("pikachu".to_string()));
        assert_eq!(Criterion::parse("mr-mime"), Criterion::Name("mr-mime".to_string()));
        // Not a valid ObjectId (wrong length), not an integer
        assert_eq!(Criterion::parse("25a"), Criterion::Name("25a".to_string()));
    }

    #[test]
    fn twenty_four_hex_chars_win_over_name() {
        // Same shape as a real id, even if it was never issued by the store
        let raw = "aaaaaaaaaaaaaaaaaaaaaaaa";
        assert!(matches!(Criterion::parse(raw), Criterion::Id(_)));
    }

    #[test]
    fn merge_applies_patch_fields_over_the_resolved_record() {
        let record = PokemonDBResponse {
            id: ObjectId::new(),
            code: Some(25),
            name: "pikachu".to_string(),
            extra: serde_json::Map::from_iter([("type".to_string(), serde_json::json!("electric"))]),
        };
        let patch = PokemonUpdateDBRequest {
            code: None,
            name: Some("raichu".to_string()),
            extra: serde_json::Map::from_iter([("stage".to_string(), serde_json::json!(2))]),
        };

        let merged = record.clone().merged_with(&patch);
        assert_eq!(merged.id, record.id);
        assert_eq!(merged.code, Some(25));
        assert_eq!(merged.name, "raichu");
        assert_eq!(merged.extra["type"], serde_json::json!("electric"));
        assert_eq!(merged.extra["stage"], serde_json::json!(2));
    }
}
