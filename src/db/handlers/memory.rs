//! Embedded in-memory document store.
//!
//! Used for tests and local development, where an external MongoDB would be
//! a burden. Enforces the same uniqueness rules
//! as the MongoDB backend and reports violations through the same
//! [`DbError::UniqueViolation`] shape, so everything above the store seam
//! behaves identically against either backend.

use std::sync::RwLock;

use mongodb::bson::oid::ObjectId;
use tracing::instrument;

use super::PokemonStore;
use crate::db::errors::{DbError, Result};
use crate::db::models::pokemon::{Criterion, PokemonCreateDBRequest, PokemonDBResponse, PokemonUpdateDBRequest};

/// Ephemeral store holding every entry in a locked Vec.
///
/// Scans are linear, which is fine at the scale this backend serves.
#[derive(Default)]
pub struct MemoryPokemonStore {
    records: RwLock<Vec<PokemonDBResponse>>,
}

impl MemoryPokemonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate(field: &str, value: impl std::fmt::Display) -> DbError {
    let key_value = format!("{{ {field}: {value} }}");
    DbError::UniqueViolation {
        message: format!("duplicate key error dup key: {key_value}"),
        key_value: Some(key_value),
    }
}

fn matches(record: &PokemonDBResponse, criterion: &Criterion) -> bool {
    match criterion {
        Criterion::Id(id) => record.id == *id,
        Criterion::Code(code) => record.code == Some(*code),
        Criterion::Name(name) => record.name == *name,
    }
}

#[async_trait::async_trait]
impl PokemonStore for MemoryPokemonStore {
    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn insert(&self, request: &PokemonCreateDBRequest) -> Result<PokemonDBResponse> {
        let mut records = self.records.write().expect("store lock poisoned");

        if records.iter().any(|r| r.name == request.name) {
            return Err(duplicate("name", format!("\"{}\"", request.name)));
        }
        if let Some(code) = request.code
            && records.iter().any(|r| r.code == Some(code))
        {
            return Err(duplicate("code", code));
        }

        let record = PokemonDBResponse {
            id: ObjectId::new(),
            code: request.code,
            name: request.name.clone(),
            extra: request.extra.clone(),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn find_all(&self) -> Result<Vec<PokemonDBResponse>> {
        let records = self.records.read().expect("store lock poisoned");
        Ok(records.clone())
    }

    async fn find_one(&self, criterion: &Criterion) -> Result<Option<PokemonDBResponse>> {
        let records = self.records.read().expect("store lock poisoned");
        Ok(records.iter().find(|r| matches(r, criterion)).cloned())
    }

    #[instrument(skip(self, request), err)]
    async fn update_one(&self, id: ObjectId, request: &PokemonUpdateDBRequest) -> Result<()> {
        let mut records = self.records.write().expect("store lock poisoned");

        // Uniqueness is checked against every other record before the write
        // lands, mirroring what the unique indexes do in MongoDB.
        if let Some(name) = &request.name
            && records.iter().any(|r| r.id != id && r.name == *name)
        {
            return Err(duplicate("name", format!("\"{name}\"")));
        }
        if let Some(code) = request.code
            && records.iter().any(|r| r.id != id && r.code == Some(code))
        {
            return Err(duplicate("code", code));
        }

        // A missing id matches nothing, same as an unmatched updateOne.
        if let Some(record) = records.iter_mut().find(|r| r.id == id) {
            if let Some(code) = request.code {
                record.code = Some(code);
            }
            if let Some(name) = &request.name {
                record.name = name.clone();
            }
            for (key, value) in &request.extra {
                record.extra.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(name: &str, code: Option<i64>) -> PokemonCreateDBRequest {
        PokemonCreateDBRequest {
            code,
            name: name.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryPokemonStore::new();
        let a = store.insert(&create("pikachu", Some(25))).await.unwrap();
        let b = store.insert(&create("raichu", Some(26))).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected_with_key_value() {
        let store = MemoryPokemonStore::new();
        store.insert(&create("pikachu", Some(25))).await.unwrap();

        let err = store.insert(&create("pikachu", Some(99))).await.unwrap_err();
        match err {
            DbError::UniqueViolation { key_value, .. } => {
                assert_eq!(key_value.as_deref(), Some("{ name: \"pikachu\" }"));
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected() {
        let store = MemoryPokemonStore::new();
        store.insert(&create("pikachu", Some(25))).await.unwrap();

        let err = store.insert(&create("somebody-else", Some(25))).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn codeless_entries_do_not_collide() {
        let store = MemoryPokemonStore::new();
        store.insert(&create("missingno", None)).await.unwrap();
        store.insert(&create("glitchmon", None)).await.unwrap();
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn find_one_resolves_each_criterion_kind() {
        let store = MemoryPokemonStore::new();
        let created = store.insert(&create("pikachu", Some(25))).await.unwrap();

        for criterion in [
            Criterion::Id(created.id),
            Criterion::Code(25),
            Criterion::Name("pikachu".to_string()),
        ] {
            let found = store.find_one(&criterion).await.unwrap();
            assert_eq!(found.map(|r| r.id), Some(created.id), "criterion {criterion:?}");
        }

        assert!(store.find_one(&Criterion::Name("mewtwo".to_string())).await.unwrap().is_none());
        assert!(store.find_one(&Criterion::Code(151)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_one_merges_fields_and_keeps_the_rest() {
        let store = MemoryPokemonStore::new();
        let mut extra = serde_json::Map::new();
        extra.insert("type".to_string(), json!("electric"));
        let created = store
            .insert(&PokemonCreateDBRequest {
                code: Some(25),
                name: "pikachu".to_string(),
                extra,
            })
            .await
            .unwrap();

        let patch = PokemonUpdateDBRequest {
            code: None,
            name: Some("raichu".to_string()),
            extra: serde_json::Map::from_iter([("stage".to_string(), json!(2))]),
        };
        store.update_one(created.id, &patch).await.unwrap();

        let stored = store.find_one(&Criterion::Id(created.id)).await.unwrap().unwrap();
        assert_eq!(stored.name, "raichu");
        assert_eq!(stored.code, Some(25));
        assert_eq!(stored.extra["type"], json!("electric"));
        assert_eq!(stored.extra["stage"], json!(2));
    }

    #[tokio::test]
    async fn update_to_a_taken_code_is_rejected() {
        let store = MemoryPokemonStore::new();
        store.insert(&create("pikachu", Some(25))).await.unwrap();
        let other = store.insert(&create("raichu", Some(26))).await.unwrap();

        let patch = PokemonUpdateDBRequest {
            code: Some(25),
            name: None,
            extra: serde_json::Map::new(),
        };
        let err = store.update_one(other.id, &patch).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn updating_a_record_to_its_own_values_is_not_a_conflict() {
        let store = MemoryPokemonStore::new();
        let created = store.insert(&create("pikachu", Some(25))).await.unwrap();

        let patch = PokemonUpdateDBRequest {
            code: Some(25),
            name: Some("pikachu".to_string()),
            extra: serde_json::Map::new(),
        };
        store.update_one(created.id, &patch).await.unwrap();
    }

    #[tokio::test]
    async fn update_with_unknown_id_matches_nothing() {
        let store = MemoryPokemonStore::new();
        store.insert(&create("pikachu", Some(25))).await.unwrap();

        let patch = PokemonUpdateDBRequest {
            code: None,
            name: Some("ghost".to_string()),
            extra: serde_json::Map::new(),
        };
        store.update_one(ObjectId::new(), &patch).await.unwrap();
        assert!(store.find_one(&Criterion::Name("ghost".to_string())).await.unwrap().is_none());
    }
}
