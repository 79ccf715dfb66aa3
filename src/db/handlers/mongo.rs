//! MongoDB-backed document store.

use futures::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use tracing::{info, instrument};

use super::PokemonStore;
use crate::db::errors::{DbError, Result};
use crate::db::models::pokemon::{Criterion, PokemonCreateDBRequest, PokemonDBResponse, PokemonUpdateDBRequest};

const COLLECTION: &str = "pokemon";

/// Store backed by a single MongoDB collection.
///
/// Uniqueness of `name` and `code` is enforced by unique indexes created at
/// connect time; the `code` index is sparse so entries without a dex number
/// don't collide with each other.
pub struct MongoPokemonStore {
    collection: Collection<PokemonDBResponse>,
}

impl MongoPokemonStore {
    /// Connect to the store and ensure the uniqueness indexes exist.
    pub async fn connect(url: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(url).await?;
        let collection = client.database(database).collection(COLLECTION);

        let store = Self { collection };
        store.ensure_indexes().await?;
        info!(database, collection = COLLECTION, "Connected to document store");

        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let name_unique = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let code_unique = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(IndexOptions::builder().unique(true).sparse(true).build())
            .build();

        self.collection.create_indexes([name_unique, code_unique]).await?;
        Ok(())
    }

    fn filter_for(criterion: &Criterion) -> Document {
        match criterion {
            Criterion::Id(id) => doc! { "_id": *id },
            Criterion::Code(code) => doc! { "code": *code },
            Criterion::Name(name) => doc! { "name": name.as_str() },
        }
    }
}

#[async_trait::async_trait]
impl PokemonStore for MongoPokemonStore {
    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn insert(&self, request: &PokemonCreateDBRequest) -> Result<PokemonDBResponse> {
        // Assign the id client-side so the created record can be returned
        // without a second round trip.
        let record = PokemonDBResponse {
            id: ObjectId::new(),
            code: request.code,
            name: request.name.clone(),
            extra: request.extra.clone(),
        };

        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<PokemonDBResponse>> {
        let cursor = self.collection.find(doc! {}).await?;
        let records = cursor.try_collect().await.map_err(DbError::from)?;
        Ok(records)
    }

    #[instrument(skip(self), err)]
    async fn find_one(&self, criterion: &Criterion) -> Result<Option<PokemonDBResponse>> {
        let record = self.collection.find_one(Self::filter_for(criterion)).await?;
        Ok(record)
    }

    #[instrument(skip(self, request), err)]
    async fn update_one(&self, id: ObjectId, request: &PokemonUpdateDBRequest) -> Result<()> {
        // PokemonUpdateDBRequest serializes with absent fields skipped, which
        // is exactly the $set document for a merge update.
        let set = mongodb::bson::to_document(request).map_err(|e| DbError::Other(e.into()))?;
        if set.is_empty() {
            // An empty $set is rejected by the server; an empty patch is a no-op.
            return Ok(());
        }

        self.collection.update_one(doc! { "_id": id }, doc! { "$set": set }).await?;
        Ok(())
    }
}
