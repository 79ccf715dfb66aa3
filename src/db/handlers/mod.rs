//! Document store access for pokedex entries.
//!
//! The [`PokemonStore`] trait is the seam between the API handlers and the
//! persistence backend. Two implementations exist:
//!
//! - [`MongoPokemonStore`]: the production backend, one MongoDB collection
//!   with unique indexes on `name` and `code`
//! - [`MemoryPokemonStore`]: an embedded, ephemeral backend for tests and
//!   local development, enforcing the same uniqueness rules
//!
//! Both report uniqueness violations as
//! [`DbError::UniqueViolation`](crate::db::errors::DbError::UniqueViolation)
//! so the error mapping at the API boundary is backend-agnostic.

pub mod memory;
pub mod mongo;

use mongodb::bson::oid::ObjectId;

use crate::db::errors::Result;
use crate::db::models::pokemon::{Criterion, PokemonCreateDBRequest, PokemonDBResponse, PokemonUpdateDBRequest};

pub use memory::MemoryPokemonStore;
pub use mongo::MongoPokemonStore;

/// The document store contract consumed by the pokedex service.
#[async_trait::async_trait]
pub trait PokemonStore: Send + Sync {
    /// Insert a new entry, assigning it an id
    async fn insert(&self, request: &PokemonCreateDBRequest) -> Result<PokemonDBResponse>;

    /// Every entry in the store, in store order
    async fn find_all(&self) -> Result<Vec<PokemonDBResponse>>;

    /// First entry matching the classified criterion, if any
    async fn find_one(&self, criterion: &Criterion) -> Result<Option<PokemonDBResponse>>;

    /// Apply a partial update to the entry with the given id.
    ///
    /// Absent patch fields are left untouched (merge semantics, not a
    /// full-document replace). Updating a missing id is not an error; the
    /// write simply matches nothing.
    async fn update_one(&self, id: ObjectId, request: &PokemonUpdateDBRequest) -> Result<()>;
}
