//! HTTP request handlers.
//!
//! Each handler deserializes the request, orchestrates the document store
//! through the [`PokemonStore`](crate::db::handlers::PokemonStore) seam,
//! and serializes the response; error translation to HTTP statuses happens
//! in [`crate::errors`].

pub mod pokemon;
