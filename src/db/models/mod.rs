//! Storage-level document models.
//!
//! These types mirror what actually lives in the document store, as opposed
//! to the API DTOs in [`crate::api::models`] which shape requests and
//! responses.

pub mod pokemon;
