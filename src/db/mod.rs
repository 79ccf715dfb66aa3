//! Persistence layer: document models, store backends, and error taxonomy.

pub mod errors;
pub mod handlers;
pub mod models;
