//! Test utilities for integration testing (available with the `test-utils` feature).

use std::sync::Arc;

use axum_test::TestServer;

use crate::db::handlers::MemoryPokemonStore;
use crate::{AppState, Config, build_router};

/// Build a test server over a fresh in-memory store.
pub fn create_test_app() -> TestServer {
    let state = AppState::builder()
        .store(Arc::new(MemoryPokemonStore::new()))
        .config(Config::default())
        .build();

    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}
