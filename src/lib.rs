//! # pokedex: a small CRUD API over a document store
//!
//! `pokedex` exposes a REST API for a single resource - pokedex entries -
//! persisted in a document store. It supports creating entries (with
//! uniqueness enforced on both the species name and the dex number), listing
//! everything, and looking up or patching a single entry through one
//! ambiguous path parameter that may be a document id, a dex number, or a
//! species name.
//!
//! ## Architecture
//!
//! The HTTP layer is built on [Axum](https://github.com/tokio-rs/axum). The
//! **API layer** ([`api`]) holds the route handlers and request/response
//! models; the **database layer** ([`db`]) holds the stored document models
//! and the [`db::handlers::PokemonStore`] trait, with a MongoDB backend for
//! production and an embedded in-memory backend for tests and local
//! development. Error translation to HTTP statuses lives in [`errors`].
//!
//! Lookup resolution classifies the path parameter exactly once: a
//! syntactically valid ObjectId resolves by id, an integer resolves by dex
//! number, and anything else resolves by (lowercased) name.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use pokedex::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = pokedex::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     pokedex::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;
use config::DatabaseConfig;
use db::handlers::{MemoryPokemonStore, MongoPokemonStore, PokemonStore};
use openapi::ApiDoc;

/// Application state shared across all request handlers.
#[derive(Clone, Builder)]
pub struct AppState {
    /// The document store backend holding pokedex entries
    pub store: Arc<dyn PokemonStore>,
    pub config: Config,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return Ok(cors.allow_origin(Any));
    }

    let mut origins = Vec::new();
    for origin in &config.cors_allowed_origins {
        origins.push(origin.parse::<HeaderValue>()?);
    }
    Ok(cors.allow_origin(origins))
}

/// Build the application router with all endpoints and middleware.
///
/// The pokedex API is mounted under the versioned `/api/v3` prefix, with a
/// health endpoint and the rendered OpenAPI docs at the root.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route("/pokemon", post(api::handlers::pokemon::create_pokemon))
        .route("/pokemon", get(api::handlers::pokemon::list_pokemon))
        .route("/pokemon/{criterion}", get(api::handlers::pokemon::get_pokemon))
        .route("/pokemon/{criterion}", patch(api::handlers::pokemon::update_pokemon))
        .route("/pokemon/{criterion}", delete(api::handlers::pokemon::delete_pokemon))
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v3", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns the router and lifecycle.
///
/// 1. **Create**: [`Application::new`] connects the configured store backend
///    (ensuring its uniqueness indexes) and builds the router
/// 2. **Serve**: [`Application::serve`] binds a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn PokemonStore> = match &config.database {
            DatabaseConfig::Memory => {
                info!("Starting with embedded in-memory store: data will be lost on shutdown");
                Arc::new(MemoryPokemonStore::new())
            }
            DatabaseConfig::Mongodb { url, database } => Arc::new(MongoPokemonStore::connect(url, database).await?),
        };

        let state = AppState::builder().store(store).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("Pokedex listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// The whole application boots against the in-memory backend and serves
    /// the API under its versioned prefix.
    #[tokio::test]
    async fn application_boots_with_the_memory_backend() {
        let app = Application::new(Config::default()).await.expect("application should boot");
        let server = app.into_test_server();

        server.get("/healthz").await.assert_status_ok();

        let response = server
            .post("/api/v3/pokemon")
            .json(&serde_json::json!({"name": "Mew", "code": 151}))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn wildcard_and_explicit_cors_origins_both_build() {
        create_cors_layer(&Config::default()).expect("wildcard origins");

        let config = Config {
            cors_allowed_origins: vec!["https://app.example.com".to_string()],
            ..Config::default()
        };
        create_cors_layer(&config).expect("explicit origins");
    }
}
