//! OpenAPI documentation for the pokedex API.

use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::models::pokemon::{PokemonCreate, PokemonResponse, PokemonUpdate};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pokedex API",
        description = "A small CRUD API for pokedex entries backed by a document store. \
                       Entries can be looked up by document id, dex number, or species name \
                       through a single path parameter."
    ),
    servers((url = "/api/v3", description = "Versioned API root")),
    paths(
        handlers::pokemon::create_pokemon,
        handlers::pokemon::list_pokemon,
        handlers::pokemon::get_pokemon,
        handlers::pokemon::update_pokemon,
        handlers::pokemon::delete_pokemon,
    ),
    components(schemas(PokemonCreate, PokemonUpdate, PokemonResponse)),
    tags(
        (name = "pokemon", description = "Pokedex entry management")
    )
)]
pub struct ApiDoc;
