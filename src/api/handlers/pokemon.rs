use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::AppState;
use crate::api::models::pokemon::{PokemonCreate, PokemonResponse, PokemonUpdate};
use crate::db::models::pokemon::{Criterion, PokemonCreateDBRequest, PokemonUpdateDBRequest};
use crate::errors::{Error, Result};

#[utoipa::path(
    post,
    path = "/pokemon",
    tag = "pokemon",
    summary = "Create pokedex entry",
    request_body = PokemonCreate,
    responses(
        (status = 201, description = "Entry created successfully", body = PokemonResponse),
        (status = 400, description = "An entry with this name or code already exists"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_pokemon(
    State(state): State<AppState>,
    Json(create): Json<PokemonCreate>,
) -> Result<(StatusCode, Json<PokemonResponse>)> {
    let request = PokemonCreateDBRequest::from(create);
    let pokemon = state.store.insert(&request).await?;
    Ok((StatusCode::CREATED, Json(PokemonResponse::from(pokemon))))
}

#[utoipa::path(
    get,
    path = "/pokemon",
    tag = "pokemon",
    summary = "List all pokedex entries",
    responses(
        (status = 200, description = "Every entry, unordered and unpaginated", body = Vec<PokemonResponse>),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_pokemon(State(state): State<AppState>) -> Result<Json<Vec<PokemonResponse>>> {
    let pokemon = state.store.find_all().await?;
    Ok(Json(pokemon.into_iter().map(PokemonResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/pokemon/{criterion}",
    tag = "pokemon",
    summary = "Get pokedex entry",
    params(
        ("criterion" = String, Path, description = "Document id, dex number, or species name"),
    ),
    responses(
        (status = 200, description = "The matching entry", body = PokemonResponse),
        (status = 404, description = "No entry matched the criterion"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(criterion = %criterion))]
pub async fn get_pokemon(State(state): State<AppState>, Path(criterion): Path<String>) -> Result<Json<PokemonResponse>> {
    let pokemon = state
        .store
        .find_one(&Criterion::parse(&criterion))
        .await?
        .ok_or(Error::NotFound { criterion })?;

    Ok(Json(PokemonResponse::from(pokemon)))
}

#[utoipa::path(
    patch,
    path = "/pokemon/{criterion}",
    tag = "pokemon",
    summary = "Update pokedex entry",
    request_body = PokemonUpdate,
    params(
        ("criterion" = String, Path, description = "Document id, dex number, or species name"),
    ),
    responses(
        (status = 200, description = "The updated entry", body = PokemonResponse),
        (status = 400, description = "The patch collides with an existing name or code"),
        (status = 404, description = "No entry matched the criterion"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(criterion = %criterion))]
pub async fn update_pokemon(
    State(state): State<AppState>,
    Path(criterion): Path<String>,
    Json(update): Json<PokemonUpdate>,
) -> Result<Json<PokemonResponse>> {
    let existing = state
        .store
        .find_one(&Criterion::parse(&criterion))
        .await?
        .ok_or(Error::NotFound { criterion })?;

    let request = PokemonUpdateDBRequest::from(update);
    state.store.update_one(existing.id, &request).await?;

    // The response is the record we resolved, shallow-merged with the patch
    // client-side - not a re-fetch. A write racing between our resolve and
    // our update is not reflected here; accepted limitation.
    Ok(Json(PokemonResponse::from(existing.merged_with(&request))))
}

#[utoipa::path(
    delete,
    path = "/pokemon/{id}",
    tag = "pokemon",
    summary = "Remove pokedex entry (stub)",
    params(
        ("id" = i64, Path, description = "Dex number of the entry to remove"),
    ),
    responses(
        (status = 200, description = "Placeholder acknowledgement; nothing is deleted", body = String),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_pokemon(Path(id): Path<i64>) -> Result<String> {
    // Deliberate stub: no deletion is performed.
    Ok(format!("This action removes a #{id} pokemon"))
}
