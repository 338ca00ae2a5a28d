use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::controllayer::payloads::JsonBody;
use crate::controllayer::pets::pets_handler;
use crate::datalayer::CRUD::types::Pet;
use crate::errors::errors::ServiceResult;
use crate::state::AppState;

/// GET /pets
#[instrument(skip(state), fields(service = "/pets"))]
pub async fn list_pets(State(state): State<AppState>) -> ServiceResult<Json<Vec<Pet>>> {
    pets_handler::list_pets(state.store()).await.map(Json)
}

/// GET /pets/:id
#[instrument(skip(state), fields(service = "/pets/:id"))]
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Pet>> {
    pets_handler::get_pet(state.store(), &id).await.map(Json)
}

/// POST /pets
#[instrument(skip(state, payload), fields(service = "/pets"))]
pub async fn create_pet(
    State(state): State<AppState>,
    payload: JsonBody,
) -> ServiceResult<(StatusCode, Json<Pet>)> {
    let pet = pets_handler::create_pet(state.store(), payload).await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

/// PUT /pets/:id
#[instrument(skip(state, payload), fields(service = "/pets/:id"))]
pub async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: JsonBody,
) -> ServiceResult<Json<Pet>> {
    pets_handler::update_pet(state.store(), &id, payload)
        .await
        .map(Json)
}

/// DELETE /pets/:id
#[instrument(skip(state), fields(service = "/pets/:id"))]
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Pet>> {
    pets_handler::delete_pet(state.store(), &id).await.map(Json)
}
