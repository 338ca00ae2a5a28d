use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::controllayer::payloads::JsonBody;
use crate::controllayer::people::people_handler;
use crate::datalayer::CRUD::types::{Person, Pet};
use crate::errors::errors::ServiceResult;
use crate::state::AppState;

/// GET /people
#[instrument(skip(state), fields(service = "/people"))]
pub async fn list_people(State(state): State<AppState>) -> ServiceResult<Json<Vec<Person>>> {
    people_handler::list_people(state.store()).await.map(Json)
}

/// GET /people/:id
#[instrument(skip(state), fields(service = "/people/:id"))]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Person>> {
    people_handler::get_person(state.store(), &id).await.map(Json)
}

/// GET /people/:id/pets
#[instrument(skip(state), fields(service = "/people/:id/pets"))]
pub async fn list_person_pets(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Vec<Pet>>> {
    people_handler::list_person_pets(state.store(), &id)
        .await
        .map(Json)
}

/// POST /people
#[instrument(skip(state, payload), fields(service = "/people"))]
pub async fn create_person(
    State(state): State<AppState>,
    payload: JsonBody,
) -> ServiceResult<(StatusCode, Json<Person>)> {
    let person = people_handler::create_person(state.store(), payload).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

/// PUT /people/:id
#[instrument(skip(state, payload), fields(service = "/people/:id"))]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: JsonBody,
) -> ServiceResult<Json<Person>> {
    people_handler::update_person(state.store(), &id, payload)
        .await
        .map(Json)
}

/// DELETE /people/:id
#[instrument(skip(state), fields(service = "/people/:id"))]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Person>> {
    people_handler::delete_person(state.store(), &id)
        .await
        .map(Json)
}
