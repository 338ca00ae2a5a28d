use tracing::{info, instrument, warn};

use crate::controllayer::payloads::{JsonBody, PetPatch, json_object};
use crate::controllayer::people::people_handler::parse_id;
use crate::datalayer::CRUD::store::EntityStore;
use crate::datalayer::CRUD::types::Pet;
use crate::errors::dberrors::DbError;
use crate::errors::errors::{ServiceError, ServiceResult};

/// Fetch a pet or fail with 404
pub async fn find_pet(store: &dyn EntityStore, id: i64) -> ServiceResult<Pet> {
    store
        .get_pet_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::PetNotFound(id.to_string()))
}

async fn reread_pet(store: &dyn EntityStore, id: i64) -> ServiceResult<Pet> {
    store
        .get_pet_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::InternalServerError(format!("pet {} vanished after write", id)))
}

#[instrument(skip(store))]
pub async fn list_pets(store: &dyn EntityStore) -> ServiceResult<Vec<Pet>> {
    let pets = store.list_pets().await?;
    info!(count = pets.len(), "Listed pets");
    Ok(pets)
}

#[instrument(skip(store))]
pub async fn get_pet(store: &dyn EntityStore, raw_id: &str) -> ServiceResult<Pet> {
    let id = parse_id(raw_id)?;
    find_pet(store, id).await
}

/// Create a pet. A missing owner surfaces as a foreign-key violation and becomes a 404.
#[instrument(skip(store, payload))]
pub async fn create_pet(store: &dyn EntityStore, payload: JsonBody) -> ServiceResult<Pet> {
    let body = json_object(payload)?;
    let pet = PetPatch::create_from_body(&body)?;

    let id = match store.insert_pet(&pet).await {
        Ok(id) => id,
        Err(DbError::ForeignKeyViolation(constraint)) => {
            warn!(
                person_id = pet.person_id,
                constraint = constraint.as_deref().unwrap_or("unknown"),
                "Pet owner does not exist"
            );
            return Err(ServiceError::OwnerNotFound(pet.person_id.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    info!(pet_id = id, person_id = pet.person_id, "Pet created");

    reread_pet(store, id).await
}

/// Update a pet's name, species or age. Naming the owner in the body is forbidden.
#[instrument(skip(store, payload))]
pub async fn update_pet(
    store: &dyn EntityStore,
    raw_id: &str,
    payload: JsonBody,
) -> ServiceResult<Pet> {
    let id = parse_id(raw_id)?;
    let body = json_object(payload)?;
    let patch = PetPatch::from_body(&body)?;

    let existing = find_pet(store, id).await?;
    if PetPatch::touches_owner(&body) {
        return Err(ServiceError::ImmutableField(PetPatch::IMMUTABLE_FIELD));
    }

    let changes = patch.apply_to(&existing);
    let rows = store.update_pet(id, &changes).await?;
    if rows == 0 {
        warn!(pet_id = id, "Update touched no rows");
        return Err(ServiceError::InternalServerError(format!(
            "update of pet {} affected no rows",
            id
        )));
    }
    info!(pet_id = id, "Pet updated");

    reread_pet(store, id).await
}

#[instrument(skip(store))]
pub async fn delete_pet(store: &dyn EntityStore, raw_id: &str) -> ServiceResult<Pet> {
    let id = parse_id(raw_id)?;
    let existing = find_pet(store, id).await?;

    store.delete_pet(id).await?;
    info!(pet_id = id, "Pet deleted");

    Ok(existing)
}
