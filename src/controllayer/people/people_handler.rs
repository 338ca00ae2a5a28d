use tracing::{info, instrument, warn};

use crate::controllayer::payloads::{JsonBody, PersonPatch, json_object};
use crate::controllayer::validators::parse_integerish;
use crate::datalayer::CRUD::store::EntityStore;
use crate::datalayer::CRUD::types::{Person, Pet};
use crate::errors::errors::{ServiceError, ServiceResult};

/// Parse a `:id` path segment
pub fn parse_id(raw: &str) -> ServiceResult<i64> {
    parse_integerish(raw).ok_or_else(|| ServiceError::InvalidId(raw.to_string()))
}

/// Fetch a person or fail with 404
pub async fn find_person(store: &dyn EntityStore, id: i64) -> ServiceResult<Person> {
    store
        .get_person_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::PersonNotFound(id.to_string()))
}

/// Re-read a row that was just written. Its absence is a server fault, not a 404.
async fn reread_person(store: &dyn EntityStore, id: i64) -> ServiceResult<Person> {
    store.get_person_by_id(id).await?.ok_or_else(|| {
        ServiceError::InternalServerError(format!("person {} vanished after write", id))
    })
}

#[instrument(skip(store))]
pub async fn list_people(store: &dyn EntityStore) -> ServiceResult<Vec<Person>> {
    let people = store.list_people().await?;
    info!(count = people.len(), "Listed people");
    Ok(people)
}

#[instrument(skip(store))]
pub async fn get_person(store: &dyn EntityStore, raw_id: &str) -> ServiceResult<Person> {
    let id = parse_id(raw_id)?;
    find_person(store, id).await
}

/// Pets owned by a person. The person must exist; owning nothing yields an empty list.
#[instrument(skip(store))]
pub async fn list_person_pets(store: &dyn EntityStore, raw_id: &str) -> ServiceResult<Vec<Pet>> {
    let id = parse_id(raw_id)?;
    find_person(store, id).await?;

    let pets = store.list_pets_by_person(id).await?;
    info!(person_id = id, count = pets.len(), "Listed pets for person");
    Ok(pets)
}

#[instrument(skip(store, payload))]
pub async fn create_person(store: &dyn EntityStore, payload: JsonBody) -> ServiceResult<Person> {
    let body = json_object(payload)?;
    let person = PersonPatch::create_from_body(&body)?;

    let id = store.insert_person(&person).await?;
    info!(person_id = id, "Person created");

    reread_person(store, id).await
}

#[instrument(skip(store, payload))]
pub async fn update_person(
    store: &dyn EntityStore,
    raw_id: &str,
    payload: JsonBody,
) -> ServiceResult<Person> {
    let id = parse_id(raw_id)?;
    let body = json_object(payload)?;
    let patch = PersonPatch::from_body(&body)?;

    let existing = find_person(store, id).await?;
    let merged = patch.apply_to(&existing)?;

    let rows = store.update_person(id, &merged).await?;
    if rows == 0 {
        warn!(person_id = id, "Update touched no rows");
        return Err(ServiceError::InternalServerError(format!(
            "update of person {} affected no rows",
            id
        )));
    }
    info!(person_id = id, "Person updated");

    reread_person(store, id).await
}

/// Delete a person and return the row as it was before deletion
#[instrument(skip(store))]
pub async fn delete_person(store: &dyn EntityStore, raw_id: &str) -> ServiceResult<Person> {
    let id = parse_id(raw_id)?;
    let existing = find_person(store, id).await?;

    store.delete_person(id).await?;
    info!(person_id = id, "Person deleted");

    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalayer::CRUD::store::MockEntityStore;
    use crate::datalayer::CRUD::types::NewPerson;
    use crate::errors::dberrors::DbError;
    use axum::Json;
    use mockall::predicate::eq;
    use serde_json::json;

    fn ada() -> Person {
        Person {
            id: 5,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: 30,
        }
    }

    #[tokio::test]
    async fn test_invalid_id_never_touches_storage() {
        // No expectations: any store call panics
        let store = MockEntityStore::new();

        for result in [
            get_person(&store, "abc").await.map(|_| ()),
            delete_person(&store, "1.5").await.map(|_| ()),
            list_person_pets(&store, "").await.map(|_| ()),
            update_person(&store, "x", Ok(Json(json!({ "age": 1 }))))
                .await
                .map(|_| ()),
        ] {
            assert!(matches!(result, Err(ServiceError::InvalidId(_))));
        }
    }

    #[tokio::test]
    async fn test_get_missing_person_is_not_found() {
        let mut store = MockEntityStore::new();
        store
            .expect_get_person_by_id()
            .with(eq(9))
            .returning(|_| Ok(None));

        let err = get_person(&store, "9").await.unwrap_err();
        assert_eq!(err.to_string(), "No person was found with the id 9.");
    }

    #[tokio::test]
    async fn test_create_rereads_inserted_row() {
        let mut store = MockEntityStore::new();
        store
            .expect_insert_person()
            .withf(|p: &NewPerson| p.name == "Ada" && p.age == 30)
            .times(1)
            .returning(|_| Ok(5));
        store
            .expect_get_person_by_id()
            .with(eq(5))
            .returning(|_| Ok(Some(ada())));

        let person = create_person(
            &store,
            Ok(Json(json!({ "name": "Ada", "email": "ada@example.com", "age": "30" }))),
        )
        .await
        .unwrap();
        assert_eq!(person, ada());
    }

    #[tokio::test]
    async fn test_create_with_bad_email_skips_insert() {
        let store = MockEntityStore::new();
        let err = create_person(
            &store,
            Ok(Json(json!({ "name": "Ada", "email": "a@b", "age": 30 }))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_partial_update_merges_existing_fields() {
        let mut store = MockEntityStore::new();
        let mut reads = 0;
        store.expect_get_person_by_id().returning(move |_| {
            reads += 1;
            let mut person = ada();
            if reads > 1 {
                person.age = 31;
            }
            Ok(Some(person))
        });
        store
            .expect_update_person()
            .withf(|id, p| {
                *id == 5 && p.name == "Ada" && p.email == "ada@example.com" && p.age == 31
            })
            .times(1)
            .returning(|_, _| Ok(1));

        let updated = update_person(&store, "5", Ok(Json(json!({ "age": 31 }))))
            .await
            .unwrap();
        assert_eq!(updated.age, 31);
        assert_eq!(updated.name, "Ada");
    }

    #[tokio::test]
    async fn test_update_touching_no_rows_is_a_server_error() {
        let mut store = MockEntityStore::new();
        store
            .expect_get_person_by_id()
            .returning(|_| Ok(Some(ada())));
        store.expect_update_person().returning(|_, _| Ok(0));

        let err = update_person(&store, "5", Ok(Json(json!({ "name": "Bo" }))))
            .await
            .unwrap_err();
        assert!(err.status_code().is_server_error());
    }

    #[tokio::test]
    async fn test_nested_list_for_person_without_pets_is_empty() {
        let mut store = MockEntityStore::new();
        store
            .expect_get_person_by_id()
            .returning(|_| Ok(Some(ada())));
        store
            .expect_list_pets_by_person()
            .with(eq(5))
            .returning(|_| Ok(Vec::new()));

        assert!(list_person_pets(&store, "5").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_returns_row_captured_before_delete() {
        let mut store = MockEntityStore::new();
        store
            .expect_get_person_by_id()
            .times(1)
            .returning(|_| Ok(Some(ada())));
        store
            .expect_delete_person()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(1));

        assert_eq!(delete_person(&store, "5").await.unwrap(), ada());
    }

    #[tokio::test]
    async fn test_storage_failure_is_opaque() {
        let mut store = MockEntityStore::new();
        store
            .expect_list_people()
            .returning(|| Err(DbError::QueryError("relation missing".into())));

        let err = list_people(&store).await.unwrap_err();
        assert!(err.status_code().is_server_error());
    }
}
