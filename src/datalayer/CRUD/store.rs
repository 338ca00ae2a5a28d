use async_trait::async_trait;

use super::people::PeopleDB;
use super::pets::PetsDB;
use super::types::{NewPerson, NewPet, Person, Pet, PetChanges};
use crate::datalayer::db_ops::executor::QueryExecutor;
use crate::errors::dberrors::DbError;

/// Storage seam used by the control layer.
///
/// Implementations must enforce the pet → person foreign key (reporting
/// `DbError::ForeignKeyViolation`) and cascade person deletes to their pets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn list_people(&self) -> Result<Vec<Person>, DbError>;
    async fn get_person_by_id(&self, id: i64) -> Result<Option<Person>, DbError>;
    async fn insert_person(&self, person: &NewPerson) -> Result<i64, DbError>;
    async fn update_person(&self, id: i64, person: &NewPerson) -> Result<u64, DbError>;
    async fn delete_person(&self, id: i64) -> Result<u64, DbError>;

    async fn list_pets(&self) -> Result<Vec<Pet>, DbError>;
    async fn list_pets_by_person(&self, person_id: i64) -> Result<Vec<Pet>, DbError>;
    async fn get_pet_by_id(&self, id: i64) -> Result<Option<Pet>, DbError>;
    async fn insert_pet(&self, pet: &NewPet) -> Result<i64, DbError>;
    async fn update_pet(&self, id: i64, changes: &PetChanges) -> Result<u64, DbError>;
    async fn delete_pet(&self, id: i64) -> Result<u64, DbError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    executor: QueryExecutor,
}

impl PgStore {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn list_people(&self) -> Result<Vec<Person>, DbError> {
        PeopleDB::list(&self.executor).await
    }

    async fn get_person_by_id(&self, id: i64) -> Result<Option<Person>, DbError> {
        PeopleDB::get_by_id(&self.executor, id).await
    }

    async fn insert_person(&self, person: &NewPerson) -> Result<i64, DbError> {
        PeopleDB::insert(&self.executor, person).await
    }

    async fn update_person(&self, id: i64, person: &NewPerson) -> Result<u64, DbError> {
        PeopleDB::update(&self.executor, id, person).await
    }

    async fn delete_person(&self, id: i64) -> Result<u64, DbError> {
        PeopleDB::delete(&self.executor, id).await
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, DbError> {
        PetsDB::list(&self.executor).await
    }

    async fn list_pets_by_person(&self, person_id: i64) -> Result<Vec<Pet>, DbError> {
        PetsDB::list_by_person(&self.executor, person_id).await
    }

    async fn get_pet_by_id(&self, id: i64) -> Result<Option<Pet>, DbError> {
        PetsDB::get_by_id(&self.executor, id).await
    }

    async fn insert_pet(&self, pet: &NewPet) -> Result<i64, DbError> {
        PetsDB::insert(&self.executor, pet).await
    }

    async fn update_pet(&self, id: i64, changes: &PetChanges) -> Result<u64, DbError> {
        PetsDB::update(&self.executor, id, changes).await
    }

    async fn delete_pet(&self, id: i64) -> Result<u64, DbError> {
        PetsDB::delete(&self.executor, id).await
    }
}
