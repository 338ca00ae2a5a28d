//! In-memory `EntityStore` with the same referential rules as the PostgreSQL schema:
//! pets must reference an existing person, and deleting a person deletes their pets.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use people_pets_api::datalayer::CRUD::store::EntityStore;
use people_pets_api::datalayer::CRUD::types::{NewPerson, NewPet, Person, Pet, PetChanges};
use people_pets_api::errors::dberrors::DbError;

#[derive(Default)]
struct Tables {
    people: BTreeMap<i64, Person>,
    pets: BTreeMap<i64, Pet>,
    next_person_id: i64,
    next_pet_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// When set, every call fails as if the database were unreachable
    pub broken: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>, DbError> {
        if self.broken.load(std::sync::atomic::Ordering::Relaxed) {
            return Err(DbError::QueryError("connection reset by peer".into()));
        }
        self.tables
            .lock()
            .map_err(|_| DbError::QueryError("store poisoned".into()))
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list_people(&self) -> Result<Vec<Person>, DbError> {
        Ok(self.tables()?.people.values().cloned().collect())
    }

    async fn get_person_by_id(&self, id: i64) -> Result<Option<Person>, DbError> {
        Ok(self.tables()?.people.get(&id).cloned())
    }

    async fn insert_person(&self, person: &NewPerson) -> Result<i64, DbError> {
        let mut tables = self.tables()?;
        tables.next_person_id += 1;
        let id = tables.next_person_id;
        tables.people.insert(
            id,
            Person {
                id,
                name: person.name.clone(),
                email: person.email.clone(),
                age: person.age,
            },
        );
        Ok(id)
    }

    async fn update_person(&self, id: i64, person: &NewPerson) -> Result<u64, DbError> {
        let mut tables = self.tables()?;
        match tables.people.get_mut(&id) {
            Some(row) => {
                row.name = person.name.clone();
                row.email = person.email.clone();
                row.age = person.age;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_person(&self, id: i64) -> Result<u64, DbError> {
        let mut tables = self.tables()?;
        let removed = tables.people.remove(&id).is_some();
        if removed {
            tables.pets.retain(|_, pet| pet.person_id != id);
        }
        Ok(u64::from(removed))
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, DbError> {
        Ok(self.tables()?.pets.values().cloned().collect())
    }

    async fn list_pets_by_person(&self, person_id: i64) -> Result<Vec<Pet>, DbError> {
        Ok(self
            .tables()?
            .pets
            .values()
            .filter(|pet| pet.person_id == person_id)
            .cloned()
            .collect())
    }

    async fn get_pet_by_id(&self, id: i64) -> Result<Option<Pet>, DbError> {
        Ok(self.tables()?.pets.get(&id).cloned())
    }

    async fn insert_pet(&self, pet: &NewPet) -> Result<i64, DbError> {
        let mut tables = self.tables()?;
        if !tables.people.contains_key(&pet.person_id) {
            return Err(DbError::ForeignKeyViolation(Some(
                "pets_person_id_fkey".to_string(),
            )));
        }
        tables.next_pet_id += 1;
        let id = tables.next_pet_id;
        tables.pets.insert(
            id,
            Pet {
                id,
                name: pet.name.clone(),
                species: pet.species.clone(),
                age: pet.age,
                person_id: pet.person_id,
            },
        );
        Ok(id)
    }

    async fn update_pet(&self, id: i64, changes: &PetChanges) -> Result<u64, DbError> {
        let mut tables = self.tables()?;
        match tables.pets.get_mut(&id) {
            Some(row) => {
                row.name = changes.name.clone();
                row.species = changes.species.clone();
                row.age = changes.age;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_pet(&self, id: i64) -> Result<u64, DbError> {
        Ok(u64::from(self.tables()?.pets.remove(&id).is_some()))
    }
}
