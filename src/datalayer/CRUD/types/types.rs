use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::controllayer::validators::EMAIL_REGEX;

/// Person struct matching the people table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Pet struct matching the pets table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub age: i64,
    pub person_id: i64,
}

/// Every writable person column. Used for inserts and for full-record updates.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewPerson {
    pub name: String,
    #[validate(regex(path = *EMAIL_REGEX, message = "Parameter 'email' was invalid."))]
    pub email: String,
    pub age: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub person_id: i64,
    pub name: String,
    pub species: String,
    pub age: i64,
}

/// Writable pet columns after creation; the owner is fixed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetChanges {
    pub name: String,
    pub species: String,
    pub age: i64,
}
