use super::types::{NewPet, Pet, PetChanges};
use crate::datalayer::db_ops::executor::{QueryExecutor, SqlArg};
use crate::errors::dberrors::DbError;

/// Pet database operations
pub struct PetsDB;

impl PetsDB {
    pub async fn list(executor: &QueryExecutor) -> Result<Vec<Pet>, DbError> {
        executor
            .fetch_all(
                r#"
                SELECT id, name, species, age, person_id
                FROM pets
                ORDER BY id
                "#,
                &[],
            )
            .await
    }

    /// Pets owned by one person. An empty vec does not say whether the person exists.
    pub async fn list_by_person(
        executor: &QueryExecutor,
        person_id: i64,
    ) -> Result<Vec<Pet>, DbError> {
        executor
            .fetch_all(
                r#"
                SELECT id, name, species, age, person_id
                FROM pets
                WHERE person_id = $1
                ORDER BY id
                "#,
                &[SqlArg::from(person_id)],
            )
            .await
    }

    pub async fn get_by_id(executor: &QueryExecutor, id: i64) -> Result<Option<Pet>, DbError> {
        executor
            .fetch_optional(
                r#"
                SELECT id, name, species, age, person_id
                FROM pets
                WHERE id = $1
                "#,
                &[SqlArg::from(id)],
            )
            .await
    }

    /// Insert a pet; fails with `DbError::ForeignKeyViolation` when the owner does not exist
    pub async fn insert(executor: &QueryExecutor, pet: &NewPet) -> Result<i64, DbError> {
        let outcome = executor
            .insert_returning_id(
                r#"
                INSERT INTO pets (person_id, name, species, age)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
                &[
                    SqlArg::from(pet.person_id),
                    SqlArg::from(pet.name.as_str()),
                    SqlArg::from(pet.species.as_str()),
                    SqlArg::from(pet.age),
                ],
            )
            .await?;

        outcome
            .generated_id
            .ok_or(DbError::UnexpectedRowCount { expected: 1, actual: 0 })
    }

    pub async fn update(
        executor: &QueryExecutor,
        id: i64,
        changes: &PetChanges,
    ) -> Result<u64, DbError> {
        let outcome = executor
            .execute(
                r#"
                UPDATE pets
                SET name = $1, species = $2, age = $3
                WHERE id = $4
                "#,
                &[
                    SqlArg::from(changes.name.as_str()),
                    SqlArg::from(changes.species.as_str()),
                    SqlArg::from(changes.age),
                    SqlArg::from(id),
                ],
            )
            .await?;

        Ok(outcome.rows_affected)
    }

    pub async fn delete(executor: &QueryExecutor, id: i64) -> Result<u64, DbError> {
        let outcome = executor
            .execute("DELETE FROM pets WHERE id = $1", &[SqlArg::from(id)])
            .await?;

        Ok(outcome.rows_affected)
    }
}
