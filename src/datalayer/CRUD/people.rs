use super::types::{NewPerson, Person};
use crate::datalayer::db_ops::executor::{QueryExecutor, SqlArg};
use crate::errors::dberrors::DbError;

/// Person database operations
pub struct PeopleDB;

impl PeopleDB {
    pub async fn list(executor: &QueryExecutor) -> Result<Vec<Person>, DbError> {
        executor
            .fetch_all(
                r#"
                SELECT id, name, email, age
                FROM people
                ORDER BY id
                "#,
                &[],
            )
            .await
    }

    /// Get person by ID, `None` when no row matches
    pub async fn get_by_id(executor: &QueryExecutor, id: i64) -> Result<Option<Person>, DbError> {
        executor
            .fetch_optional(
                r#"
                SELECT id, name, email, age
                FROM people
                WHERE id = $1
                "#,
                &[SqlArg::from(id)],
            )
            .await
    }

    /// Insert a person and return its generated id
    pub async fn insert(executor: &QueryExecutor, person: &NewPerson) -> Result<i64, DbError> {
        let outcome = executor
            .insert_returning_id(
                r#"
                INSERT INTO people (name, email, age)
                VALUES ($1, $2, $3)
                RETURNING id
                "#,
                &[
                    SqlArg::from(person.name.as_str()),
                    SqlArg::from(person.email.as_str()),
                    SqlArg::from(person.age),
                ],
            )
            .await?;

        outcome
            .generated_id
            .ok_or(DbError::UnexpectedRowCount { expected: 1, actual: 0 })
    }

    /// Overwrite every writable column; returns the number of rows touched
    pub async fn update(
        executor: &QueryExecutor,
        id: i64,
        person: &NewPerson,
    ) -> Result<u64, DbError> {
        let outcome = executor
            .execute(
                r#"
                UPDATE people
                SET name = $1, email = $2, age = $3
                WHERE id = $4
                "#,
                &[
                    SqlArg::from(person.name.as_str()),
                    SqlArg::from(person.email.as_str()),
                    SqlArg::from(person.age),
                    SqlArg::from(id),
                ],
            )
            .await?;

        Ok(outcome.rows_affected)
    }

    /// Delete a person. Their pets go with them through the foreign key's ON DELETE CASCADE.
    pub async fn delete(executor: &QueryExecutor, id: i64) -> Result<u64, DbError> {
        let outcome = executor
            .execute("DELETE FROM people WHERE id = $1", &[SqlArg::from(id)])
            .await?;

        Ok(outcome.rows_affected)
    }
}
