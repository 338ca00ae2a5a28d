use crate::datalayer::db_ops::db_health::verify_all_tables;
use sqlx::PgPool;
use tracing::{info, instrument};

/// Idempotent bootstrap DDL. Existing tables are left untouched.
const BOOTSTRAP_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS people (
        id      BIGSERIAL PRIMARY KEY,
        name    TEXT   NOT NULL,
        email   TEXT   NOT NULL,
        age     BIGINT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pets (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT   NOT NULL,
        species     TEXT   NOT NULL,
        age         BIGINT NOT NULL,
        person_id   BIGINT NOT NULL REFERENCES people (id) ON DELETE CASCADE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS pets_person_id_idx ON pets (person_id)",
];

/// Creates the people and pets tables when they are missing, then checks both exist
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in BOOTSTRAP_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    let verifications = verify_all_tables(pool).await?;
    let missing: Vec<&str> = verifications
        .iter()
        .filter(|v| !v.exists)
        .map(|v| v.table_name.as_str())
        .collect();

    if !missing.is_empty() {
        return Err(sqlx::Error::Protocol(format!(
            "Database not properly initialized. Missing tables: {:?}",
            missing
        )));
    }

    info!("Schema ready");
    Ok(())
}
