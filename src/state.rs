use std::sync::Arc;

use crate::datalayer::CRUD::store::{EntityStore, PgStore};
use crate::datalayer::DbOps;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Record storage behind the route handlers
    pub store: Arc<dyn EntityStore>,
    /// Present when backed by PostgreSQL; used by the health check
    pub db: Option<DbOps>,
}

impl AppState {
    /// State over an initialized database
    pub fn from_db(db: DbOps) -> Self {
        let store = PgStore::new(db.executor().clone());
        Self {
            store: Arc::new(store),
            db: Some(db),
        }
    }

    /// State over any store, with no database health to report
    pub fn with_store(store: Arc<dyn EntityStore>) -> Self {
        Self { store, db: None }
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }
}
