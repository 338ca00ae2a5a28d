use std::path::Path;

use axum::{Router, middleware, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::handlers::{health, people, pets};
use crate::middleware::{error_logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Create the main application router with all routes and middleware.
///
/// Anything no route claims is served from `public_dir`.
pub fn create_router(state: AppState, public_dir: impl AsRef<Path>) -> Router {
    let health_routes = Router::new().route("/health", get(health::health_check));

    let people_routes = Router::new()
        .route("/people", get(people::list_people).post(people::create_person))
        .route(
            "/people/:id",
            get(people::get_person)
                .put(people::update_person)
                .delete(people::delete_person),
        )
        .route("/people/:id/pets", get(people::list_person_pets));

    let pet_routes = Router::new()
        .route("/pets", get(pets::list_pets).post(pets::create_pet))
        .route(
            "/pets/:id",
            get(pets::get_pet)
                .put(pets::update_pet)
                .delete(pets::delete_pet),
        );

    Router::new()
        .merge(health_routes)
        .merge(people_routes)
        .merge(pet_routes)
        .fallback_service(ServeDir::new(public_dir.as_ref()))
        .with_state(state)
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
