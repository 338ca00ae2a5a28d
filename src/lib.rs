// Library exports for the server, the admin client and tests
pub mod config;
pub mod controllayer;
pub mod datalayer;
pub mod editor;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;
