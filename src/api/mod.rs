//! HTTP API module: prediction, health, and metadata endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
