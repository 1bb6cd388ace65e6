//! HTTP adapter: DTOs, handlers, routes, and API-key middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::ApiState;
pub use middleware::ApiKeyAuth;
pub use routes::api_routes;
