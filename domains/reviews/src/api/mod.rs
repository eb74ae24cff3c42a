//! API layer for the Reviews domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ReviewsState;
pub use routes::routes;
