use axum::Router;

pub mod system;
pub mod user;

/// Router for the member endpoints.
pub fn router() -> Router {
    Router::new().nest("/api/user", user::router())
}
