use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use claims::Claims;
pub use extractors::{require_auth, AuthUser};
pub use jwt::{JwtKeys, TokenError};
pub use repo::{InMemoryUserRepository, PgUserRepository, UserRepository};
pub use services::AuthService;

/// Registration and login; reachable without a token.
pub fn public_router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Routes that expect the access gate in front of them.
pub fn protected_router() -> Router<AppState> {
    handlers::me_routes()
}
