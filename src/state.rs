use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{
    AuthService, InMemoryUserRepository, JwtKeys, PgUserRepository, UserRepository,
};
use crate::config::AppConfig;
use crate::drawings::{DrawingRepository, InMemoryDrawingRepository, PgDrawingRepository};

/// Shared per-process handles; cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: Arc<JwtKeys>,
    pub auth: AuthService,
    pub drawings: Arc<dyn DrawingRepository>,
}

impl AppState {
    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
        drawings: Arc<dyn DrawingRepository>,
    ) -> Self {
        let keys = Arc::new(JwtKeys::new(&config.jwt));
        let auth = AuthService::new(users, Arc::clone(&keys));
        Self {
            config,
            keys,
            auth,
            drawings,
        }
    }

    /// Postgres-backed state sharing one pool between both repositories.
    pub fn postgres(config: Arc<AppConfig>, db: PgPool) -> Self {
        let users = Arc::new(PgUserRepository::new(db.clone())) as Arc<dyn UserRepository>;
        let drawings = Arc::new(PgDrawingRepository::new(db)) as Arc<dyn DrawingRepository>;
        Self::from_parts(config, users, drawings)
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self::from_parts(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryDrawingRepository::new()),
        )
    }
}
