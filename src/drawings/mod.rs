mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub use repo::{DrawingRepository, InMemoryDrawingRepository, PgDrawingRepository};
pub use repo_types::{Drawing, DrawingPatch, DrawingSummary, NewDrawing};

/// All drawing routes; must be mounted behind the access gate.
pub fn router() -> Router<AppState> {
    handlers::drawing_routes()
}
