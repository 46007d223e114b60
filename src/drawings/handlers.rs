use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateDrawingRequest, Pagination, UpdateDrawingRequest};
use super::repo_types::{Drawing, DrawingPatch, DrawingSummary, NewDrawing};
use crate::{auth::AuthUser, error::AppError, extract::ApiJson, state::AppState};

pub fn drawing_routes() -> Router<AppState> {
    Router::new()
        .route("/drawings", get(list_drawings).post(create_drawing))
        .route(
            "/drawings/:id",
            get(get_drawing).put(update_drawing).delete(delete_drawing),
        )
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid drawing id".into()))
}

fn require_non_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

#[instrument(skip(state, body))]
pub async fn create_drawing(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateDrawingRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Drawing>), AppError> {
    require_non_empty(&body.title, "title")?;
    require_non_empty(&body.scene_data, "sceneData")?;

    let drawing = state
        .drawings
        .create(
            user_id,
            NewDrawing {
                title: body.title,
                scene_data: body.scene_data,
            },
        )
        .await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/v1/drawings/{}", drawing.id))
        .map_err(|e| AppError::Internal(e.into()))?;
    headers.insert(LOCATION, location);

    info!(%user_id, drawing_id = %drawing.id, "drawing created");
    Ok((StatusCode::CREATED, headers, Json(drawing)))
}

#[instrument(skip(state))]
pub async fn list_drawings(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<DrawingSummary>>, AppError> {
    let Query(p) =
        query.map_err(|_| AppError::Validation("Invalid pagination parameters".into()))?;
    let (limit, offset) = p.clamped();
    let items = state.drawings.list(user_id, limit, offset).await?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_drawing(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Drawing>, AppError> {
    let id = parse_id(&id)?;
    state
        .drawings
        .find(user_id, id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Drawing"))
}

#[instrument(skip(state, body))]
pub async fn update_drawing(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateDrawingRequest>,
) -> Result<Json<Drawing>, AppError> {
    let id = parse_id(&id)?;
    if let Some(title) = body.title.as_deref() {
        require_non_empty(title, "title")?;
    }

    let patch = DrawingPatch {
        title: body.title,
        scene_data: body.scene_data,
    };
    let drawing = state
        .drawings
        .update(user_id, id, patch)
        .await?
        .ok_or(AppError::NotFound("Drawing"))?;

    info!(%user_id, drawing_id = %id, "drawing updated");
    Ok(Json(drawing))
}

#[instrument(skip(state))]
pub async fn delete_drawing(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    if !state.drawings.delete(user_id, id).await? {
        return Err(AppError::NotFound("Drawing"));
    }
    info!(%user_id, drawing_id = %id, "drawing deleted");
    Ok(StatusCode::NO_CONTENT)
}
