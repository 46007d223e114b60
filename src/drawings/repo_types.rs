use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Drawing row; `user_id` is set at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub scene_data: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// List projection without the (potentially large) scene payload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DrawingSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&Drawing> for DrawingSummary {
    fn from(d: &Drawing) -> Self {
        Self {
            id: d.id,
            user_id: d.user_id,
            title: d.title.clone(),
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewDrawing {
    pub title: String,
    pub scene_data: String,
}

/// `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct DrawingPatch {
    pub title: Option<String>,
    pub scene_data: Option<String>,
}
