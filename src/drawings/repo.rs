use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::drawings::repo_types::{Drawing, DrawingPatch, DrawingSummary, NewDrawing};
use crate::error::RepoError;

/// Ownership-scoped access to drawings.
///
/// Every call takes the caller's id. Reads and mutations match on `(id, owner)` in a
/// single storage operation, so a drawing that exists but belongs to someone else is
/// reported exactly like one that does not exist.
#[async_trait]
pub trait DrawingRepository: Send + Sync {
    async fn create(&self, owner: Uuid, drawing: NewDrawing) -> Result<Drawing, RepoError>;

    /// Newest first.
    async fn list(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DrawingSummary>, RepoError>;

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Drawing>, RepoError>;

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: DrawingPatch,
    ) -> Result<Option<Drawing>, RepoError>;

    /// `false` when nothing matched.
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Clone)]
pub struct PgDrawingRepository {
    db: PgPool,
}

impl PgDrawingRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DrawingRepository for PgDrawingRepository {
    async fn create(&self, owner: Uuid, drawing: NewDrawing) -> Result<Drawing, RepoError> {
        let row = sqlx::query_as::<_, Drawing>(
            r#"
            INSERT INTO drawings (id, user_id, title, scene_data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, scene_data, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(&drawing.title)
        .bind(&drawing.scene_data)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DrawingSummary>, RepoError> {
        let rows = sqlx::query_as::<_, DrawingSummary>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM drawings
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Drawing>, RepoError> {
        let row = sqlx::query_as::<_, Drawing>(
            r#"
            SELECT id, user_id, title, scene_data, created_at, updated_at
            FROM drawings
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: DrawingPatch,
    ) -> Result<Option<Drawing>, RepoError> {
        let row = sqlx::query_as::<_, Drawing>(
            r#"
            UPDATE drawings
               SET title = COALESCE($3, title),
                   scene_data = COALESCE($4, scene_data),
                   updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, scene_data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(patch.title)
        .bind(patch.scene_data)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"DELETE FROM drawings WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Kept in insertion order so drawings created within the same clock tick still list newest first.
#[derive(Default)]
pub struct InMemoryDrawingRepository {
    drawings: RwLock<Vec<Drawing>>,
}

impl InMemoryDrawingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrawingRepository for InMemoryDrawingRepository {
    async fn create(&self, owner: Uuid, drawing: NewDrawing) -> Result<Drawing, RepoError> {
        let now = OffsetDateTime::now_utc();
        let record = Drawing {
            id: Uuid::new_v4(),
            user_id: owner,
            title: drawing.title,
            scene_data: drawing.scene_data,
            created_at: now,
            updated_at: now,
        };
        self.drawings.write().await.push(record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DrawingSummary>, RepoError> {
        let drawings = self.drawings.read().await;
        let mut owned: Vec<&Drawing> = drawings
            .iter()
            .rev()
            .filter(|d| d.user_id == owner)
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(DrawingSummary::from)
            .collect())
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Drawing>, RepoError> {
        Ok(self
            .drawings
            .read()
            .await
            .iter()
            .find(|d| d.id == id && d.user_id == owner)
            .cloned())
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: DrawingPatch,
    ) -> Result<Option<Drawing>, RepoError> {
        let mut drawings = self.drawings.write().await;
        let Some(drawing) = drawings
            .iter_mut()
            .find(|d| d.id == id && d.user_id == owner)
        else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            drawing.title = title;
        }
        if let Some(scene_data) = patch.scene_data {
            drawing.scene_data = scene_data;
        }
        drawing.updated_at = OffsetDateTime::now_utc();
        Ok(Some(drawing.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, RepoError> {
        let mut drawings = self.drawings.write().await;
        match drawings
            .iter()
            .position(|d| d.id == id && d.user_id == owner)
        {
            Some(idx) => {
                drawings.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
