use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::media::{next_sort, Media, MediaInsert, IMAGE_KIND},
    errors::AppError,
    repositories::sqlx_repo::SqlxMediaRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Media for a project in display order
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Media>, AppError>;

    /// Appends a media row at the end of the project's gallery
    async fn create(&self, media: &MediaInsert) -> Result<Media, AppError>;

    async fn update_caption(&self, id: Uuid, caption: &str) -> Result<Media, AppError>;

    async fn remove(&self, id: Uuid) -> Result<(), AppError>;
}

impl SqlxMediaRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxMediaRepo { pool }
    }
}

fn media_not_found() -> AppError {
    AppError::NotFound("Media not found".into())
}

#[async_trait]
impl MediaRepository for SqlxMediaRepo {
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Media>, AppError> {
        let media = sqlx::query_as::<_, Media>(
            "SELECT * FROM media WHERE project_id = $1 ORDER BY sort ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(media)
    }

    async fn create(&self, media: &MediaInsert) -> Result<Media, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the parent serializes concurrent appends to the same gallery
        let locked: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM projects WHERE id = $1 FOR UPDATE",
        )
        .bind(media.project_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Err(AppError::NotFound("Project not found".into()));
        }

        let current_max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(sort) FROM media WHERE project_id = $1",
        )
        .bind(media.project_id)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (project_id, kind, url, caption, sort)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(media.project_id)
        .bind(IMAGE_KIND)
        .bind(&media.url)
        .bind(&media.caption)
        .bind(next_sort(current_max))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(media_id = %row.id, sort = row.sort, "Media appended");
        Ok(row)
    }

    async fn update_caption(&self, id: Uuid, caption: &str) -> Result<Media, AppError> {
        sqlx::query_as::<_, Media>(
            "UPDATE media SET caption = $1 WHERE id = $2 RETURNING *",
        )
        .bind(caption)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(media_not_found)
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(media_not_found());
        }

        Ok(())
    }
}
