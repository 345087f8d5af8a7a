use async_trait::async_trait;
use sqlx::{query_builder::Separated, Encode, PgPool, Postgres, QueryBuilder, Type};
use uuid::Uuid;

use crate::{
    entities::{
        option_fields::OptionField,
        project::{NewProject, Project, ProjectChanges},
    },
    errors::{is_unique_violation, AppError},
    repositories::sqlx_repo::SqlxProjectRepo,
};

/// Unique index on `LOWER(slug)`; the authoritative slug guard.
pub const SLUG_UNIQUE_INDEX: &str = "projects_slug_lower_key";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;

    /// Inserts a project and returns it with its generated id and timestamps
    async fn create(&self, project: &NewProject) -> Result<Project, AppError>;

    /// All projects, newest first
    async fn list(&self) -> Result<Vec<Project>, AppError>;

    /// Case-insensitive exact match; zero rows is `Ok(None)`
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, AppError>;

    /// Applies the present fields of `changes`
    async fn update(&self, id: Uuid, changes: &ProjectChanges) -> Result<Project, AppError>;

    async fn set_cover_image(&self, id: Uuid, url: &str) -> Result<Project, AppError>;

    /// Deletes the project and all of its media in one transaction
    async fn remove(&self, id: Uuid) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e, SLUG_UNIQUE_INDEX) {
        return AppError::Conflict("Slug already exists".into());
    }
    AppError::from(e)
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

fn push_change<'args, T>(
    set: &mut Separated<'_, 'args, Postgres, &'static str>,
    column: &str,
    field: &OptionField<T>,
) where
    T: Clone + Send + 'args + Encode<'args, Postgres> + Type<Postgres>,
{
    match field {
        OptionField::Unchanged => {}
        OptionField::SetToNull => {
            set.push(format!("{column} = NULL"));
        }
        OptionField::SetToValue(value) => {
            set.push(format!("{column} = "));
            set.push_bind_unseparated(value.clone());
        }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create(&self, project: &NewProject) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                title, slug, summary, body_mdx, status, industry, tech_stack, highlight,
                cover_image_url, youtube_url, repo_url, live_url, dataset_url,
                started_on, completed_on, kpis, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.summary)
        .bind(&project.body_mdx)
        .bind(project.status)
        .bind(&project.industry)
        .bind(&project.tech_stack)
        .bind(project.highlight)
        .bind(&project.cover_image_url)
        .bind(&project.youtube_url)
        .bind(&project.repo_url)
        .bind(&project.live_url)
        .bind(&project.dataset_url)
        .bind(project.started_on)
        .bind(project.completed_on)
        .bind(&project.kpis)
        .bind(&project.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn list(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError> {
        sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE LOWER(slug) = LOWER($1) LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, id: Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE projects SET ");

        let mut set = builder.separated(", ");
        push_change(&mut set, "title", &changes.title);
        push_change(&mut set, "slug", &changes.slug);
        push_change(&mut set, "summary", &changes.summary);
        push_change(&mut set, "body_mdx", &changes.body_mdx);
        push_change(&mut set, "status", &changes.status);
        push_change(&mut set, "industry", &changes.industry);
        push_change(&mut set, "tech_stack", &changes.tech_stack);
        push_change(&mut set, "highlight", &changes.highlight);
        push_change(&mut set, "cover_image_url", &changes.cover_image_url);
        push_change(&mut set, "youtube_url", &changes.youtube_url);
        push_change(&mut set, "repo_url", &changes.repo_url);
        push_change(&mut set, "live_url", &changes.live_url);
        push_change(&mut set, "dataset_url", &changes.dataset_url);
        push_change(&mut set, "started_on", &changes.started_on);
        push_change(&mut set, "completed_on", &changes.completed_on);
        push_change(&mut set, "kpis", &changes.kpis);
        push_change(&mut set, "tags", &changes.tags);
        set.push("updated_at = NOW()");

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<Project>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?
            .ok_or_else(project_not_found)
    }

    async fn set_cover_image(&self, id: Uuid, url: &str) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET cover_image_url = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(project_not_found)
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM media WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(project_not_found());
        }

        tx.commit().await?;
        Ok(())
    }
}
