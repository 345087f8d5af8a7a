use std::sync::Arc;

use uuid::Uuid;

use crate::{
    entities::project::{CoverImageRequest, Project, ProjectPayload},
    errors::AppError,
    repositories::project::ProjectRepository,
    storage::object_storage::ObjectStorage,
    utils::valid_uuid::valid_uuid,
    validation::{canonical_url, normalize_create, normalize_slug, normalize_update},
};

const PROJECT_NOT_FOUND: &str = "Project not found";

pub struct ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub project_repo: Arc<R>,
    pub storage: Option<Arc<dyn ObjectStorage>>,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository + ?Sized,
{
    pub fn new(project_repo: Arc<R>, storage: Option<Arc<dyn ObjectStorage>>) -> Self {
        ProjectHandler { project_repo, storage }
    }

    /// Validates the payload and inserts it, rejecting a slug that is already taken
    pub async fn create_project(&self, payload: ProjectPayload) -> Result<Project, AppError> {
        let project = normalize_create(payload)?;

        if self.project_repo.find_by_slug(&project.slug).await?.is_some() {
            return Err(AppError::Conflict("Slug already exists".to_string()));
        }

        let created = self.project_repo.create(&project).await?;
        tracing::info!(project_id = %created.id, slug = %created.slug, "Project created");
        Ok(created)
    }

    /// Applies a partial update. Renaming to a slug owned by another project is a conflict.
    pub async fn update_project(&self, id: &str, payload: ProjectPayload) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id, PROJECT_NOT_FOUND)?;
        let changes = normalize_update(payload)?;

        if let Some(slug) = changes.new_slug() {
            if let Some(existing) = self.project_repo.find_by_slug(slug).await? {
                if existing.id != valid_id {
                    return Err(AppError::Conflict("Slug already exists".to_string()));
                }
            }
        }

        self.project_repo.update(valid_id, &changes).await
    }

    /// Deletes a project together with its media
    pub async fn delete_project(&self, id: &str) -> Result<Uuid, AppError> {
        let valid_id = valid_uuid(id, PROJECT_NOT_FOUND)?;
        self.project_repo.remove(valid_id).await?;

        tracing::info!(project_id = %valid_id, "Project deleted");
        Ok(valid_id)
    }

    pub async fn get_project_by_id(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id, PROJECT_NOT_FOUND)?;
        self.project_repo
            .find_by_id(valid_id)
            .await?
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.to_string()))
    }

    pub async fn get_project_by_slug(&self, slug: &str) -> Result<Project, AppError> {
        self.project_repo
            .find_by_slug(&normalize_slug(slug))
            .await?
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.to_string()))
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list().await
    }

    /// Replaces the cover image, removing the previous one from our bucket when possible
    pub async fn set_cover(&self, id: &str, request: CoverImageRequest) -> Result<Project, AppError> {
        let raw = request
            .url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::ValidationError("url is required".to_string()))?;
        let url = canonical_url("url", raw.trim())?;

        let valid_id = valid_uuid(id, PROJECT_NOT_FOUND)?;
        let existing = self.get_project_by_id(id).await?;

        let old_url = existing.cover_image_url.unwrap_or_default();
        if !old_url.is_empty() && old_url != url {
            self.remove_old_cover(&old_url).await;
        }

        self.project_repo.set_cover_image(valid_id, &url).await
    }

    pub async fn check_connection(&self) -> Result<(), AppError> {
        self.project_repo.check_connection().await
    }

    async fn remove_old_cover(&self, old_url: &str) {
        let Some(storage) = &self.storage else {
            return;
        };
        let Some(path) = storage.object_path(old_url) else {
            return;
        };

        if let Err(e) = storage.remove(vec![path]).await {
            tracing::warn!("Could not remove old cover: {}", e);
        }
    }
}
