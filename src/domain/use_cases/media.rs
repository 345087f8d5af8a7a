use std::sync::Arc;

use chrono::Utc;

use crate::{
    entities::media::{
        Media, MediaInsert, NewMediaRequest, SignUploadRequest, SignedUploadResponse,
        UpdateMediaRequest,
    },
    errors::{AppError, StorageError},
    repositories::media::MediaRepository,
    storage::object_storage::{upload_path, ObjectStorage},
    utils::valid_uuid::valid_uuid,
};

const PROJECT_NOT_FOUND: &str = "Project not found";
const MEDIA_NOT_FOUND: &str = "Media not found";

pub struct MediaHandler<R>
where
    R: MediaRepository + ?Sized,
{
    pub media_repo: Arc<R>,
    pub storage: Option<Arc<dyn ObjectStorage>>,
}

impl<R> MediaHandler<R>
where
    R: MediaRepository + ?Sized,
{
    pub fn new(media_repo: Arc<R>, storage: Option<Arc<dyn ObjectStorage>>) -> Self {
        MediaHandler { media_repo, storage }
    }

    /// Media of a project in gallery order
    pub async fn list_media(&self, project_id: &str) -> Result<Vec<Media>, AppError> {
        let valid_id = valid_uuid(project_id, PROJECT_NOT_FOUND)?;
        self.media_repo.list_for_project(valid_id).await
    }

    /// Appends an already uploaded image to the end of the gallery
    pub async fn create_media(&self, project_id: &str, request: NewMediaRequest) -> Result<Media, AppError> {
        let url = request
            .url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AppError::ValidationError("url is required".to_string()))?;

        let valid_id = valid_uuid(project_id, PROJECT_NOT_FOUND)?;

        let insert = MediaInsert {
            project_id: valid_id,
            url,
            caption: request.caption.unwrap_or_default(),
        };

        self.media_repo.create(&insert).await
    }

    pub async fn update_caption(&self, media_id: &str, request: UpdateMediaRequest) -> Result<Media, AppError> {
        let valid_id = valid_uuid(media_id, MEDIA_NOT_FOUND)?;
        let caption = request.caption.unwrap_or_default();
        self.media_repo.update_caption(valid_id, &caption).await
    }

    pub async fn delete_media(&self, media_id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(media_id, MEDIA_NOT_FOUND)?;
        self.media_repo.remove(valid_id).await
    }

    /// Reserves an object path and asks storage for a one-shot upload URL
    pub async fn sign_upload(&self, request: SignUploadRequest) -> Result<SignedUploadResponse, AppError> {
        let storage = self.storage.as_ref().ok_or(StorageError::NotConfigured)?;

        let path = upload_path(
            request.project_id.as_deref().unwrap_or_default(),
            request.filename.as_deref().unwrap_or_default(),
            Utc::now().timestamp_millis(),
        )?;

        let signed = storage.create_signed_upload(&path).await.map_err(|e| {
            tracing::error!("Storage sign-upload error: {}", e);
            AppError::from(e)
        })?;

        Ok(SignedUploadResponse {
            public_url: storage.public_url(&signed.path),
            path: signed.path,
            token: signed.token,
            signed_url: signed.signed_url,
        })
    }
}
