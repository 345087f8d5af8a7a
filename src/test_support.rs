//! In-memory repositories used by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    entities::{
        media::{next_sort, Media, MediaInsert, IMAGE_KIND},
        option_fields::OptionField,
        project::{NewProject, Project, ProjectChanges, ProjectStatus},
    },
    errors::AppError,
    middlewares::auth::AdminCredentials,
    repositories::{
        media::MediaRepository, project::ProjectRepository, skill::MockSkillRepository,
    },
    AppState,
};

/// App state over in-memory repositories with `admin` / `s3cret` credentials and no storage.
pub fn test_state() -> AppState {
    AppState::from_parts(
        Arc::new(InMemoryProjects::default()),
        Arc::new(InMemoryMedia::default()),
        Arc::new(MockSkillRepository::new()),
        None,
        AdminCredentials::new("admin", "s3cret"),
    )
}

pub fn project_fixture(id: Uuid, slug: &str) -> Project {
    let now = Utc::now();
    Project {
        id,
        title: "Fixture".to_string(),
        slug: slug.to_string(),
        summary: "Summary".to_string(),
        body_mdx: String::new(),
        status: ProjectStatus::Draft,
        industry: None,
        tech_stack: Vec::new(),
        highlight: false,
        cover_image_url: Some(String::new()),
        youtube_url: None,
        repo_url: None,
        live_url: None,
        dataset_url: None,
        started_on: None,
        completed_on: None,
        kpis: None,
        tags: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn apply<T>(target: &mut T, field: &OptionField<T>)
where
    T: Clone + Default,
{
    match field {
        OptionField::Unchanged => {}
        OptionField::SetToNull => *target = T::default(),
        OptionField::SetToValue(value) => *target = value.clone(),
    }
}

fn apply_nullable<T: Clone>(target: &mut Option<T>, field: &OptionField<T>) {
    if !field.is_unchanged() {
        *target = field.value_ref().cloned();
    }
}

/// Project store honouring the case-insensitive slug index.
#[derive(Default)]
pub struct InMemoryProjects {
    pub rows: Mutex<Vec<Project>>,
}

impl InMemoryProjects {
    fn slug_taken(rows: &[Project], slug: &str, except: Option<Uuid>) -> bool {
        rows.iter()
            .any(|p| p.slug.to_lowercase() == slug.to_lowercase() && Some(p.id) != except)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjects {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create(&self, project: &NewProject) -> Result<Project, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if Self::slug_taken(&rows, &project.slug, None) {
            return Err(AppError::Conflict("Slug already exists".into()));
        }

        let mut created = project_fixture(Uuid::new_v4(), &project.slug);
        created.title = project.title.clone();
        created.summary = project.summary.clone();
        created.body_mdx = project.body_mdx.clone();
        created.status = project.status;
        created.industry = project.industry.clone();
        created.tech_stack = project.tech_stack.clone();
        created.highlight = project.highlight;
        created.cover_image_url = Some(project.cover_image_url.clone());
        created.youtube_url = project.youtube_url.clone();
        created.repo_url = project.repo_url.clone();
        created.live_url = project.live_url.clone();
        created.dataset_url = project.dataset_url.clone();
        created.started_on = project.started_on;
        created.completed_on = project.completed_on;
        created.kpis = project.kpis.clone();
        created.tags = project.tags.clone();

        rows.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Project>, AppError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.reverse();
        Ok(rows)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|p| p.slug.to_lowercase() == slug.to_lowercase())
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(slug) = changes.slug.value_ref() {
            if Self::slug_taken(&rows, slug, Some(id)) {
                return Err(AppError::Conflict("Slug already exists".into()));
            }
        }

        let project = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        apply(&mut project.title, &changes.title);
        apply(&mut project.slug, &changes.slug);
        apply(&mut project.summary, &changes.summary);
        apply(&mut project.body_mdx, &changes.body_mdx);
        apply(&mut project.status, &changes.status);
        apply(&mut project.tech_stack, &changes.tech_stack);
        apply(&mut project.highlight, &changes.highlight);
        apply(&mut project.tags, &changes.tags);
        apply_nullable(&mut project.industry, &changes.industry);
        apply_nullable(&mut project.cover_image_url, &changes.cover_image_url);
        apply_nullable(&mut project.youtube_url, &changes.youtube_url);
        apply_nullable(&mut project.repo_url, &changes.repo_url);
        apply_nullable(&mut project.live_url, &changes.live_url);
        apply_nullable(&mut project.dataset_url, &changes.dataset_url);
        apply_nullable(&mut project.started_on, &changes.started_on);
        apply_nullable(&mut project.completed_on, &changes.completed_on);
        apply_nullable(&mut project.kpis, &changes.kpis);
        project.updated_at = Utc::now();

        Ok(project.clone())
    }

    async fn set_cover_image(&self, id: Uuid, url: &str) -> Result<Project, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let project = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
        project.cover_image_url = Some(url.to_string());
        Ok(project.clone())
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Ok(())
    }
}

/// Media store for a fixed set of known projects.
#[derive(Default)]
pub struct InMemoryMedia {
    pub projects: Vec<Uuid>,
    pub rows: Mutex<Vec<Media>>,
}

impl InMemoryMedia {
    pub fn with_project(project_id: Uuid) -> Self {
        InMemoryMedia {
            projects: vec![project_id],
            rows: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MediaRepository for InMemoryMedia {
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Media>, AppError> {
        let mut media: Vec<Media> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        media.sort_by_key(|m| m.sort);
        Ok(media)
    }

    async fn create(&self, media: &MediaInsert) -> Result<Media, AppError> {
        if !self.projects.contains(&media.project_id) {
            return Err(AppError::NotFound("Project not found".into()));
        }

        let mut rows = self.rows.lock().unwrap();
        let current_max = rows
            .iter()
            .filter(|m| m.project_id == media.project_id)
            .map(|m| m.sort)
            .max();

        let row = Media {
            id: Uuid::new_v4(),
            project_id: media.project_id,
            kind: IMAGE_KIND.to_string(),
            url: media.url.clone(),
            caption: Some(media.caption.clone()),
            sort: next_sort(current_max),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update_caption(&self, id: Uuid, caption: &str) -> Result<Media, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let media = rows
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound("Media not found".into()))?;
        media.caption = Some(caption.to_string());
        Ok(media.clone())
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound("Media not found".into()));
        }
        Ok(())
    }
}
