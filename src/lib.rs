use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

#[cfg(test)]
mod test_support;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{db, storage, utils};

use middlewares::auth::AdminCredentials;
use repositories::{
    media::MediaRepository,
    project::ProjectRepository,
    skill::SkillRepository,
    sqlx_repo::{SqlxMediaRepo, SqlxProjectRepo, SqlxSkillRepo},
};
use storage::{object_storage::ObjectStorage, supabase::SupabaseStorage};
use use_cases::{media::MediaHandler, projects::ProjectHandler, skills::SkillHandler};

pub struct AppState {
    pub project_handler: AppProjectHandler,
    pub media_handler: AppMediaHandler,
    pub skill_handler: AppSkillHandler,
    pub admin: AdminCredentials,
}

pub type AppProjectHandler = ProjectHandler<dyn ProjectRepository>;
pub type AppMediaHandler = MediaHandler<dyn MediaRepository>;
pub type AppSkillHandler = SkillHandler<dyn SkillRepository>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool, http_client: reqwest::Client) -> Self {
        let storage = SupabaseStorage::from_config(config, http_client)
            .map(|storage| Arc::new(storage) as Arc<dyn ObjectStorage>);

        if storage.is_none() {
            tracing::warn!("Supabase storage not configured; sign-upload and cover cleanup are disabled");
        }

        Self::from_parts(
            Arc::new(SqlxProjectRepo::new(pool.clone())),
            Arc::new(SqlxMediaRepo::new(pool.clone())),
            Arc::new(SqlxSkillRepo::new(pool)),
            storage,
            AdminCredentials::from_config(config),
        )
    }

    pub fn from_parts(
        project_repo: Arc<dyn ProjectRepository>,
        media_repo: Arc<dyn MediaRepository>,
        skill_repo: Arc<dyn SkillRepository>,
        storage: Option<Arc<dyn ObjectStorage>>,
        admin: AdminCredentials,
    ) -> Self {
        AppState {
            project_handler: ProjectHandler::new(project_repo, storage.clone()),
            media_handler: MediaHandler::new(media_repo, storage),
            skill_handler: SkillHandler::new(skill_repo),
            admin,
        }
    }
}
