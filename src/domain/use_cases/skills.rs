use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::skill::{NewSkillRequest, Skill},
    errors::AppError,
    repositories::skill::SkillRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct SkillHandler<R>
where
    R: SkillRepository + ?Sized,
{
    pub skill_repo: Arc<R>,
}

impl<R> SkillHandler<R>
where
    R: SkillRepository + ?Sized,
{
    pub fn new(skill_repo: Arc<R>) -> Self {
        SkillHandler { skill_repo }
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, AppError> {
        self.skill_repo.list().await
    }

    /// Creates a skill after trimming and validating its name and category
    pub async fn create_skill(&self, request: NewSkillRequest) -> Result<Skill, AppError> {
        let request = request.normalized();
        request.validate()?;

        self.skill_repo.create(&request).await
    }

    pub async fn delete_skill(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id, "Skill not found")?;
        self.skill_repo.remove(valid_id).await
    }

    pub async fn list_project_skills(&self, project_id: &str) -> Result<Vec<Skill>, AppError> {
        let valid_id = valid_uuid(project_id, "Project not found")?;
        self.skill_repo.list_for_project(valid_id).await
    }

    /// Links a skill to a project; linking an already linked pair succeeds
    pub async fn attach_skill(&self, project_id: &str, skill_id: &str) -> Result<(), AppError> {
        let (project_id, skill_id) = parse_pair(project_id, skill_id)?;
        self.skill_repo.attach(project_id, skill_id).await
    }

    pub async fn detach_skill(&self, project_id: &str, skill_id: &str) -> Result<(), AppError> {
        let (project_id, skill_id) = parse_pair(project_id, skill_id)?;
        self.skill_repo.detach(project_id, skill_id).await
    }
}

fn parse_pair(project_id: &str, skill_id: &str) -> Result<(Uuid, Uuid), AppError> {
    Ok((
        valid_uuid(project_id, "Project not found")?,
        valid_uuid(skill_id, "Skill not found")?,
    ))
}
