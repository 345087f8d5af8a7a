use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::skill::{NewSkillRequest, Skill},
    errors::{is_foreign_key_violation, is_unique_violation, AppError},
    repositories::sqlx_repo::SqlxSkillRepo,
};

const SKILL_NAME_KEY: &str = "skills_name_key";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Skill>, AppError>;
    async fn create(&self, skill: &NewSkillRequest) -> Result<Skill, AppError>;
    async fn remove(&self, id: Uuid) -> Result<(), AppError>;
    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Skill>, AppError>;

    /// Links a skill to a project. Linking twice is a no-op.
    async fn attach(&self, project_id: Uuid, skill_id: Uuid) -> Result<(), AppError>;
    async fn detach(&self, project_id: Uuid, skill_id: Uuid) -> Result<(), AppError>;
}

impl SqlxSkillRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn list(&self) -> Result<Vec<Skill>, AppError> {
        let skills = sqlx::query_as::<_, Skill>("SELECT * FROM skills ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(skills)
    }

    async fn create(&self, skill: &NewSkillRequest) -> Result<Skill, AppError> {
        sqlx::query_as::<_, Skill>(
            "INSERT INTO skills (name, category) VALUES ($1, $2) RETURNING *",
        )
        .bind(&skill.name)
        .bind(&skill.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, SKILL_NAME_KEY) {
                return AppError::Conflict("Skill already exists".into());
            }
            AppError::from(e)
        })
    }

    async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Skill not found".into()));
        }

        Ok(())
    }

    async fn list_for_project(&self, project_id: Uuid) -> Result<Vec<Skill>, AppError> {
        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT s.id, s.name, s.category
            FROM skills s
            JOIN project_skills ps ON ps.skill_id = s.id
            WHERE ps.project_id = $1
            ORDER BY s.name ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }

    async fn attach(&self, project_id: Uuid, skill_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO project_skills (project_id, skill_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, skill_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(skill_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::NotFound("Project or skill not found".into());
            }
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn detach(&self, project_id: Uuid, skill_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM project_skills WHERE project_id = $1 AND skill_id = $2",
        )
        .bind(project_id)
        .bind(skill_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Skill is not linked to this project".into()));
        }

        Ok(())
    }
}
