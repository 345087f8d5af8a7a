use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;

use crate::{entities::skill::NewSkillRequest, errors::AppError, AppState};

#[instrument(skip(state))]
pub async fn list_skills(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let skills = state.skill_handler.list_skills().await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "skills": skills })))
}

#[instrument(skip(state))]
pub async fn list_project_skills(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let skills = state.skill_handler.list_project_skills(&project_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "skills": skills })))
}

#[instrument(skip(state, data))]
pub async fn create_skill(
    state: web::Data<AppState>,
    data: web::Json<NewSkillRequest>,
) -> Result<impl Responder, AppError> {
    let skill = state.skill_handler.create_skill(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "ok": true, "skill": skill })))
}

#[instrument(skip(state))]
pub async fn delete_skill(
    skill_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.skill_handler.delete_skill(&skill_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[instrument(skip(state))]
pub async fn attach_skill(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (project_id, skill_id) = path.into_inner();
    state.skill_handler.attach_skill(&project_id, &skill_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[instrument(skip(state))]
pub async fn detach_skill(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (project_id, skill_id) = path.into_inner();
    state.skill_handler.detach_skill(&project_id, &skill_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
