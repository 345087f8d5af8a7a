use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::project::{CoverImageRequest, ProjectPayload},
    errors::AppError,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.project_handler.list_projects().await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "projects": projects })))
}

#[instrument(skip(state))]
pub async fn get_project_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project_by_slug(&slug).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "project": project })))
}

#[instrument(skip(state))]
pub async fn get_project_by_id(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.get_project_by_id(&project_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "project": project })))
}

#[instrument(skip(state, data))]
pub async fn create_project(
    state: web::Data<AppState>,
    data: web::Json<ProjectPayload>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create_project(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({ "ok": true, "project": project })))
}

#[instrument(skip(state, data))]
pub async fn update_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<ProjectPayload>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .update_project(&project_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "project": project })))
}

#[instrument(skip(state))]
pub async fn delete_project(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = state.project_handler.delete_project(&project_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "id": id })))
}

#[instrument(skip(state, data))]
pub async fn set_cover_image(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<CoverImageRequest>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .set_cover(&project_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "project": project })))
}
