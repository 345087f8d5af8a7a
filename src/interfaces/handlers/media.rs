use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::instrument;

use crate::{
    entities::media::{NewMediaRequest, SignUploadRequest, UpdateMediaRequest},
    errors::AppError,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_media(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let media = state.media_handler.list_media(&project_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "media": media })))
}

#[instrument(skip(state, data))]
pub async fn create_media(
    project_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<NewMediaRequest>,
) -> Result<impl Responder, AppError> {
    let media = state
        .media_handler
        .create_media(&project_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(json!({ "ok": true, "media": media })))
}

#[instrument(skip(state, data))]
pub async fn update_media(
    media_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<UpdateMediaRequest>,
) -> Result<impl Responder, AppError> {
    let media = state
        .media_handler
        .update_caption(&media_id, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true, "media": media })))
}

#[instrument(skip(state))]
pub async fn delete_media(
    media_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.media_handler.delete_media(&media_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[instrument(skip(state, data))]
pub async fn sign_upload(
    state: web::Data<AppState>,
    data: web::Json<SignUploadRequest>,
) -> Result<impl Responder, AppError> {
    let signed = state.media_handler.sign_upload(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "path": signed.path,
        "token": signed.token,
        "signedUrl": signed.signed_url,
        "publicUrl": signed.public_url,
    })))
}
