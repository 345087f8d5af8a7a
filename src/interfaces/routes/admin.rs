use actix_web::web;

use crate::{
    handlers::{media, projects, skills},
    middlewares::auth::AuthMiddleware,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware)
            .service(
                web::resource("/projects")
                    .route(web::get().to(projects::list_projects))
                    .route(web::post().to(projects::create_project))
            )
            .service(
                web::resource("/projects/{project_id}")
                    .route(web::get().to(projects::get_project_by_id))
                    .route(web::put().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project))
            )
            .service(
                web::resource("/projects/{project_id}/cover")
                    .route(web::put().to(projects::set_cover_image))
            )
            .service(
                web::resource("/projects/{project_id}/media")
                    .route(web::get().to(media::list_media))
                    .route(web::post().to(media::create_media))
            )
            .service(
                web::resource("/projects/{project_id}/skills/{skill_id}")
                    .route(web::put().to(skills::attach_skill))
                    .route(web::delete().to(skills::detach_skill))
            )
            .service(
                web::resource("/media/sign-upload")
                    .route(web::post().to(media::sign_upload))
            )
            .service(
                web::resource("/media/{media_id}")
                    .route(web::put().to(media::update_media))
                    .route(web::delete().to(media::delete_media))
            )
            .service(
                web::resource("/skills")
                    .route(web::post().to(skills::create_skill))
            )
            .service(
                web::resource("/skills/{skill_id}")
                    .route(web::delete().to(skills::delete_skill))
            )
    );
}
