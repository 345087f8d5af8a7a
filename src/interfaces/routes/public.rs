use actix_web::web;

use crate::handlers::{media, projects, skills};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::get().to(projects::list_projects))
            )
            .service(
                web::resource("/{slug}")
                    .route(web::get().to(projects::get_project_by_slug))
            )
            .service(
                web::resource("/{project_id}/media")
                    .route(web::get().to(media::list_media))
            )
            .service(
                web::resource("/{project_id}/skills")
                    .route(web::get().to(skills::list_project_skills))
            )
    );

    cfg.service(
        web::resource("/skills")
            .route(web::get().to(skills::list_skills))
    );
}
