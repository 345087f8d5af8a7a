use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod admin;
mod public;
mod json_error;

pub use json_error::{json_config, JsonError};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.configure(public::config_routes);
    cfg.configure(admin::config_routes);
}
