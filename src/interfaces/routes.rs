use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod guidance;
mod payload_errors;
mod reports;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(payload_errors::config_routes);

    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(reports::config_routes)
            .configure(guidance::config_routes)
    );
}
