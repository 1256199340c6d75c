use actix_web::web;

use crate::handlers::guidance;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/guidance")
            .service(
                web::resource("")
                    .route(web::post().to(guidance::request_guidance))
            )
            .service(
                web::resource("/draft")
                    .route(web::post().to(guidance::request_guidance_for_draft))
            )
    );
}
