use actix_web::{
    guard::{self, GuardContext},
    http::header::ContentType,
    web,
};

use crate::handlers::reports;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .service(
                web::resource("")
                    .route(web::post().guard(guard::fn_guard(is_json)).to(reports::submit_report_json))
                    .route(web::post().guard(guard::fn_guard(is_multipart)).to(reports::submit_report_form))
                    .route(web::post().to(reports::unsupported_report_payload))
            )
            .service(
                web::resource("/test")
                    .route(web::post().to(reports::submit_test_report))
            )
    );
}

fn essence(ctx: &GuardContext<'_>) -> Option<String> {
    ctx.header::<ContentType>()
        .map(|ct| ct.0.essence_str().to_ascii_lowercase())
}

fn is_json(ctx: &GuardContext<'_>) -> bool {
    essence(ctx).is_some_and(|e| e == "application/json" || e.ends_with("+json"))
}

fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    essence(ctx).is_some_and(|e| e == "multipart/form-data")
}
