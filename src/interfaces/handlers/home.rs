use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "SafeLink missing person reporting API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "submit_report": "POST /api/v1/reports",
            "test_report": "POST /api/v1/reports/test",
            "guidance": "POST /api/v1/guidance",
            "guidance_from_draft": "POST /api/v1/guidance/draft",
            "health": "GET /health"
        }
    }))
}
