use actix_web::{HttpResponse, Result, web};
use serde_json::json;

pub async fn healthz() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

pub fn health_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(healthz));
}
