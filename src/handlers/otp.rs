use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::OtpService;

#[utoipa::path(
    post,
    path = "/send-verification-otp",
    tag = "otp",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Verification code issued and mailed", body = MessageResponse),
        (status = 400, description = "Email is missing", body = ErrorResponse),
        (status = 500, description = "Persistence or delivery failure", body = ErrorResponse)
    )
)]
pub async fn send_verification_otp(
    otp_service: web::Data<OtpService>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse> {
    let email = match request
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        Some(email) => email.to_string(),
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "Email is required"
            })));
        }
    };

    match otp_service.issue(&email, request.name.as_deref()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::ok("Verification code sent"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/verify-otp",
    tag = "otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Missing fields or no matching active code", body = ErrorResponse),
        (status = 500, description = "Infrastructure fault", body = ErrorResponse)
    )
)]
pub async fn verify_otp(
    otp_service: web::Data<OtpService>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse> {
    let (email, code) = match (
        request
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty()),
        request.code.as_deref().filter(|c| !c.is_empty()),
    ) {
        (Some(email), Some(code)) => (email.to_string(), code.to_string()),
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "Email and code are required"
            })));
        }
    };

    match otp_service.verify(&email, &code).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::ok("Email verified successfully"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn otp_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/send-verification-otp",
        web::post().to(send_verification_otp),
    )
    .route("/verify-otp", web::post().to(verify_otp));
}
