use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::external::DeliveryReceipt;
use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::otp::send_verification_otp,
        handlers::otp::verify_otp,
        handlers::notification::send_status_update_email,
        handlers::complaint::create_complaint,
        handlers::complaint::list_complaints,
        handlers::complaint::get_complaint,
        handlers::complaint::update_complaint_status,
    ),
    components(
        schemas(
            SendOtpRequest,
            VerifyOtpRequest,
            MessageResponse,
            ErrorResponse,
            StatusUpdateEmailRequest,
            DeliveryReceipt,
            Complaint,
            ComplaintStatus,
            ComplaintCategory,
            CreateComplaintRequest,
            UpdateComplaintStatusRequest,
        )
    ),
    tags(
        (name = "otp", description = "Email verification via one-time passcode"),
        (name = "notifications", description = "Transactional email dispatch"),
        (name = "complaints", description = "Complaint submission and triage")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
