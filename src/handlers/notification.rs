use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::external::{DeliveryReceipt, EmailSender, templates};
use crate::models::*;

#[utoipa::path(
    post,
    path = "/send-status-update-email",
    tag = "notifications",
    request_body = StatusUpdateEmailRequest,
    responses(
        (status = 200, description = "Delivery receipt from the provider", body = DeliveryReceipt),
        (status = 500, description = "Delivery failure", body = ErrorResponse)
    )
)]
pub async fn send_status_update_email(
    mailer: web::Data<dyn EmailSender>,
    request: web::Json<StatusUpdateEmailRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    log::info!("Sending status update email to: {}", request.student_email);

    let subject = templates::status_update_subject(&request.complaint_title);
    let html = templates::render_status_update_email(&request);

    match mailer.send(&request.student_email, &subject, &html).await {
        Ok(receipt) => Ok(HttpResponse::Ok().json(receipt)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/send-status-update-email",
        web::post().to(send_status_update_email),
    );
}
