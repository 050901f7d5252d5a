use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::AppError;
use crate::middlewares::CallerContext;
use crate::models::*;
use crate::services::ComplaintService;

#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    tag = "complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 200, description = "Complaint submitted", body = Complaint),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing caller context", body = ErrorResponse)
    )
)]
pub async fn create_complaint(
    caller: CallerContext,
    complaint_service: web::Data<ComplaintService>,
    request: web::Json<CreateComplaintRequest>,
) -> Result<HttpResponse> {
    match complaint_service
        .create(&caller.email, request.into_inner())
        .await
    {
        Ok(complaint) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": complaint
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    tag = "complaints",
    params(ComplaintQuery),
    responses(
        (status = 200, description = "Complaints visible to the caller", body = [Complaint]),
        (status = 401, description = "Missing caller context", body = ErrorResponse)
    )
)]
pub async fn list_complaints(
    caller: CallerContext,
    complaint_service: web::Data<ComplaintService>,
    query: web::Query<ComplaintQuery>,
) -> Result<HttpResponse> {
    // Admins see everything and may filter; students only ever see their own.
    let result = if caller.is_admin() {
        complaint_service.list_all(&query).await
    } else {
        complaint_service.list_for_student(&caller.email).await
    };

    match result {
        Ok(complaints) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": complaints
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/complaints/{id}",
    tag = "complaints",
    params(("id" = String, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint detail", body = Complaint),
        (status = 403, description = "Caller is not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "No such complaint", body = ErrorResponse)
    )
)]
pub async fn get_complaint(
    caller: CallerContext,
    complaint_service: web::Data<ComplaintService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match complaint_service.get(&path).await {
        Ok(complaint) => {
            if !caller.is_admin() && complaint.student_email != caller.email {
                return Ok(AppError::Forbidden.error_response());
            }
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "data": complaint
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/complaints/{id}/status",
    tag = "complaints",
    params(("id" = String, Path, description = "Complaint id")),
    request_body = UpdateComplaintStatusRequest,
    responses(
        (status = 200, description = "Status updated, student notified", body = Complaint),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "No such complaint", body = ErrorResponse),
        (status = 500, description = "Update committed but notification failed", body = ErrorResponse)
    )
)]
pub async fn update_complaint_status(
    caller: CallerContext,
    complaint_service: web::Data<ComplaintService>,
    path: web::Path<String>,
    request: web::Json<UpdateComplaintStatusRequest>,
) -> Result<HttpResponse> {
    if !caller.is_admin() {
        return Ok(AppError::Forbidden.error_response());
    }

    match complaint_service
        .update_status(&path, request.into_inner())
        .await
    {
        Ok(complaint) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": complaint
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn complaint_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/complaints")
            .route("", web::post().to(create_complaint))
            .route("", web::get().to(list_complaints))
            .route("/{id}", web::get().to(get_complaint))
            .route("/{id}/status", web::put().to(update_complaint_status)),
    );
}
