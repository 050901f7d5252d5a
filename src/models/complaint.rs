use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    Pending,
    Processing,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    /// Badge color used in the status-change email, one fixed color per status.
    pub fn color(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "#EAB308",
            ComplaintStatus::Processing => "#3B82F6",
            ComplaintStatus::Resolved => "#10B981",
            ComplaintStatus::Closed => "#6B7280",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplaintStatus::Pending => write!(f, "pending"),
            ComplaintStatus::Processing => write!(f, "processing"),
            ComplaintStatus::Resolved => write!(f, "resolved"),
            ComplaintStatus::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
pub enum ComplaintCategory {
    Technical,
    #[serde(rename = "Staff-Related")]
    #[sqlx(rename = "Staff-Related")]
    StaffRelated,
    Hostel,
    Fees,
    #[serde(rename = "Course Content")]
    #[sqlx(rename = "Course Content")]
    CourseContent,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Complaint {
    pub id: String,
    pub student_email: String,
    pub title: String,
    pub description: String,
    pub category: ComplaintCategory,
    pub status: ComplaintStatus,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateComplaintRequest {
    #[schema(example = "Broken projector in room 204")]
    pub title: String,
    #[schema(example = "The projector has been flickering for two weeks and lectures are unreadable.")]
    pub description: String,
    pub category: ComplaintCategory,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateComplaintStatusRequest {
    pub status: ComplaintStatus,
    #[schema(example = "Projector replaced on 2025-03-02.")]
    pub resolution_note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, IntoParams)]
pub struct ComplaintQuery {
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateEmailRequest {
    pub student_email: String,
    pub student_name: String,
    pub complaint_title: String,
    pub old_status: ComplaintStatus,
    pub new_status: ComplaintStatus,
    pub resolution_note: Option<String>,
}
