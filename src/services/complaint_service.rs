use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::external::templates;
use crate::external::EmailSender;
use crate::models::{
    Complaint, ComplaintQuery, ComplaintStatus, CreateComplaintRequest, StatusUpdateEmailRequest,
    UpdateComplaintStatusRequest,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const COMPLAINT_COLUMNS: &str = "id, student_email, title, description, category, status, resolution_note, created_at, updated_at";

#[derive(Clone)]
pub struct ComplaintService {
    pool: DbPool,
    mailer: Arc<dyn EmailSender>,
}

impl ComplaintService {
    pub fn new(pool: DbPool, mailer: Arc<dyn EmailSender>) -> Self {
        Self { pool, mailer }
    }

    pub async fn create(
        &self,
        student_email: &str,
        request: CreateComplaintRequest,
    ) -> AppResult<Complaint> {
        let title = request.title.trim();
        if title.chars().count() < 5 || title.chars().count() > 100 {
            return Err(AppError::ValidationError(
                "Title must be between 5 and 100 characters".to_string(),
            ));
        }

        let description = request.description.trim();
        if description.chars().count() < 20 || description.chars().count() > 1000 {
            return Err(AppError::ValidationError(
                "Description must be between 20 and 1000 characters".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO complaints (id, student_email, title, description, category, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&id)
        .bind(student_email)
        .bind(title)
        .bind(description)
        .bind(request.category)
        .bind(ComplaintStatus::Pending)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        log::info!("Complaint {id} created by {student_email}");

        self.get(&id).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Complaint> {
        let complaint = sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        complaint.ok_or_else(|| AppError::NotFound("Complaint not found".to_string()))
    }

    pub async fn list_for_student(&self, student_email: &str) -> AppResult<Vec<Complaint>> {
        let complaints = sqlx::query_as::<_, Complaint>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE student_email = ?1 ORDER BY created_at DESC"
        ))
        .bind(student_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(complaints)
    }

    pub async fn list_all(&self, query: &ComplaintQuery) -> AppResult<Vec<Complaint>> {
        let mut sql = format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE 1 = 1");
        if query.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        if query.category.is_some() {
            sql.push_str(" AND category = ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Complaint>(&sql);
        if let Some(status) = query.status {
            q = q.bind(status);
        }
        if let Some(category) = query.category {
            q = q.bind(category);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Applies the new status and resolution note, then notifies the student.
    /// Every successful update notifies, including note-only updates where
    /// the status is unchanged. The notification is strictly the last step:
    /// a mailer failure surfaces to the caller, but the complaint has
    /// already been updated and stays that way.
    pub async fn update_status(
        &self,
        id: &str,
        request: UpdateComplaintStatusRequest,
    ) -> AppResult<Complaint> {
        let complaint = self.get(id).await?;
        let old_status = complaint.status;

        sqlx::query(
            "UPDATE complaints SET status = ?1, resolution_note = ?2, updated_at = ?3 WHERE id = ?4",
        )
        .bind(request.status)
        .bind(&request.resolution_note)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        log::info!(
            "Complaint {id} status updated: {old_status} -> {}",
            request.status
        );

        let updated = self.get(id).await?;

        let student_name: Option<String> =
            sqlx::query_scalar("SELECT name FROM profiles WHERE email = ?1")
                .bind(&updated.student_email)
                .fetch_optional(&self.pool)
                .await?
                .flatten();

        let notice = StatusUpdateEmailRequest {
            student_email: updated.student_email.clone(),
            student_name: student_name.unwrap_or_else(|| "Student".to_string()),
            complaint_title: updated.title.clone(),
            old_status,
            new_status: updated.status,
            resolution_note: updated.resolution_note.clone(),
        };

        let subject = templates::status_update_subject(&notice.complaint_title);
        let html = templates::render_status_update_email(&notice);
        self.mailer
            .send(&notice.student_email, &subject, &html)
            .await?;

        Ok(updated)
    }
}
