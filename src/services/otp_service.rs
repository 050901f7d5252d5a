use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::external::templates;
use crate::external::EmailSender;
use crate::utils::generate_otp_code;
use chrono::{Duration, Utc};
use std::sync::Arc;

const CODE_TTL_MINUTES: i64 = 10;

#[derive(Clone)]
pub struct OtpService {
    pool: DbPool,
    mailer: Arc<dyn EmailSender>,
}

impl OtpService {
    pub fn new(pool: DbPool, mailer: Arc<dyn EmailSender>) -> Self {
        Self { pool, mailer }
    }

    /// Issues a fresh code for `email` and mails it out.
    ///
    /// The write is a single replace keyed on the email's UNIQUE constraint,
    /// so a reissue atomically supersedes whatever code existed before and
    /// there is never more than one live row per address. Delivery runs
    /// after the commit: a mailer failure leaves the code persisted and
    /// usable, and the caller sees the delivery error.
    pub async fn issue(&self, email: &str, display_name: Option<&str>) -> AppResult<()> {
        let code = generate_otp_code();
        let now = Utc::now();
        let expires_at = now + Duration::minutes(CODE_TTL_MINUTES);

        log::info!("Generating OTP for: {email}");

        sqlx::query(
            r#"
            INSERT INTO verification_codes (email, code, expires_at, verified, created_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            ON CONFLICT(email) DO UPDATE SET
                code = excluded.code,
                expires_at = excluded.expires_at,
                verified = 0,
                created_at = excluded.created_at
            "#,
        )
        .bind(email)
        .bind(&code)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let html = templates::render_otp_email(&code, display_name);
        self.mailer
            .send(email, templates::OTP_SUBJECT, &html)
            .await?;

        Ok(())
    }

    /// Consumes the code and flips the profile's verified flag.
    ///
    /// Wrong, already-consumed and expired codes all come back as the same
    /// `InvalidCode` error. The consume is one conditional update whose
    /// predicate checks the match, the unspent flag and the expiry together,
    /// so of two concurrent submissions only one can win; the loser is told
    /// `InvalidCode` like any other miss.
    pub async fn verify(&self, email: &str, submitted_code: &str) -> AppResult<()> {
        log::info!("Verifying OTP for: {email}");

        let consumed = sqlx::query(
            r#"
            UPDATE verification_codes
            SET verified = 1
            WHERE email = ?1 AND code = ?2 AND verified = 0 AND expires_at > ?3
            "#,
        )
        .bind(email)
        .bind(submitted_code)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if consumed.rows_affected() == 0 {
            return Err(AppError::InvalidCode);
        }

        // The code is consumed at this point, so a failure updating the
        // profile must not fail the request: reporting an error would leave
        // the user with a spent code and no way to retry it.
        let profile_update = sqlx::query("UPDATE profiles SET email_verified = 1 WHERE email = ?1")
            .bind(email)
            .execute(&self.pool)
            .await;

        if let Err(e) = profile_update {
            log::error!("Failed to mark profile verified for {email}: {e}");
        } else {
            log::info!("Email verified successfully for: {email}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::init_db;
    use crate::external::DeliveryReceipt;
    use crate::models::{Profile, Role, VerificationCode};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockMailer {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl EmailSender for MockMailer {
        async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<DeliveryReceipt> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), html.to_string()));
            Ok(DeliveryReceipt {
                id: Some("mock-id".to_string()),
            })
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl EmailSender for FailingMailer {
        async fn send(&self, _to: &str, _subject: &str, _html: &str) -> AppResult<DeliveryReceipt> {
            Err(AppError::DeliveryError("provider rejected".to_string()))
        }
    }

    async fn setup_pool() -> DbPool {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        init_db(&config).await.unwrap()
    }

    async fn insert_profile(pool: &DbPool, email: &str) {
        sqlx::query(
            "INSERT INTO profiles (email, name, role, email_verified, created_at) VALUES (?1, ?2, 'student', 0, ?3)",
        )
        .bind(email)
        .bind("Test Student")
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
    }

    async fn stored_code(pool: &DbPool, email: &str) -> VerificationCode {
        sqlx::query_as::<_, VerificationCode>(
            "SELECT id, email, code, expires_at, verified, created_at FROM verification_codes WHERE email = ?1",
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn code_count(pool: &DbPool, email: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM verification_codes WHERE email = ?1")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_issue_then_verify_full_flow() {
        let pool = setup_pool().await;
        insert_profile(&pool, "a@x.com").await;
        let service = OtpService::new(pool.clone(), Arc::new(MockMailer::default()));

        service.issue("a@x.com", Some("Alex")).await.unwrap();

        let row = stored_code(&pool, "a@x.com").await;
        assert!(!row.verified);
        let ttl = row.expires_at - row.created_at;
        assert_eq!(ttl, Duration::minutes(10));

        service.verify("a@x.com", &row.code).await.unwrap();

        let row = stored_code(&pool, "a@x.com").await;
        assert!(row.verified);

        let profile = sqlx::query_as::<_, Profile>(
            "SELECT id, email, name, role, email_verified, created_at FROM profiles WHERE email = ?1",
        )
        .bind("a@x.com")
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(profile.email_verified);
        assert_eq!(profile.role, Role::Student);
    }

    #[tokio::test]
    async fn test_reissue_keeps_exactly_one_row() {
        let pool = setup_pool().await;
        let service = OtpService::new(pool.clone(), Arc::new(MockMailer::default()));

        service.issue("a@x.com", None).await.unwrap();
        let first = stored_code(&pool, "a@x.com").await.code;

        service.issue("a@x.com", None).await.unwrap();
        assert_eq!(code_count(&pool, "a@x.com").await, 1);

        // The surviving row belongs to the second issue: the first code,
        // even if still remembered by the user, no longer verifies.
        let second = stored_code(&pool, "a@x.com").await.code;
        if first != second {
            assert!(matches!(
                service.verify("a@x.com", &first).await,
                Err(AppError::InvalidCode)
            ));
        }
        service.verify("a@x.com", &second).await.unwrap();
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let pool = setup_pool().await;
        let service = OtpService::new(pool.clone(), Arc::new(MockMailer::default()));

        service.issue("a@x.com", None).await.unwrap();
        let code = stored_code(&pool, "a@x.com").await.code;

        service.verify("a@x.com", &code).await.unwrap();
        assert!(matches!(
            service.verify("a@x.com", &code).await,
            Err(AppError::InvalidCode)
        ));
    }

    #[tokio::test]
    async fn test_wrong_code_is_rejected() {
        let pool = setup_pool().await;
        let service = OtpService::new(pool.clone(), Arc::new(MockMailer::default()));

        service.issue("a@x.com", None).await.unwrap();
        let real = stored_code(&pool, "a@x.com").await.code;
        let wrong = if real == "000000" { "111111" } else { "000000" };

        assert!(matches!(
            service.verify("a@x.com", wrong).await,
            Err(AppError::InvalidCode)
        ));

        // The miss must not consume the real code.
        service.verify("a@x.com", &real).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_code_is_rejected() {
        let pool = setup_pool().await;
        let service = OtpService::new(pool.clone(), Arc::new(MockMailer::default()));

        service.issue("a@x.com", None).await.unwrap();
        let code = stored_code(&pool, "a@x.com").await.code;

        sqlx::query("UPDATE verification_codes SET expires_at = ?1 WHERE email = ?2")
            .bind(Utc::now() - Duration::seconds(1))
            .bind("a@x.com")
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            service.verify("a@x.com", &code).await,
            Err(AppError::InvalidCode)
        ));

        // Expired, but never consumed.
        let row = stored_code(&pool, "a@x.com").await;
        assert!(!row.verified);

        // A reissue supersedes the expired row and verifies normally.
        service.issue("a@x.com", None).await.unwrap();
        let fresh = stored_code(&pool, "a@x.com").await.code;
        service.verify("a@x.com", &fresh).await.unwrap();
    }

    #[tokio::test]
    async fn test_emails_are_isolated() {
        let pool = setup_pool().await;
        let service = OtpService::new(pool.clone(), Arc::new(MockMailer::default()));

        service.issue("a@x.com", None).await.unwrap();
        service.issue("b@x.com", None).await.unwrap();

        let code_b = stored_code(&pool, "b@x.com").await.code;
        let code_a = stored_code(&pool, "a@x.com").await.code;

        if code_a != code_b {
            assert!(matches!(
                service.verify("a@x.com", &code_b).await,
                Err(AppError::InvalidCode)
            ));
        }

        service.verify("a@x.com", &code_a).await.unwrap();

        // b's row is untouched by everything a did.
        let row_b = stored_code(&pool, "b@x.com").await;
        assert!(!row_b.verified);
        service.verify("b@x.com", &row_b.code).await.unwrap();
    }

    #[tokio::test]
    async fn test_delivery_failure_leaves_code_usable() {
        let pool = setup_pool().await;
        let service = OtpService::new(pool.clone(), Arc::new(FailingMailer));

        let result = service.issue("a@x.com", None).await;
        assert!(matches!(result, Err(AppError::DeliveryError(_))));

        // The row was committed before the send, so the code still works.
        assert_eq!(code_count(&pool, "a@x.com").await, 1);
        let code = stored_code(&pool, "a@x.com").await.code;
        service.verify("a@x.com", &code).await.unwrap();
    }

    #[tokio::test]
    async fn test_otp_email_carries_the_stored_code() {
        let pool = setup_pool().await;
        let mailer = Arc::new(MockMailer::default());
        let service = OtpService::new(pool.clone(), mailer.clone());

        service.issue("a@x.com", Some("Alex")).await.unwrap();

        let code = stored_code(&pool, "a@x.com").await.code;
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (to, subject, html) = &sent[0];
        assert_eq!(to, "a@x.com");
        assert_eq!(subject, templates::OTP_SUBJECT);
        assert!(html.contains(&code));
        assert!(html.contains("Hello Alex,"));
    }

    #[tokio::test]
    async fn test_verify_without_profile_still_succeeds() {
        let pool = setup_pool().await;
        let service = OtpService::new(pool.clone(), Arc::new(MockMailer::default()));

        service.issue("ghost@x.com", None).await.unwrap();
        let code = stored_code(&pool, "ghost@x.com").await.code;

        // No profiles row matches; the flag update touches nothing but the
        // verification itself is authoritative.
        service.verify("ghost@x.com", &code).await.unwrap();
        assert!(stored_code(&pool, "ghost@x.com").await.verified);
    }
}
