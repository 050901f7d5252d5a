use crate::error::AppError;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{Ready, ready};

/// Who is calling, as asserted by the authenticating gateway in front of
/// this service. Handlers take this as an explicit input instead of reading
/// any ambient session state; the gateway is trusted to have validated the
/// session before setting the headers.
#[derive(Debug, Clone, PartialEq)]
pub struct CallerContext {
    pub email: String,
    pub name: Option<String>,
    pub role: CallerRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    Student,
    Admin,
}

impl CallerContext {
    pub fn is_admin(&self) -> bool {
        self.role == CallerRole::Admin
    }
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl FromRequest for CallerContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let email = match header_value(req, "X-Caller-Email") {
            Some(email) => email,
            None => {
                return ready(Err(AppError::AuthError(
                    "Missing caller identity".to_string(),
                )));
            }
        };

        let role = match header_value(req, "X-Caller-Role").as_deref() {
            Some("student") | None => CallerRole::Student,
            Some("admin") => CallerRole::Admin,
            Some(other) => {
                return ready(Err(AppError::AuthError(format!(
                    "Unknown caller role: {other}"
                ))));
            }
        };

        ready(Ok(CallerContext {
            email,
            name: header_value(req, "X-Caller-Name"),
            role,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_full_context() {
        let req = TestRequest::default()
            .insert_header(("X-Caller-Email", "admin@university.edu"))
            .insert_header(("X-Caller-Name", "Dean Smith"))
            .insert_header(("X-Caller-Role", "admin"))
            .to_http_request();

        let caller = CallerContext::extract(&req).await.unwrap();
        assert_eq!(caller.email, "admin@university.edu");
        assert_eq!(caller.name.as_deref(), Some("Dean Smith"));
        assert!(caller.is_admin());
    }

    #[actix_web::test]
    async fn test_role_defaults_to_student() {
        let req = TestRequest::default()
            .insert_header(("X-Caller-Email", "student@university.edu"))
            .to_http_request();

        let caller = CallerContext::extract(&req).await.unwrap();
        assert_eq!(caller.role, CallerRole::Student);
        assert!(caller.name.is_none());
    }

    #[actix_web::test]
    async fn test_missing_identity_is_rejected() {
        let req = TestRequest::default().to_http_request();
        assert!(CallerContext::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_unknown_role_is_rejected() {
        let req = TestRequest::default()
            .insert_header(("X-Caller-Email", "student@university.edu"))
            .insert_header(("X-Caller-Role", "superuser"))
            .to_http_request();

        assert!(CallerContext::extract(&req).await.is_err());
    }
}
