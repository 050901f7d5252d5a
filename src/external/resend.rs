use crate::config::ResendConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const RESEND_API_BASE: &str = "https://api.resend.com";

/// What the delivery provider acknowledged. Resend returns the message id;
/// the status-update endpoint passes this straight through to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryReceipt {
    pub id: Option<String>,
}

/// Outbound email boundary. Formatting happens in `templates`; implementors
/// only dispatch. Always invoked as the last step of the caller's operation
/// so a failure here can never corrupt persisted state.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<DeliveryReceipt>;
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    config: ResendConfig,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(RESEND_API_BASE);
        format!("{base}/emails")
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<DeliveryReceipt> {
        let body = SendEmailRequest {
            from: &self.config.from_address,
            to: [to],
            subject,
            html,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            let parsed: SendEmailResponse = response.json().await?;
            log::info!("Email sent successfully: {} ({})", to, subject);
            Ok(DeliveryReceipt { id: parsed.id })
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Email failed to send: {}, status {}, error: {}", to, status, error_text);
            Err(AppError::DeliveryError(error_text))
        }
    }
}
