//! Resend HTTP API mailer

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use crate::domain::communication::mailer::{Mailer, MailerError, Message, SendReceipt};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resend configuration
#[derive(Clone, Debug, Default, Parser)]
pub struct ResendConfig {
    /// The Resend API key
    #[arg(long, env = "RESEND_API_KEY")]
    pub resend_api_key: Option<String>,

    /// The Resend API base URL
    #[arg(long, env = "RESEND_API_URL", default_value = "https://api.resend.com")]
    pub resend_api_url: String,
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Resend mailer
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    sender: String,
}

impl ResendMailer {
    /// Creates a Resend mailer sending as `sender`.
    pub fn new(config: &ResendConfig, sender: &str) -> anyhow::Result<Self> {
        let api_key = config
            .resend_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("RESEND_API_KEY is required when MAIL_TRANSPORT=resend")?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build the Resend HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", config.resend_api_url.trim_end_matches('/')),
            api_key,
            sender: sender.to_string(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_email(&self, message: &Message) -> Result<SendReceipt, MailerError> {
        let request = ResendRequest {
            from: &self.sender,
            to: [message.to.as_str()],
            subject: &message.subject,
            html: &message.html_body,
            text: &message.plain_body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("failed to reach Resend")?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "Resend rejected the email");

            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let receipt = response
            .json::<SendReceipt>()
            .await
            .context("unexpected Resend response")?;

        debug!(id = %receipt.id, "Resend accepted the email");

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use testresult::TestResult;
    use tokio::net::TcpListener;

    use crate::domain::communication::email_address::EmailAddress;

    use super::*;

    async fn stub(router: Router) -> TestResult<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move { axum::serve(listener, router).await });

        Ok(format!("http://{address}"))
    }

    fn mailer(url: String) -> TestResult<ResendMailer> {
        Ok(ResendMailer::new(
            &ResendConfig {
                resend_api_key: Some("re_test".to_string()),
                resend_api_url: url,
            },
            "reminder@carol-levtchenko.com",
        )?)
    }

    fn message() -> TestResult<Message> {
        Ok(Message {
            to: EmailAddress::new("a@b.com")?,
            subject: "Olá".to_string(),
            html_body: "<p>Hi</p>".to_string(),
            plain_body: "Hi".to_string(),
        })
    }

    async fn accept(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .is_some_and(|value| value == "Bearer re_test");

        let expected = json!({
            "from": "reminder@carol-levtchenko.com",
            "to": ["a@b.com"],
            "subject": "Olá",
            "html": "<p>Hi</p>",
            "text": "Hi",
        });

        if authorized && body == expected {
            (StatusCode::OK, Json(json!({ "id": "4ef9a417-02e9-4d39-ad75-9611e0fcc33c" })))
        } else {
            (StatusCode::BAD_REQUEST, Json(json!({ "message": "unexpected request" })))
        }
    }

    #[tokio::test]
    async fn test_send_email() -> TestResult {
        let url = stub(Router::new().route("/emails", post(accept))).await?;

        let receipt = mailer(url)?.send_email(&message()?).await?;

        assert_eq!(receipt.id, "4ef9a417-02e9-4d39-ad75-9611e0fcc33c");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_rejected() -> TestResult {
        let router = Router::new().route(
            "/emails",
            post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "invalid from address") }),
        );

        let url = stub(router).await?;

        let result = mailer(url)?.send_email(&message()?).await;

        match result {
            Err(MailerError::Rejected { status, body }) => {
                assert_eq!(status, 422);
                assert_eq!(body, "invalid from address");
            }
            other => panic!("expected a rejection, got {other:?}"),
        }

        Ok(())
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = ResendConfig {
            resend_api_key: Some("  ".to_string()),
            resend_api_url: "https://api.resend.com".to_string(),
        };

        assert!(ResendMailer::new(&config, "a@b.com").is_err());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() -> TestResult {
        let mailer = mailer("https://api.resend.com/".to_string())?;

        assert_eq!(mailer.endpoint, "https://api.resend.com/emails");

        Ok(())
    }
}
