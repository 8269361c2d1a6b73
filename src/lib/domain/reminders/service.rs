//! Reminder service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    communication::mailer::{Mailer, Message, SendReceipt},
    formatting::{EmailDocument, MessageFormatter},
    summaries::{summary_prompt, Summarizer, SummarizerError},
};

use super::{ConversationSummary, EmailRequest, SendEmailError};

/// Subjects of the outgoing emails
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReminderConfig {
    /// Subject of direct messages
    pub direct_subject: String,

    /// Subject of conversation summaries
    pub summary_subject: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            direct_subject: "Lembrete sobre sua visita ao meu portfólio".to_string(),
            summary_subject: "Resumo da nossa conversa".to_string(),
        }
    }
}

/// Reminder service
#[async_trait]
pub trait ReminderService: Clone + Send + Sync + 'static {
    /// Formats and sends the email described by `request`.
    ///
    /// # Arguments
    /// * `request` - The validated [`EmailRequest`].
    ///
    /// # Returns
    /// - [`Ok`] with the provider's [`SendReceipt`] once the email was accepted.
    /// - [`Err`] containing a [`SendEmailError`] if rendering, summarising or
    ///   delivery failed. Nothing is sent in that case.
    async fn send(&self, request: &EmailRequest) -> Result<SendReceipt, SendEmailError>;
}

#[cfg(test)]
mock! {
    pub ReminderService {}

    impl Clone for ReminderService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl ReminderService for ReminderService {
        async fn send(&self, request: &EmailRequest) -> Result<SendReceipt, SendEmailError>;
    }
}

/// Reminder service implementation
#[derive(Debug, Clone)]
pub struct ReminderServiceImpl<M, S>
where
    M: Mailer,
    S: Summarizer,
{
    mailer: Arc<M>,
    summarizer: Arc<S>,
    formatter: MessageFormatter,
    config: ReminderConfig,
}

impl<M, S> ReminderServiceImpl<M, S>
where
    M: Mailer,
    S: Summarizer,
{
    /// Creates a new reminder service.
    pub fn new(
        mailer: Arc<M>,
        summarizer: Arc<S>,
        formatter: MessageFormatter,
        config: ReminderConfig,
    ) -> Self {
        Self {
            mailer,
            summarizer,
            formatter,
            config,
        }
    }

    async fn summarize(&self, conversation: &ConversationSummary) -> Result<String, SummarizerError> {
        let transcript = self.formatter.plain_transcript(conversation);

        if transcript.is_empty() {
            debug!("empty transcript, skipping summarization");

            return Ok(String::new());
        }

        self.summarizer.summarize(&summary_prompt(&transcript)).await
    }

    async fn document(&self, request: &EmailRequest) -> Result<(&str, EmailDocument), SendEmailError> {
        match request {
            EmailRequest::Direct(direct) => Ok((
                self.config.direct_subject.as_str(),
                self.formatter.assemble_direct(direct)?,
            )),
            EmailRequest::ConversationSummary(conversation) => {
                let summary = self.summarize(conversation).await?;

                Ok((
                    self.config.summary_subject.as_str(),
                    self.formatter
                        .assemble_conversation(conversation, &summary, Utc::now()),
                ))
            }
        }
    }
}

#[async_trait]
impl<M, S> ReminderService for ReminderServiceImpl<M, S>
where
    M: Mailer,
    S: Summarizer,
{
    async fn send(&self, request: &EmailRequest) -> Result<SendReceipt, SendEmailError> {
        let (subject, document) = self.document(request).await?;

        let message = Message {
            to: request.recipient().clone(),
            subject: subject.to_string(),
            html_body: document.html,
            plain_body: document.plain,
        };

        let receipt = self.mailer.send_email(&message).await?;

        info!(id = %receipt.id, flow = ?request.flow(), "email sent");

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::{
        communication::{
            email_address::EmailAddress,
            mailer::{MailerError, MockMailer},
        },
        reminders::DirectMessage,
        summaries::MockSummarizer,
    };

    use super::*;

    fn service(mailer: MockMailer, summarizer: MockSummarizer) -> ReminderServiceImpl<MockMailer, MockSummarizer> {
        ReminderServiceImpl::new(
            Arc::new(mailer),
            Arc::new(summarizer),
            MessageFormatter::default(),
            ReminderConfig::default(),
        )
    }

    fn direct_request() -> TestResult<EmailRequest> {
        Ok(EmailRequest::Direct(DirectMessage {
            to: EmailAddress::new("a@b.com")?,
            message: "Hi\nthere".to_string(),
            link: "example.com".to_string(),
            link_label: "CV".to_string(),
            display_link: None,
            signature: "Carol".to_string(),
        }))
    }

    fn conversation_request(transcript: &str) -> TestResult<EmailRequest> {
        Ok(EmailRequest::ConversationSummary(ConversationSummary {
            to: EmailAddress::new("a@b.com")?,
            email_template: "<div>{{summary}}</div><div>{{conversation}}</div>".to_string(),
            raw_conversation_text: transcript.to_string(),
            user_name: Some("Ana".to_string()),
        }))
    }

    fn receipt() -> SendReceipt {
        SendReceipt {
            id: "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_direct_message() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(|message| {
                message.to.as_str() == "a@b.com"
                    && message.subject == "Lembrete sobre sua visita ao meu portfólio"
                    && message.html_body.contains(r#"href="https://example.com""#)
                    && message.plain_body.contains("CV: https://example.com")
            })
            .returning(|_| Ok(receipt()));

        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().times(0);

        let result = service(mailer, summarizer).send(&direct_request()?).await?;

        assert_eq!(result, receipt());

        Ok(())
    }

    #[tokio::test]
    async fn test_send_conversation_summary() -> TestResult {
        let mut summarizer = MockSummarizer::new();

        summarizer
            .expect_summarize()
            .times(1)
            .withf(|prompt| prompt.ends_with("Ana: Oi!\n\nAssistente: Olá, Ana."))
            .returning(|_| Ok("Conversa sobre o portfólio.".to_string()));

        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(|message| {
                message.subject == "Resumo da nossa conversa"
                    && message.html_body.contains("Conversa sobre o portfólio.")
                    && message.html_body.contains(r#"class="turn turn-user""#)
            })
            .returning(|_| Ok(receipt()));

        service(mailer, summarizer)
            .send(&conversation_request("User: Oi!\nAssistant: Olá, Ana.")?)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_send_conversation_without_transcript_skips_summary() -> TestResult {
        let mut summarizer = MockSummarizer::new();
        summarizer.expect_summarize().times(0);

        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(|message| message.html_body == "<div></div><div></div>")
            .returning(|_| Ok(receipt()));

        service(mailer, summarizer)
            .send(&conversation_request("   ")?)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_summary_failure_discards_email() -> TestResult {
        let mut summarizer = MockSummarizer::new();

        summarizer
            .expect_summarize()
            .times(1)
            .returning(|_| Err(SummarizerError::EmptyResponse));

        let mut mailer = MockMailer::new();
        mailer.expect_send_email().times(0);

        let result = service(mailer, summarizer)
            .send(&conversation_request("User: Oi!")?)
            .await;

        assert!(matches!(result, Err(SendEmailError::Summary(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_delivery_failure() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer.expect_send_email().times(1).returning(|_| {
            Err(MailerError::Rejected {
                status: 422,
                body: "invalid from".to_string(),
            })
        });

        let result = service(mailer, MockSummarizer::new())
            .send(&direct_request()?)
            .await;

        assert!(matches!(result, Err(SendEmailError::Delivery(_))));

        Ok(())
    }
}
