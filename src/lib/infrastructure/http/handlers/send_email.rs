//! Send email handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::{email_address::EmailAddress, mailer::SendReceipt},
        reminders::{
            filled, ConversationSummary, DirectMessage, EmailRequest, Flow, ReminderService,
            RequestError, RequestMode,
        },
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Send email request body
///
/// Carries the fields of both request shapes; `mode` picks one explicitly,
/// otherwise `email_template` or `raw_conversation_text` selects the
/// conversation summary.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SendEmailBody {
    /// The recipient
    #[schema(example = "visitor@example.com")]
    pub to_email: Option<String>,

    /// `direct` or `conversation-summary`
    #[schema(value_type = Option<String>, example = "direct")]
    pub mode: Option<RequestMode>,

    /// Message body of a direct message
    #[schema(example = "Obrigada pela visita!\nAqui está o link.")]
    pub message: Option<String>,

    /// Link of a direct message
    #[schema(example = "carol-levtchenko.com")]
    pub link: Option<String>,

    /// Caption shown with the link
    #[serde(rename = "linkLabel")]
    #[schema(example = "Portfólio")]
    pub link_label: Option<String>,

    /// Visible text of the link
    #[serde(rename = "displayLink")]
    pub display_link: Option<String>,

    /// Signature of a direct message
    #[schema(example = "Carol")]
    pub signature: Option<String>,

    /// HTML template of a conversation summary
    #[schema(example = "<h1>Olá {{user_name}}</h1>{{summary}}{{conversation}}")]
    pub email_template: Option<String>,

    /// Transcript with `User:` / `Assistant:` prefixed turns
    pub raw_conversation_text: Option<String>,

    /// Name of the visitor
    pub user_name: Option<String>,
}

impl SendEmailBody {
    fn mode(&self) -> RequestMode {
        match self.mode {
            Some(mode) => mode,
            None if self.email_template.is_some() || self.raw_conversation_text.is_some() => {
                RequestMode::ConversationSummary
            }
            None => RequestMode::Direct,
        }
    }
}

/// Collects required values, recording the names of the blank ones.
#[derive(Default)]
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    fn take(&mut self, name: &'static str, value: Option<String>) -> String {
        filled(value).unwrap_or_else(|| {
            self.missing.push(name);
            String::new()
        })
    }

    fn check(self) -> Result<(), RequestError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(RequestError::MissingFields(self.missing))
        }
    }
}

impl TryFrom<SendEmailBody> for EmailRequest {
    type Error = RequestError;

    fn try_from(body: SendEmailBody) -> Result<Self, Self::Error> {
        let mut required = Required::default();

        match body.mode() {
            RequestMode::Direct => {
                let to = required.take("to_email", body.to_email);
                let message = required.take("message", body.message);
                let link = required.take("link", body.link);
                let link_label = required.take("linkLabel", body.link_label);
                let signature = required.take("signature", body.signature);

                required.check()?;

                Ok(EmailRequest::Direct(DirectMessage {
                    to: EmailAddress::new(&to)?,
                    message,
                    link,
                    link_label,
                    display_link: filled(body.display_link),
                    signature,
                }))
            }
            RequestMode::ConversationSummary => {
                let to = required.take("to_email", body.to_email);
                let email_template = required.take("email_template", body.email_template);

                required.check()?;

                Ok(EmailRequest::ConversationSummary(ConversationSummary {
                    to: EmailAddress::new(&to)?,
                    email_template,
                    raw_conversation_text: body.raw_conversation_text.unwrap_or_default(),
                    user_name: filled(body.user_name),
                }))
            }
        }
    }
}

/// Send email response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailResponse {
    /// Always `true`
    pub success: bool,

    /// The provider's receipt
    #[schema(value_type = Object, example = json!({"id": "4ef9a417-02e9-4d39-ad75-9611e0fcc33c"}))]
    pub data: SendReceipt,

    /// The flow the request was processed with
    #[schema(value_type = String, example = "ORIGINAL_LINK")]
    pub flow: Flow,
}

/// Format and send an email
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Email",
    path = "/api/send-email",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::OK, description = "Email sent", body = SendEmailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing fields or invalid address", body = ErrorResponse, example = json!({"error": "Campos obrigatórios ausentes"})),
        (status = StatusCode::METHOD_NOT_ALLOWED, description = "Method not allowed", body = ErrorResponse),
        (status = StatusCode::TOO_MANY_REQUESTS, description = "Too many requests"),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "The email could not be sent", body = ErrorResponse, example = json!({"error": "Falha ao enviar o e-mail"})),
    )
)]
pub async fn handler<R: ReminderService>(
    State(state): State<AppState<R>>,
    body: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let Json(body) = body?;

    let request = EmailRequest::try_from(body)?;
    let data = state.reminders.send(&request).await?;

    Ok(Json(SendEmailResponse {
        success: true,
        data,
        flow: request.flow(),
    }))
}

/// Any method other than POST or OPTIONS
pub async fn method_not_allowed() -> ApiError {
    ApiError::new_405()
}
