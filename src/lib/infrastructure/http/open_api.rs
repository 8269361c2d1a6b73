//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::*};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Reminder Mailer"),
    paths(send_email::handler, uptime::handler),
    components(schemas(
        send_email::SendEmailBody,
        send_email::SendEmailResponse,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
