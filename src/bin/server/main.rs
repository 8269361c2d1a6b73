#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Email relay server

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use reminder_mailer::{
    domain::{
        formatting::{FormatterConfig, MessageFormatter},
        reminders::{ReminderConfig, ReminderServiceImpl},
    },
    infrastructure::{
        email::{DeliveryBackend, MailConfig},
        http::{HttpServer, HttpServerConfig},
        llm::openai::{LlmConfig, OpenAiSummarizer},
    },
};
use tracing::debug;

/// Subjects and display names of the outgoing emails
#[derive(Debug, Parser)]
pub struct ContentConfig {
    /// Subject of direct messages
    #[arg(
        long,
        env = "MAIL_SUBJECT",
        default_value = "Lembrete sobre sua visita ao meu portfólio"
    )]
    pub mail_subject: String,

    /// Subject of conversation summaries
    #[arg(long, env = "SUMMARY_SUBJECT", default_value = "Resumo da nossa conversa")]
    pub summary_subject: String,

    /// Name shown on assistant turns
    #[arg(long, env = "ASSISTANT_NAME", default_value = "Assistente")]
    pub assistant_name: String,

    /// Name shown on user turns when the request has none
    #[arg(long, env = "DEFAULT_USER_NAME", default_value = "Você")]
    pub default_user_name: String,
}

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// Mail delivery
    #[clap(flatten)]
    pub mail: MailConfig,

    /// Conversation summaries
    #[clap(flatten)]
    pub llm: LlmConfig,

    /// Email content
    #[clap(flatten)]
    pub content: ContentConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    let env = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    if let Err(e) = env {
        debug!("no .env file loaded: {e}");
    }

    let args = Args::parse();

    let mailer = DeliveryBackend::from_config(&args.mail)?;
    let summarizer = OpenAiSummarizer::new(&args.llm)?;

    let formatter = MessageFormatter::new(FormatterConfig {
        assistant_name: args.content.assistant_name,
        default_user_name: args.content.default_user_name,
    });

    let reminders = ReminderServiceImpl::new(
        Arc::new(mailer),
        Arc::new(summarizer),
        formatter,
        ReminderConfig {
            direct_subject: args.content.mail_subject,
            summary_subject: args.content.summary_subject,
        },
    );

    HttpServer::new(reminders, args.server).await?.run().await
}
