//! Report delivery to Microsoft Teams.
//!
//! Two paths are supported: a Teams incoming webhook receiving a MessageCard,
//! and the Microsoft Graph send-mail API. [`TeamsDispatcher`] picks whichever
//! is configured, preferring the webhook.

pub mod dispatcher;
pub mod graph;
pub mod payload;
pub mod webhook;

use std::time::Duration;

pub use dispatcher::TeamsDispatcher;
pub use graph::{GRAPH_API_URL, GraphMailChannel};
pub use payload::{MessageCard, SendMailRequest};
pub use webhook::WebhookChannel;

/// Title used for both the card and the mail subject.
pub const REPORT_TITLE: &str = "Jira Sprint Loading Progress Report";

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_default()
}
