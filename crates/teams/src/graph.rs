//! Microsoft Graph send-mail delivery.

use async_trait::async_trait;
use tracing::{info, warn};

use loading_monitor_core::{DeliveryChannel, ReportChannel, ReportDeliveryResult};

use crate::http_client;
use crate::payload::SendMailRequest;

/// Microsoft Graph v1.0 endpoint.
pub const GRAPH_API_URL: &str = "https://graph.microsoft.com/v1.0";

/// Sends the report as mail from a fixed sender mailbox.
pub struct GraphMailChannel {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    sender_email: Option<String>,
}

impl GraphMailChannel {
    pub fn new(token: Option<String>, sender_email: Option<String>) -> Self {
        Self {
            http: http_client(),
            base_url: GRAPH_API_URL.to_string(),
            token,
            sender_email,
        }
    }

    /// Point the channel at another Graph endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.sender_email.is_some()
    }
}

#[async_trait]
impl ReportChannel for GraphMailChannel {
    async fn deliver(&self, report: &str, recipient: &str) -> ReportDeliveryResult {
        let (Some(token), Some(sender)) = (self.token.as_deref(), self.sender_email.as_deref())
        else {
            return ReportDeliveryResult::not_configured(
                DeliveryChannel::GraphMail,
                format!(
                    "Microsoft Graph API not configured. Set MICROSOFT_GRAPH_API_TOKEN and \
                     MICROSOFT_GRAPH_SENDER_EMAIL in .env. Report content:\n\n{report}"
                ),
            );
        };

        let url = format!(
            "{}/users/{}/sendMail",
            self.base_url,
            urlencoding::encode(sender)
        );
        let request = SendMailRequest::report(report, recipient);

        let resp = match self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Graph send-mail request failed");
                return ReportDeliveryResult::transport_error(
                    DeliveryChannel::GraphMail,
                    None,
                    format!("Error with Graph API: {e}\n\nReport content:\n{report}"),
                );
            }
        };

        let status = resp.status().as_u16();
        if matches!(status, 200 | 202) {
            info!(recipient = %recipient, sender = %sender, "Report sent via Graph mail");
            return ReportDeliveryResult::delivered(
                DeliveryChannel::GraphMail,
                status,
                format!("Report successfully sent to {recipient} via Microsoft Graph API"),
            );
        }

        let body = resp.text().await.unwrap_or_default();
        warn!(status, "Graph send-mail rejected report");
        ReportDeliveryResult::transport_error(
            DeliveryChannel::GraphMail,
            Some(status),
            format!("Error sending via Graph API: {status} - {body}"),
        )
    }
}
