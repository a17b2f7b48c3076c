//! Teams incoming webhook delivery.

use async_trait::async_trait;
use tracing::{info, warn};

use loading_monitor_core::{DeliveryChannel, ReportChannel, ReportDeliveryResult};

use crate::http_client;
use crate::payload::MessageCard;

/// Posts the report as a MessageCard to a Teams incoming webhook.
pub struct WebhookChannel {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl WebhookChannel {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            http: http_client(),
            webhook_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait]
impl ReportChannel for WebhookChannel {
    async fn deliver(&self, report: &str, recipient: &str) -> ReportDeliveryResult {
        let Some(url) = self.webhook_url.as_deref() else {
            return ReportDeliveryResult::not_configured(
                DeliveryChannel::Webhook,
                format!(
                    "Teams webhook not configured. Report content:\n\n{report}\n\n\
                     To configure Teams integration, set TEAMS_WEBHOOK_URL in .env \
                     or use Microsoft Graph API."
                ),
            );
        };

        let card = MessageCard::report(report, recipient);
        let resp = match self.http.post(url).json(&card).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Teams webhook request failed");
                return ReportDeliveryResult::transport_error(
                    DeliveryChannel::Webhook,
                    None,
                    format!("Error sending Teams message: {e}\n\nReport content:\n{report}"),
                );
            }
        };

        let status = resp.status().as_u16();
        if status == 200 {
            info!(recipient = %recipient, "Report sent via Teams webhook");
            return ReportDeliveryResult::delivered(
                DeliveryChannel::Webhook,
                status,
                format!("Report successfully sent to {recipient} via Microsoft Teams"),
            );
        }

        let body = resp.text().await.unwrap_or_default();
        warn!(status, "Teams webhook rejected report");
        ReportDeliveryResult::transport_error(
            DeliveryChannel::Webhook,
            Some(status),
            format!("Error sending report: {status} - {body}"),
        )
    }
}
