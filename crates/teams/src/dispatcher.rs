//! Channel selection between webhook and Graph mail.

use async_trait::async_trait;
use tracing::debug;

use loading_monitor_core::{DeliveryChannel, ReportChannel, ReportDeliveryResult, TeamsConfig};

use crate::graph::GraphMailChannel;
use crate::webhook::WebhookChannel;

/// Delivers through the webhook when configured, otherwise through Graph mail.
pub struct TeamsDispatcher {
    webhook: WebhookChannel,
    graph: GraphMailChannel,
}

impl TeamsDispatcher {
    pub fn new(webhook: WebhookChannel, graph: GraphMailChannel) -> Self {
        Self { webhook, graph }
    }

    pub fn from_config(config: &TeamsConfig) -> Self {
        Self::new(
            WebhookChannel::new(config.webhook_url.clone()),
            GraphMailChannel::new(config.graph_token.clone(), config.sender_email.clone()),
        )
    }
}

#[async_trait]
impl ReportChannel for TeamsDispatcher {
    async fn deliver(&self, report: &str, recipient: &str) -> ReportDeliveryResult {
        if self.webhook.is_configured() {
            debug!("Delivering report via Teams webhook");
            return self.webhook.deliver(report, recipient).await;
        }
        if self.graph.is_configured() {
            debug!("Teams webhook not configured, delivering via Graph mail");
            return self.graph.deliver(report, recipient).await;
        }

        ReportDeliveryResult::not_configured(
            DeliveryChannel::None,
            format!(
                "Teams webhook not configured. Report content:\n\n{report}\n\n\
                 To configure Teams integration, set TEAMS_WEBHOOK_URL in .env, or set \
                 MICROSOFT_GRAPH_API_TOKEN and MICROSOFT_GRAPH_SENDER_EMAIL to use \
                 Microsoft Graph API."
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use loading_monitor_core::DeliveryOutcome;

    #[tokio::test]
    async fn test_nothing_configured_embeds_report() {
        let report = "# Sprint 12\n\n| Member | Points |\n|---|---|\n| Sam | 5 |\n";
        let dispatcher = TeamsDispatcher::from_config(&TeamsConfig::default());

        let result = dispatcher.deliver(report, "lead@example.com").await;

        assert_eq!(result.outcome, DeliveryOutcome::NotConfigured);
        assert_eq!(result.channel, DeliveryChannel::None);
        assert!(result.detail.contains(report));
    }

    #[tokio::test]
    async fn test_partial_graph_config_is_not_configured() {
        let config = TeamsConfig {
            webhook_url: None,
            graph_token: Some("token".into()),
            sender_email: None,
        };
        let dispatcher = TeamsDispatcher::from_config(&config);

        let result = dispatcher.deliver("report body", "lead@example.com").await;
        assert!(result.is_not_configured());
        assert!(result.detail.contains("report body"));
    }
}
