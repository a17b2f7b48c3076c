//! Report delivery outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal state of a delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The messaging endpoint accepted the report.
    Delivered,
    /// Required webhook URL or credentials are absent.
    NotConfigured,
    /// Non-success status or network failure.
    TransportError,
}

/// Which delivery path produced the result. Displays as its serialized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    Webhook,
    GraphMail,
    None,
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Webhook => f.write_str("webhook"),
            Self::GraphMail => f.write_str("graph_mail"),
            Self::None => f.write_str("none"),
        }
    }
}

/// Result of delivering a report, always returned as a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDeliveryResult {
    pub outcome: DeliveryOutcome,
    pub channel: DeliveryChannel,
    /// HTTP status, when the endpoint answered
    pub status: Option<u16>,
    /// Human-readable description of what happened
    pub detail: String,
}

impl ReportDeliveryResult {
    pub fn delivered(channel: DeliveryChannel, status: u16, detail: impl Into<String>) -> Self {
        Self {
            outcome: DeliveryOutcome::Delivered,
            channel,
            status: Some(status),
            detail: detail.into(),
        }
    }

    pub fn not_configured(channel: DeliveryChannel, detail: impl Into<String>) -> Self {
        Self {
            outcome: DeliveryOutcome::NotConfigured,
            channel,
            status: None,
            detail: detail.into(),
        }
    }

    pub fn transport_error(
        channel: DeliveryChannel,
        status: Option<u16>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            outcome: DeliveryOutcome::TransportError,
            channel,
            status,
            detail: detail.into(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.outcome == DeliveryOutcome::Delivered
    }

    pub fn is_not_configured(&self) -> bool {
        self.outcome == DeliveryOutcome::NotConfigured
    }
}

impl fmt::Display for ReportDeliveryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_constructors() {
        let ok = ReportDeliveryResult::delivered(DeliveryChannel::Webhook, 200, "sent");
        assert!(ok.is_delivered());
        assert_eq!(ok.status, Some(200));

        let missing = ReportDeliveryResult::not_configured(DeliveryChannel::None, "report");
        assert!(missing.is_not_configured());
        assert_eq!(missing.status, None);

        let failed =
            ReportDeliveryResult::transport_error(DeliveryChannel::GraphMail, Some(401), "denied");
        assert_eq!(failed.outcome, DeliveryOutcome::TransportError);
        assert_eq!(failed.to_string(), "denied");
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let result = ReportDeliveryResult::not_configured(DeliveryChannel::GraphMail, "x");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "not_configured");
        assert_eq!(json["channel"], "graph_mail");
    }

    #[test]
    fn test_channel_display_matches_serialized_name() {
        for channel in [
            DeliveryChannel::Webhook,
            DeliveryChannel::GraphMail,
            DeliveryChannel::None,
        ] {
            let json = serde_json::to_value(channel).unwrap();
            assert_eq!(json, channel.to_string());
        }
    }
}
