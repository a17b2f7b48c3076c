//! Integration tests for report delivery using a wiremock server

use loading_monitor_core::{DeliveryChannel, DeliveryOutcome, ReportChannel};
use loading_monitor_teams::{GraphMailChannel, TeamsDispatcher, WebhookChannel};

use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, path_regex},
};

const REPORT: &str = "## Sprint 12\n\n| Member | Points |\n|---|---|\n| Sam | 5 |";

#[tokio::test]
async fn test_webhook_200_is_delivered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_partial_json(serde_json::json!({
            "@type": "MessageCard",
            "title": "Jira Sprint Loading Progress Report",
            "sections": [{"activityTitle": "Report sent to: lead@example.com", "text": REPORT}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("1"))
        .expect(1)
        .mount(&server)
        .await;

    let channel = WebhookChannel::new(Some(format!("{}/webhook", server.uri())));
    let result = channel.deliver(REPORT, "lead@example.com").await;

    assert!(result.is_delivered());
    assert_eq!(result.channel, DeliveryChannel::Webhook);
    assert_eq!(result.status, Some(200));
    assert!(result.detail.contains("lead@example.com"));
}

#[tokio::test]
async fn test_webhook_500_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("connector unavailable"))
        .mount(&server)
        .await;

    let channel = WebhookChannel::new(Some(format!("{}/webhook", server.uri())));
    let result = channel.deliver(REPORT, "lead@example.com").await;

    assert_eq!(result.outcome, DeliveryOutcome::TransportError);
    assert_eq!(result.status, Some(500));
    assert!(result.detail.contains("500"));
    assert!(result.detail.contains("connector unavailable"));
}

#[tokio::test]
async fn test_webhook_202_is_not_delivered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let channel = WebhookChannel::new(Some(server.uri()));
    let result = channel.deliver(REPORT, "lead@example.com").await;

    assert_eq!(result.outcome, DeliveryOutcome::TransportError);
    assert_eq!(result.status, Some(202));
}

#[tokio::test]
async fn test_webhook_unreachable_keeps_report() {
    let server = MockServer::start().await;
    let url = format!("{}/webhook", server.uri());
    drop(server);

    let channel = WebhookChannel::new(Some(url));
    let result = channel.deliver(REPORT, "lead@example.com").await;

    assert_eq!(result.outcome, DeliveryOutcome::TransportError);
    assert_eq!(result.status, None);
    assert!(result.detail.contains(REPORT));
}

#[tokio::test]
async fn test_webhook_not_configured_embeds_report() {
    let channel = WebhookChannel::new(None);
    let result = channel.deliver(REPORT, "lead@example.com").await;

    assert!(result.is_not_configured());
    assert!(result.detail.contains(REPORT));
}

#[tokio::test]
async fn test_graph_202_is_delivered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/users/.+/sendMail$"))
        .and(header("authorization", "Bearer graph-token"))
        .and(body_partial_json(serde_json::json!({
            "message": {
                "subject": "Jira Sprint Loading Progress Report",
                "body": {"contentType": "Text", "content": REPORT},
                "toRecipients": [{"emailAddress": {"address": "lead@example.com"}}]
            }
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let channel = GraphMailChannel::new(
        Some("graph-token".into()),
        Some("reports@example.com".into()),
    )
    .with_base_url(server.uri());
    let result = channel.deliver(REPORT, "lead@example.com").await;

    assert!(result.is_delivered());
    assert_eq!(result.channel, DeliveryChannel::GraphMail);
    assert_eq!(result.status, Some(202));
}

#[tokio::test]
async fn test_graph_401_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/users/.+/sendMail$"))
        .respond_with(ResponseTemplate::new(401).set_body_string("InvalidAuthenticationToken"))
        .mount(&server)
        .await;

    let channel = GraphMailChannel::new(Some("expired".into()), Some("reports@example.com".into()))
        .with_base_url(server.uri());
    let result = channel.deliver(REPORT, "lead@example.com").await;

    assert_eq!(result.outcome, DeliveryOutcome::TransportError);
    assert_eq!(result.status, Some(401));
    assert!(result.detail.contains("InvalidAuthenticationToken"));
}

#[tokio::test]
async fn test_graph_not_configured() {
    let channel = GraphMailChannel::new(None, Some("reports@example.com".into()));
    let result = channel.deliver(REPORT, "lead@example.com").await;

    assert!(result.is_not_configured());
    assert_eq!(result.channel, DeliveryChannel::GraphMail);
    assert!(result.detail.contains("MICROSOFT_GRAPH_API_TOKEN"));
}

#[tokio::test]
async fn test_dispatcher_prefers_webhook() {
    let webhook_server = MockServer::start().await;
    let graph_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&webhook_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&graph_server)
        .await;

    let dispatcher = TeamsDispatcher::new(
        WebhookChannel::new(Some(webhook_server.uri())),
        GraphMailChannel::new(Some("token".into()), Some("reports@example.com".into()))
            .with_base_url(graph_server.uri()),
    );
    let result = dispatcher.deliver(REPORT, "lead@example.com").await;

    assert!(result.is_delivered());
    assert_eq!(result.channel, DeliveryChannel::Webhook);
}

#[tokio::test]
async fn test_dispatcher_falls_back_to_graph() {
    let graph_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/users/.+/sendMail$"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&graph_server)
        .await;

    let dispatcher = TeamsDispatcher::new(
        WebhookChannel::new(None),
        GraphMailChannel::new(Some("token".into()), Some("reports@example.com".into()))
            .with_base_url(graph_server.uri()),
    );
    let result = dispatcher.deliver(REPORT, "lead@example.com").await;

    assert!(result.is_delivered());
    assert_eq!(result.channel, DeliveryChannel::GraphMail);
}
