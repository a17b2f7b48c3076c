//! Request bodies for the Teams webhook and the Graph send-mail API.

use serde::Serialize;

use crate::REPORT_TITLE;

/// Legacy Office 365 connector card accepted by Teams incoming webhooks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageCard {
    #[serde(rename = "@type")]
    pub card_type: &'static str,
    #[serde(rename = "@context")]
    pub context: &'static str,
    pub summary: &'static str,
    pub theme_color: &'static str,
    pub title: &'static str,
    pub sections: Vec<CardSection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    pub activity_title: String,
    pub text: String,
    pub markdown: bool,
}

impl MessageCard {
    pub fn report(report: &str, recipient: &str) -> Self {
        Self {
            card_type: "MessageCard",
            context: "https://schema.org/extensions",
            summary: "Sprint Loading Report",
            theme_color: "0078D4",
            title: REPORT_TITLE,
            sections: vec![CardSection {
                activity_title: format!("Report sent to: {recipient}"),
                text: report.to_string(),
                markdown: true,
            }],
        }
    }
}

/// Body of `POST /users/{sender}/sendMail`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMailRequest {
    pub message: MailMessage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    pub subject: String,
    pub body: MailBody,
    pub to_recipients: Vec<Recipient>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailBody {
    pub content_type: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email_address: EmailAddress,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailAddress {
    pub address: String,
}

impl SendMailRequest {
    pub fn report(report: &str, recipient: &str) -> Self {
        Self {
            message: MailMessage {
                subject: REPORT_TITLE.to_string(),
                body: MailBody {
                    content_type: "Text",
                    content: report.to_string(),
                },
                to_recipients: vec![Recipient {
                    email_address: EmailAddress {
                        address: recipient.to_string(),
                    },
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_card_shape() {
        let card = MessageCard::report("## Sprint 12", "lead@example.com");
        let json = serde_json::to_value(&card).unwrap();

        assert_eq!(json["@type"], "MessageCard");
        assert_eq!(json["@context"], "https://schema.org/extensions");
        assert_eq!(json["summary"], "Sprint Loading Report");
        assert_eq!(json["themeColor"], "0078D4");
        assert_eq!(json["title"], REPORT_TITLE);
        assert_eq!(json["sections"][0]["activityTitle"], "Report sent to: lead@example.com");
        assert_eq!(json["sections"][0]["text"], "## Sprint 12");
        assert_eq!(json["sections"][0]["markdown"], true);
    }

    #[test]
    fn test_send_mail_shape() {
        let request = SendMailRequest::report("body text", "lead@example.com");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["message"]["subject"], REPORT_TITLE);
        assert_eq!(json["message"]["body"]["contentType"], "Text");
        assert_eq!(json["message"]["body"]["content"], "body text");
        assert_eq!(
            json["message"]["toRecipients"][0]["emailAddress"]["address"],
            "lead@example.com"
        );
    }
}
