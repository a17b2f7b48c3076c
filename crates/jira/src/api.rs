//! Jira REST response types.

use std::collections::HashMap;

use serde::Deserialize;

use loading_monitor_core::{Issue, StoryPoints};

/// Paginated list envelope used by the Agile API (`/board`, `/sprint`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePage<T> {
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

/// Paginated issue envelope used by sprint issue listings and JQL search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePage {
    #[serde(default)]
    pub start_at: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
}

/// Jira agile board.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraBoard {
    pub id: u64,
    pub name: String,
}

/// Jira sprint.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraSprint {
    pub id: u64,
    pub name: String,
    /// "active", "future" or "closed"
    pub state: Option<String>,
}

/// Jira issue as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssue {
    /// Issue key (e.g., "PROJ-123")
    pub key: String,
    pub fields: JiraIssueFields,
}

/// Jira issue fields.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraIssueFields {
    /// Issue summary/title
    pub summary: Option<String>,
    /// Status
    pub status: Option<JiraStatus>,
    /// Assignee, null when nobody owns the issue
    pub assignee: Option<JiraUser>,
    /// Custom fields, story points among them
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

/// Jira status.
#[derive(Debug, Clone, Deserialize)]
pub struct JiraStatus {
    pub name: String,
}

/// Jira user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    /// Display name
    pub display_name: Option<String>,
}

impl JiraIssue {
    /// Normalize into the tracker-independent [`Issue`].
    ///
    /// `story_points_field` names the custom field holding the estimate;
    /// a missing, null or non-numeric value leaves the estimate unset.
    pub fn into_issue(self, story_points_field: &str) -> Issue {
        let story_points = self
            .fields
            .custom
            .get(story_points_field)
            .and_then(serde_json::Value::as_f64)
            .map(StoryPoints::from_f64);

        Issue {
            key: self.key,
            summary: self.fields.summary.unwrap_or_default(),
            status: self.fields.status.map(|s| s.name),
            assignee: self.fields.assignee.and_then(|a| a.display_name),
            story_points,
        }
    }
}
