//! Jira REST client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use loading_monitor_core::{AssigneeIssues, Error, Issue, JiraConfig, SprintSnapshot, SprintTracker};

use crate::api::{IssuePage, JiraBoard, JiraSprint, ValuePage};

/// Issues requested per page from the sprint and search endpoints.
const PAGE_SIZE: u64 = 50;

/// Jira Cloud client authenticated with username + API token.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    api_token: String,
    story_points_field: String,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            api_token: config.api_token.clone(),
            story_points_field: config.story_points_field.clone(),
        })
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::new(&JiraConfig::from_env()?)
    }

    /// Boards associated with a project, in tracker order.
    pub async fn boards(&self, project_key: &str) -> Result<Vec<JiraBoard>, Error> {
        let page: ValuePage<JiraBoard> = self
            .get(
                "/rest/agile/1.0/board",
                &[("projectKeyOrId", project_key.to_string())],
            )
            .await?;
        Ok(page.values)
    }

    /// Active sprints of a board, in tracker order.
    pub async fn active_sprints(&self, board_id: u64) -> Result<Vec<JiraSprint>, Error> {
        let page: ValuePage<JiraSprint> = self
            .get(
                &format!("/rest/agile/1.0/board/{board_id}/sprint"),
                &[("state", "active".to_string())],
            )
            .await?;
        Ok(page.values)
    }

    /// Every issue in a sprint.
    pub async fn sprint_issues(&self, sprint_id: u64) -> Result<Vec<Issue>, Error> {
        let path = format!("/rest/agile/1.0/sprint/{sprint_id}/issue");
        self.paged_issues(&path, Vec::new()).await
    }

    /// Every issue matching a JQL query.
    pub async fn search(&self, jql: &str) -> Result<Vec<Issue>, Error> {
        self.paged_issues("/rest/api/2/search", vec![("jql", jql.to_string())])
            .await
    }

    /// Follow `startAt` until `total` issues have been read.
    async fn paged_issues(
        &self,
        path: &str,
        base_query: Vec<(&str, String)>,
    ) -> Result<Vec<Issue>, Error> {
        let fields = format!("summary,status,assignee,{}", self.story_points_field);
        let mut issues = Vec::new();
        let mut start_at = 0u64;

        loop {
            let mut query = base_query.clone();
            query.push(("fields", fields.clone()));
            query.push(("startAt", start_at.to_string()));
            query.push(("maxResults", PAGE_SIZE.to_string()));

            let page: IssuePage = self.get(path, &query).await?;
            let received = page.issues.len() as u64;
            issues.extend(
                page.issues
                    .into_iter()
                    .map(|raw| raw.into_issue(&self.story_points_field)),
            );

            start_at += received;
            if received == 0 || start_at >= page.total {
                break;
            }
            debug!(start_at, total = page.total, "Fetching next issue page");
        }

        Ok(issues)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Jira API request");

        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.api_token))
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::transport(
                Some(status.as_u16()),
                format!("Jira API error: {body}"),
            ));
        }

        let body = resp.text().await.map_err(transport)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("Jira response from {endpoint}: {e}")))
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::transport(err.status().map(|s| s.as_u16()), err.to_string())
}

/// Build the JQL selecting one assignee's sprint issues.
///
/// Without a sprint id the query spans every open sprint of the project.
pub fn assignee_jql(project_key: &str, assignee: &str, sprint_id: Option<u64>) -> String {
    let escaped = assignee.replace('\\', "\\\\").replace('"', "\\\"");
    let sprint_clause = match sprint_id {
        Some(id) => format!("sprint = {id}"),
        None => "sprint in openSprints()".to_string(),
    };
    format!("project = {project_key} AND assignee = \"{escaped}\" AND {sprint_clause}")
}

#[async_trait]
impl SprintTracker for JiraClient {
    async fn active_sprint_board(
        &self,
        project_key: &str,
        board_id: Option<u64>,
    ) -> Result<SprintSnapshot, Error> {
        let board_id = match board_id {
            Some(id) => id,
            None => {
                let boards = self.boards(project_key).await?;
                if boards.len() > 1 {
                    warn!(
                        project = %project_key,
                        boards = boards.len(),
                        "Multiple boards found, using the first"
                    );
                }
                boards
                    .first()
                    .map(|b| b.id)
                    .ok_or_else(|| {
                        Error::NotFound(format!("No boards found for project {project_key}"))
                    })?
            }
        };

        let sprints = self.active_sprints(board_id).await?;
        if sprints.len() > 1 {
            warn!(
                board_id,
                sprints = sprints.len(),
                "Multiple active sprints found, using the first"
            );
        }
        let sprint = sprints.into_iter().next().ok_or_else(|| {
            Error::NotFound(format!("No active sprints found for project {project_key}"))
        })?;

        let issues = self.sprint_issues(sprint.id).await?;
        info!(
            project = %project_key,
            board_id,
            sprint = %sprint.name,
            issues = issues.len(),
            "Fetched active sprint"
        );

        Ok(SprintSnapshot::from_issues(sprint.name, sprint.id, &issues))
    }

    async fn assignee_sprint_issues(
        &self,
        project_key: &str,
        assignee: &str,
        sprint_id: Option<u64>,
    ) -> Result<AssigneeIssues, Error> {
        let jql = assignee_jql(project_key, assignee, sprint_id);
        let issues = self.search(&jql).await?;
        info!(
            project = %project_key,
            assignee = %assignee,
            issues = issues.len(),
            "Fetched assignee issues"
        );

        Ok(AssigneeIssues::from_issues(assignee, &issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignee_jql_open_sprints() {
        assert_eq!(
            assignee_jql("GC", "Sam Lee", None),
            r#"project = GC AND assignee = "Sam Lee" AND sprint in openSprints()"#
        );
    }

    #[test]
    fn test_assignee_jql_specific_sprint() {
        assert_eq!(
            assignee_jql("GC", "sam@example.com", Some(31)),
            r#"project = GC AND assignee = "sam@example.com" AND sprint = 31"#
        );
    }

    #[test]
    fn test_assignee_jql_escapes_quotes() {
        let jql = assignee_jql("GC", r#"Sam "The Closer" Lee"#, None);
        assert!(jql.contains(r#"assignee = "Sam \"The Closer\" Lee""#));
    }
}
