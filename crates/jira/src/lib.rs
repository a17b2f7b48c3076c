//! Jira Cloud access for the loading monitor.
//!
//! Resolves a project's active sprint through the Agile REST API and runs JQL
//! searches for per-assignee listings.

pub mod api;
pub mod client;

pub use api::{JiraBoard, JiraIssue, JiraIssueFields, JiraSprint, JiraStatus, JiraUser};
pub use client::{JiraClient, assignee_jql};
