//! Sprint data model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::points::StoryPoints;
use crate::workload::{UNASSIGNED, aggregate};

/// A sprint issue, normalized from the tracker's raw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue key (e.g., "PROJ-42")
    pub key: String,
    /// Issue summary/title
    pub summary: String,
    /// Status label (e.g., "In Progress")
    pub status: Option<String>,
    /// Assignee display name
    pub assignee: Option<String>,
    /// Story point estimate
    pub story_points: Option<StoryPoints>,
}

impl Issue {
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            summary: summary.into(),
            status: None,
            assignee: None,
            story_points: None,
        }
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.story_points = Some(StoryPoints::from_f64(points));
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Assignee name, or the "Unassigned" sentinel.
    pub fn assignee_name(&self) -> &str {
        self.assignee.as_deref().unwrap_or(UNASSIGNED)
    }

    /// Story points, with a missing estimate counting as zero.
    pub fn points(&self) -> StoryPoints {
        self.story_points.unwrap_or_default()
    }
}

/// Compact issue record kept under an assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEntry {
    pub key: String,
    pub summary: String,
    pub points: StoryPoints,
}

/// Workload of one assignee within a sprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssigneeWorkload {
    /// Sum of the points of every entry in `issues`
    pub total_points: StoryPoints,
    /// Owned issues, in tracker order
    pub issues: Vec<IssueEntry>,
}

impl AssigneeWorkload {
    pub(crate) fn push(&mut self, entry: IssueEntry) {
        self.total_points += entry.points;
        self.issues.push(entry);
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

/// Per-assignee breakdown of the active sprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintSnapshot {
    /// Sprint name
    pub sprint: String,
    /// Sprint ID
    pub sprint_id: u64,
    /// Workload keyed by assignee, in order of first appearance
    pub team_members: IndexMap<String, AssigneeWorkload>,
}

impl SprintSnapshot {
    pub fn from_issues(sprint: impl Into<String>, sprint_id: u64, issues: &[Issue]) -> Self {
        Self {
            sprint: sprint.into(),
            sprint_id,
            team_members: aggregate(issues),
        }
    }

    pub fn total_points(&self) -> StoryPoints {
        self.team_members.values().map(|w| w.total_points).sum()
    }

    pub fn issue_count(&self) -> usize {
        self.team_members.values().map(AssigneeWorkload::issue_count).sum()
    }
}

/// Issue row in a single-assignee listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDetail {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub story_points: StoryPoints,
}

/// Issues assigned to one team member across open sprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssigneeIssues {
    pub assignee: String,
    pub total_story_points: StoryPoints,
    pub issue_count: usize,
    pub issues: Vec<IssueDetail>,
}

impl AssigneeIssues {
    pub fn from_issues(assignee: impl Into<String>, issues: &[Issue]) -> Self {
        let issues: Vec<IssueDetail> = issues
            .iter()
            .map(|issue| IssueDetail {
                key: issue.key.clone(),
                summary: issue.summary.clone(),
                status: issue.status.clone().unwrap_or_default(),
                story_points: issue.points(),
            })
            .collect();

        Self {
            assignee: assignee.into(),
            total_story_points: issues.iter().map(|i| i.story_points).sum(),
            issue_count: issues.len(),
            issues,
        }
    }
}
