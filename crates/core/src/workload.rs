//! Per-assignee workload aggregation.

use indexmap::IndexMap;

use crate::model::{AssigneeWorkload, Issue, IssueEntry};

/// Assignee name used for issues nobody owns.
pub const UNASSIGNED: &str = "Unassigned";

/// Group issues by assignee and sum their story points.
///
/// Assignees keep the order in which they first appear in `issues`. Issues
/// without an assignee land under [`UNASSIGNED`]; issues without an estimate
/// contribute zero points.
pub fn aggregate(issues: &[Issue]) -> IndexMap<String, AssigneeWorkload> {
    let mut members: IndexMap<String, AssigneeWorkload> = IndexMap::new();

    for issue in issues {
        let entry = IssueEntry {
            key: issue.key.clone(),
            summary: issue.summary.clone(),
            points: issue.points(),
        };

        members
            .entry(issue.assignee_name().to_string())
            .or_default()
            .push(entry);
    }

    members
}
