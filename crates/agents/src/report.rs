//! Sprint loading report rendering.

use async_trait::async_trait;

use loading_monitor_core::{Error, LlmConfig, SprintSnapshot};

/// Instructions handed to the language model that phrases the final report.
pub const REPORT_SYSTEM_PROMPT: &str = r###"You are a reporting analyst for an agile team. You receive the current sprint loading breakdown from Jira and write the progress report that is posted to the team's Microsoft Teams channel.

## Instructions

1. **Summarize the sprint**: name the sprint and state the total story points and issue count
2. **Review each member's load**: compare every member's points against the team average
3. **Flag imbalances**: call out members carrying well above or below the average, and any unassigned work
4. **Recommend**: suggest concrete rebalancing moves when the load is uneven

## Rules

- Use only the numbers in the sprint data below. Do NOT invent issues, people or estimates.
- Keep the team loading table exactly as given.
- Write markdown that renders in a Teams message card.
- Keep the report short enough to read in a minute.
"###;

/// External language model used to phrase the report narrative.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Complete `prompt` with the configured model.
    async fn narrate(&self, llm: &LlmConfig, prompt: &str) -> Result<String, Error>;
}

/// Render the sprint loading report as markdown.
pub fn render_report(snapshot: &SprintSnapshot, run_label: &str) -> String {
    let mut out = String::new();
    let total = snapshot.total_points();

    out.push_str(&format!(
        "# Sprint Loading Report: {} (ID {})\n\n",
        snapshot.sprint, snapshot.sprint_id
    ));
    out.push_str(&format!("_{run_label}_\n\n"));
    out.push_str(&format!(
        "**Total**: {} issues, {} story points across {} team members\n\n",
        snapshot.issue_count(),
        total,
        snapshot.team_members.len()
    ));

    if snapshot.team_members.is_empty() {
        out.push_str("_No issues in this sprint._\n");
        return out;
    }

    out.push_str("## Team Loading\n\n");
    out.push_str("| Team Member | Issues | Story Points | Share |\n");
    out.push_str("|---|---:|---:|---:|\n");
    for (member, workload) in &snapshot.team_members {
        let share = if !total.is_zero() {
            format!("{:.0}%", workload.total_points.as_f64() / total.as_f64() * 100.0)
        } else {
            "-".to_string()
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            member.replace('|', "\\|"),
            workload.issue_count(),
            workload.total_points,
            share
        ));
    }

    for (member, workload) in &snapshot.team_members {
        out.push_str(&format!(
            "\n## {} ({} points)\n\n",
            member, workload.total_points
        ));
        for entry in &workload.issues {
            out.push_str(&format!(
                "- **{}**: {} ({} pts)\n",
                entry.key, entry.summary, entry.points
            ));
        }
    }

    out
}

/// Render the report sent when sprint data could not be fetched.
pub fn render_failure(project_key: &str, error: &Error, run_label: &str) -> String {
    let mut out = String::new();

    out.push_str("# Sprint Loading Report\n\n");
    out.push_str(&format!("_{run_label}_\n\n"));
    out.push_str(&format!(
        "Sprint data could not be retrieved for project {project_key}.\n\n"
    ));
    out.push_str(&format!("> Error retrieving sprint board: {error}\n"));

    out
}

/// Build the language model prompt from an already rendered report.
pub fn build_narrative_prompt(report: &str, run_label: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(REPORT_SYSTEM_PROMPT);
    prompt.push_str("\n\n---\n\n");
    prompt.push_str(&format!("**Reporting period**: {run_label}\n\n"));
    prompt.push_str("## Sprint Data\n\n");
    prompt.push_str(report);
    if !report.ends_with('\n') {
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    use loading_monitor_core::Issue;

    fn make_snapshot() -> SprintSnapshot {
        let issues = vec![
            Issue::new("GC-1", "Login form").with_assignee("Sam").with_points(3.0),
            Issue::new("GC-2", "Logout button").with_assignee("Sam").with_points(2.0),
            Issue::new("GC-3", "Session timeout").with_points(5.0),
        ];
        SprintSnapshot::from_issues("Sprint 12", 31, &issues)
    }

    #[test]
    fn test_render_report() {
        let report = render_report(&make_snapshot(), "Active Sprint - 2026-10-17");

        assert!(report.contains("# Sprint Loading Report: Sprint 12 (ID 31)"));
        assert!(report.contains("_Active Sprint - 2026-10-17_"));
        assert!(report.contains("**Total**: 3 issues, 10 story points across 2 team members"));
        assert!(report.contains("| Sam | 2 | 5 | 50% |"));
        assert!(report.contains("| Unassigned | 1 | 5 | 50% |"));
        assert!(report.contains("- **GC-3**: Session timeout (5 pts)"));
    }

    #[test]
    fn test_render_report_keeps_member_order() {
        let report = render_report(&make_snapshot(), "label");
        let sam = report.find("## Sam").unwrap();
        let unassigned = report.find("## Unassigned").unwrap();
        assert!(sam < unassigned);
    }

    #[test]
    fn test_render_report_zero_points() {
        let issues = vec![Issue::new("GC-1", "Spike").with_assignee("Kim")];
        let snapshot = SprintSnapshot::from_issues("Sprint 1", 1, &issues);

        let report = render_report(&snapshot, "label");
        assert!(report.contains("| Kim | 1 | 0 | - |"));
    }

    #[test]
    fn test_render_report_fractional_points() {
        let issues = vec![
            Issue::new("GC-1", "Audit").with_assignee("A").with_points(0.5),
            Issue::new("GC-2", "Export").with_assignee("A").with_points(2.3),
            Issue::new("GC-3", "Import").with_assignee("B").with_points(0.7),
            Issue::new("GC-4", "Search").with_assignee("C").with_points(2.3),
            Issue::new("GC-5", "Filters").with_assignee("C").with_points(2.3),
            Issue::new("GC-6", "Paging").with_assignee("B").with_points(0.3),
        ];
        let snapshot = SprintSnapshot::from_issues("Sprint 2", 2, &issues);

        let report = render_report(&snapshot, "label");
        assert!(report.contains("**Total**: 6 issues, 8.4 story points across 3 team members"));
        assert!(report.contains("| A | 2 | 2.8 | 33% |"));
        assert!(report.contains("| B | 2 | 1 | 12% |"));
        assert!(report.contains("| C | 2 | 4.6 | 55% |"));
        assert!(!report.contains("0000"));
    }

    #[test]
    fn test_render_report_empty_sprint() {
        let snapshot = SprintSnapshot::from_issues("Sprint 1", 1, &[]);
        let report = render_report(&snapshot, "label");

        assert!(report.contains("No issues in this sprint"));
        assert!(!report.contains("## Team Loading"));
    }

    #[test]
    fn test_render_failure() {
        let err = Error::NotFound("No boards found for project GC".into());
        let report = render_failure("GC", &err, "label");

        assert!(report.contains("could not be retrieved for project GC"));
        assert!(report.contains("No boards found for project GC"));
    }

    #[test]
    fn test_build_narrative_prompt() {
        let report = render_report(&make_snapshot(), "Active Sprint - 2026-10-17");
        let prompt = build_narrative_prompt(&report, "Active Sprint - 2026-10-17");

        assert!(prompt.starts_with(REPORT_SYSTEM_PROMPT));
        assert!(prompt.contains("**Reporting period**: Active Sprint - 2026-10-17"));
        assert!(prompt.contains("| Sam | 2 | 5 | 50% |"));
    }
}
