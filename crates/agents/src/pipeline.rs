//! Sequential fetch → compose → deliver pipeline.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{error, info, warn};

use loading_monitor_core::{
    DeliveryOutcome, Error, LlmConfig, ReportChannel, ReportDeliveryResult, SprintSnapshot,
    SprintTracker,
};

use crate::report::{NarrativeBackend, build_narrative_prompt, render_failure, render_report};
use crate::state::RunState;

/// Artifact written when no output path is configured.
pub const DEFAULT_REPORT_PATH: &str = "sprint_loading_report.md";

/// Inputs of one monitor run.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Jira project key
    pub project_key: String,
    /// Board to read; the project's first board when unset
    pub board_id: Option<u64>,
    /// Who the report is addressed to
    pub recipient: String,
    /// Where the report artifact is written
    pub output_path: PathBuf,
    /// Label printed under the report title
    pub run_label: String,
}

impl MonitorSettings {
    pub fn new(project_key: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            board_id: None,
            recipient: recipient.into(),
            output_path: PathBuf::from(DEFAULT_REPORT_PATH),
            run_label: format!("Active Sprint - {}", Local::now().format("%Y-%m-%d")),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Sprint breakdown, absent when fetching failed
    pub snapshot: Option<SprintSnapshot>,
    /// Report text that was written and delivered
    pub report: String,
    /// Location of the written artifact
    pub report_path: PathBuf,
    pub delivery: ReportDeliveryResult,
}

/// Runs the loading monitor against a tracker and a report channel.
pub struct LoadingMonitor<T, C> {
    pub state: RunState,
    tracker: T,
    channel: C,
    narrative: Option<(Box<dyn NarrativeBackend>, LlmConfig)>,
    settings: MonitorSettings,
}

impl<T, C> LoadingMonitor<T, C>
where
    T: SprintTracker,
    C: ReportChannel,
{
    pub fn new(tracker: T, channel: C, settings: MonitorSettings) -> Self {
        Self {
            state: RunState::new(),
            tracker,
            channel,
            narrative: None,
            settings,
        }
    }

    /// Let a language model phrase the report instead of the plain rendering.
    pub fn with_narrative(mut self, backend: Box<dyn NarrativeBackend>, llm: LlmConfig) -> Self {
        self.narrative = Some((backend, llm));
        self
    }

    /// Run every step once.
    ///
    /// Tracker and delivery failures end up in the report and the returned
    /// outcome; only a failure to write the artifact is returned as an error.
    pub async fn run(&mut self) -> Result<RunOutcome, Error> {
        info!(project = %self.settings.project_key, "Starting sprint loading run");
        self.state.set_fetching();

        let fetched = self
            .tracker
            .active_sprint_board(&self.settings.project_key, self.settings.board_id)
            .await;

        self.state.set_composing();
        let (snapshot, report) = match fetched {
            Ok(snapshot) => {
                self.state
                    .record_sprint(snapshot.issue_count(), snapshot.team_members.len());
                let report = self.compose(&snapshot).await;
                (Some(snapshot), report)
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch sprint data");
                self.state.record_error(e.to_string());
                let report =
                    render_failure(&self.settings.project_key, &e, &self.settings.run_label);
                (None, report)
            }
        };

        write_report(&self.settings.output_path, &report).await?;
        info!(path = %self.settings.output_path.display(), "Report written");

        self.state.set_dispatching();
        let delivery = self
            .channel
            .deliver(&report, &self.settings.recipient)
            .await;
        match delivery.outcome {
            DeliveryOutcome::Delivered => {
                info!(channel = %delivery.channel, "Report delivered");
            }
            DeliveryOutcome::NotConfigured => {
                warn!("No delivery channel configured, report kept locally");
            }
            DeliveryOutcome::TransportError => {
                warn!(
                    channel = %delivery.channel,
                    status = ?delivery.status,
                    "Report delivery failed"
                );
                self.state.record_error(delivery.detail.clone());
            }
        }

        self.state.set_finished();
        info!(
            issues = self.state.metrics.issues,
            members = self.state.metrics.members,
            errors = self.state.metrics.errors,
            duration_secs = ?self.state.metrics.duration_secs(),
            "Sprint loading run finished"
        );

        Ok(RunOutcome {
            snapshot,
            report,
            report_path: self.settings.output_path.clone(),
            delivery,
        })
    }

    async fn compose(&mut self, snapshot: &SprintSnapshot) -> String {
        let rendered = render_report(snapshot, &self.settings.run_label);

        let Some((backend, llm)) = &self.narrative else {
            return rendered;
        };

        let prompt = build_narrative_prompt(&rendered, &self.settings.run_label);
        match backend.narrate(llm, &prompt).await {
            Ok(narrative) if !narrative.trim().is_empty() => narrative,
            Ok(_) => {
                warn!(
                    provider = %llm.provider,
                    "Narrative backend returned nothing, using plain report"
                );
                rendered
            }
            Err(e) => {
                warn!(
                    provider = %llm.provider,
                    error = %e,
                    "Narrative backend failed, using plain report"
                );
                self.state.record_error(e.to_string());
                rendered
            }
        }
    }
}

async fn write_report(path: &Path, report: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, report).await?;
    Ok(())
}
