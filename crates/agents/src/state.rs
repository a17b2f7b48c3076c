//! Run state of the loading monitor pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline step currently executing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    /// Not started.
    #[default]
    Idle,
    /// Waiting for the tracker.
    Fetching,
    /// Rendering the report and writing the artifact.
    Composing,
    /// Waiting for the messaging endpoint.
    Dispatching,
    /// Run completed, whatever the delivery outcome.
    Finished,
}

/// Metrics for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    /// When the run started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Issues in the fetched sprint.
    pub issues: usize,
    /// Distinct assignees in the fetched sprint.
    pub members: usize,
    /// Failures recorded along the way.
    pub errors: u32,
}

impl RunMetrics {
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_secs(&self) -> Option<f64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }
}

/// State of a single pipeline run. Created per run, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    pub stage: RunStage,
    pub metrics: RunMetrics,
    /// Failure messages, in the order they occurred.
    pub errors: Vec<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.stage, RunStage::Idle | RunStage::Finished)
    }

    pub fn is_finished(&self) -> bool {
        self.stage == RunStage::Finished
    }

    pub fn set_fetching(&mut self) {
        self.stage = RunStage::Fetching;
        self.metrics.start();
    }

    pub fn set_composing(&mut self) {
        self.stage = RunStage::Composing;
    }

    pub fn set_dispatching(&mut self) {
        self.stage = RunStage::Dispatching;
    }

    pub fn set_finished(&mut self) {
        self.stage = RunStage::Finished;
        self.metrics.finish();
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.metrics.errors += 1;
    }

    pub fn record_sprint(&mut self, issues: usize, members: usize) {
        self.metrics.issues = issues;
        self.metrics.members = members;
    }
}
