//! Core types for the Jira loading monitor.
//!
//! Holds the sprint data model, the workload aggregator, delivery results and
//! the trait seams the pipeline is wired through.

pub mod config;
pub mod delivery;
pub mod model;
pub mod points;
pub mod tracker;
pub mod workload;

pub use config::{JiraConfig, LlmConfig, LlmProvider, TeamsConfig};
pub use delivery::{DeliveryChannel, DeliveryOutcome, ReportDeliveryResult};
pub use model::{AssigneeIssues, AssigneeWorkload, Issue, IssueDetail, IssueEntry, SprintSnapshot};
pub use points::StoryPoints;
pub use tracker::{ReportChannel, SprintTracker, UnconfiguredTracker};
pub use workload::{UNASSIGNED, aggregate};

/// Error types shared by the fetcher, composer and pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{}", transport_message(.status, .message))]
    Transport { status: Option<u16>, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Transport failure: {code} - {message}"),
        None => format!("Transport failure: {message}"),
    }
}
