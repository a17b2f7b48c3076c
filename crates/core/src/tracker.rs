//! Capability traits the pipeline is wired through.

use async_trait::async_trait;

use crate::Error;
use crate::delivery::ReportDeliveryResult;
use crate::model::{AssigneeIssues, SprintSnapshot};

/// Read access to an issue tracker's sprint data.
#[async_trait]
pub trait SprintTracker: Send + Sync {
    /// Resolve the active sprint of a project and aggregate its issues.
    async fn active_sprint_board(
        &self,
        project_key: &str,
        board_id: Option<u64>,
    ) -> Result<SprintSnapshot, Error>;

    /// Issues of one assignee in the project's open sprints, or in the given sprint.
    async fn assignee_sprint_issues(
        &self,
        project_key: &str,
        assignee: &str,
        sprint_id: Option<u64>,
    ) -> Result<AssigneeIssues, Error>;
}

/// A destination a finished report can be delivered to.
///
/// Implementations never fail past this boundary: every problem is reported
/// through the returned [`ReportDeliveryResult`].
#[async_trait]
pub trait ReportChannel: Send + Sync {
    async fn deliver(&self, report: &str, recipient: &str) -> ReportDeliveryResult;
}

#[async_trait]
impl<T: SprintTracker + ?Sized> SprintTracker for Box<T> {
    async fn active_sprint_board(
        &self,
        project_key: &str,
        board_id: Option<u64>,
    ) -> Result<SprintSnapshot, Error> {
        (**self).active_sprint_board(project_key, board_id).await
    }

    async fn assignee_sprint_issues(
        &self,
        project_key: &str,
        assignee: &str,
        sprint_id: Option<u64>,
    ) -> Result<AssigneeIssues, Error> {
        (**self)
            .assignee_sprint_issues(project_key, assignee, sprint_id)
            .await
    }
}

#[async_trait]
impl<C: ReportChannel + ?Sized> ReportChannel for Box<C> {
    async fn deliver(&self, report: &str, recipient: &str) -> ReportDeliveryResult {
        (**self).deliver(report, recipient).await
    }
}

/// Stand-in tracker used when credentials are missing.
///
/// Every call fails with [`Error::ConfigurationMissing`], letting a run still
/// compose and deliver a report that explains the problem.
#[derive(Debug, Clone)]
pub struct UnconfiguredTracker {
    reason: String,
}

impl UnconfiguredTracker {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SprintTracker for UnconfiguredTracker {
    async fn active_sprint_board(
        &self,
        _project_key: &str,
        _board_id: Option<u64>,
    ) -> Result<SprintSnapshot, Error> {
        Err(Error::ConfigurationMissing(self.reason.clone()))
    }

    async fn assignee_sprint_issues(
        &self,
        _project_key: &str,
        _assignee: &str,
        _sprint_id: Option<u64>,
    ) -> Result<AssigneeIssues, Error> {
        Err(Error::ConfigurationMissing(self.reason.clone()))
    }
}
