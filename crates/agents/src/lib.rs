//! Report composition and the sprint loading pipeline.

pub mod pipeline;
pub mod report;
pub mod state;

pub use pipeline::{DEFAULT_REPORT_PATH, LoadingMonitor, MonitorSettings, RunOutcome};
pub use report::{
    NarrativeBackend, REPORT_SYSTEM_PROMPT, build_narrative_prompt, render_failure, render_report,
};
pub use state::{RunMetrics, RunStage, RunState};
