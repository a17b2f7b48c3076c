//! Jira Loading Monitor CLI
//!
//! Fetches the active sprint, reports per-member story point loading and
//! delivers the report to Microsoft Teams.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use loading_monitor_agents::{DEFAULT_REPORT_PATH, LoadingMonitor, MonitorSettings};
use loading_monitor_core::config::DEFAULT_PROJECT_KEY;
use loading_monitor_core::{
    JiraConfig, LlmConfig, ReportChannel, SprintTracker, TeamsConfig, UnconfiguredTracker,
};
use loading_monitor_jira::JiraClient;
use loading_monitor_teams::TeamsDispatcher;

#[derive(Parser)]
#[command(name = "jira-loading-monitor")]
#[command(about = "Sprint loading reports from Jira to Microsoft Teams")]
struct Cli {
    /// Jira project key
    #[arg(
        long,
        short,
        env = "JIRA_PROJECT_KEY",
        default_value = DEFAULT_PROJECT_KEY,
        global = true
    )]
    project: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the active sprint, write the report and deliver it
    Run {
        /// Board ID (defaults to the project's first board)
        #[arg(long, env = "JIRA_BOARD_ID")]
        board_id: Option<u64>,

        /// Report recipient
        #[arg(long, env = "REPORT_RECIPIENT")]
        recipient: String,

        /// Where to write the report
        #[arg(long, short, env = "REPORT_OUTPUT", default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,
    },

    /// Print the active sprint breakdown as JSON
    Board {
        /// Board ID (defaults to the project's first board)
        #[arg(long, env = "JIRA_BOARD_ID")]
        board_id: Option<u64>,
    },

    /// Print one team member's sprint issues as JSON
    Member {
        /// Assignee name or email as known to Jira
        #[arg(long, short)]
        assignee: String,

        /// Sprint ID (defaults to every open sprint)
        #[arg(long)]
        sprint_id: Option<u64>,
    },

    /// Deliver an existing report file
    Send {
        /// Report file to send
        #[arg(long, short, default_value = DEFAULT_REPORT_PATH)]
        file: PathBuf,

        /// Report recipient
        #[arg(long, env = "REPORT_RECIPIENT")]
        recipient: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.json_logs)?;

    match cli.command {
        Commands::Run {
            board_id,
            recipient,
            output,
        } => {
            let tracker: Box<dyn SprintTracker> = match jira_client() {
                Ok(client) => Box::new(client),
                Err(e) => {
                    warn!(error = %e, "Jira not configured, the report will explain why");
                    Box::new(UnconfiguredTracker::new(e.to_string()))
                }
            };
            let channel = TeamsDispatcher::from_config(&TeamsConfig::from_env());

            let llm = LlmConfig::from_env();
            info!(provider = %llm.provider, model = %llm.model, "Narrative backend configured");

            let mut settings = MonitorSettings::new(&cli.project, recipient);
            settings.board_id = board_id;
            settings.output_path = output;

            let mut monitor = LoadingMonitor::new(tracker, channel, settings);
            let outcome = monitor
                .run()
                .await
                .context("An error occurred while running the monitor")?;

            println!("Report written to {}", outcome.report_path.display());
            println!("{}", outcome.delivery);
            println!("\n{}", "=".repeat(50));
            println!("Jira Loading Monitor Execution Complete");
            println!("{}", "=".repeat(50));
        }

        Commands::Board { board_id } => {
            let client = jira_client()?;
            let snapshot = client
                .active_sprint_board(&cli.project, board_id)
                .await
                .context("Error retrieving sprint board")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Commands::Member {
            assignee,
            sprint_id,
        } => {
            let client = jira_client()?;
            let issues = client
                .assignee_sprint_issues(&cli.project, &assignee, sprint_id)
                .await
                .context("Error retrieving team member issues")?;
            println!("{}", serde_json::to_string_pretty(&issues)?);
        }

        Commands::Send { file, recipient } => {
            let report = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let channel = TeamsDispatcher::from_config(&TeamsConfig::from_env());
            let result = channel.deliver(&report, &recipient).await;
            println!("{result}");
        }
    }

    Ok(())
}

fn jira_client() -> Result<JiraClient> {
    let config = JiraConfig::from_env()?;
    Ok(JiraClient::new(&config)?)
}

fn init_logging(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
