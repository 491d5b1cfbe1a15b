//! Plan comment CLI entrypoint.
//!
//! This is the main entrypoint for the plan-comment command-line tool.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use plan_comment::cli::{Cli, Commands, OutputFormatter, PlanArgs, TargetArgs};
use plan_comment::config::{find_plan_files, Settings, SettingsValidator};
use plan_comment::error::{ConfigError, Result};
use plan_comment::github::{CommentPublisher, GitHubClient, PullRequestContext};
use plan_comment::planner::{PlanPipeline, PlanResult, REPORT_MARKER};

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // Loaded before parsing so .env can supply option defaults
    let dotenv = load_dotenv();
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    match dotenv {
        Ok(Some(path)) => debug!("Loaded environment from: {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let formatter = OutputFormatter::new(cli.output);

    match cli.command {
        Commands::Comment { plans, target, purge } => {
            cmd_comment(&plans, target, purge, &formatter).await
        }
        Commands::Render { plans } => cmd_render(&plans, &formatter),
        Commands::Cleanup { target } => cmd_cleanup(target, &formatter).await,
    }
}

/// Render plans and post the reports.
async fn cmd_comment(
    plans: &PlanArgs,
    target: TargetArgs,
    purge: bool,
    formatter: &OutputFormatter,
) -> Result<()> {
    let settings = load_settings(plans, purge)?;

    // Resolve the pull request first so a bad environment fails before any work
    let client = create_github_client(target)?;
    info!("Reporting on pull request {}", client.context());

    let pipeline = PlanPipeline::new(&settings);
    let results = process_plans(&pipeline, &settings)?;
    eprintln!("{}", formatter.format_summary(&results));

    let reports = pipeline.build_reports(&results)?;
    let publisher = CommentPublisher::new(client);

    if settings.purge_previous {
        let removed = publisher.purge(REPORT_MARKER).await?;
        debug!("Removed {removed} previous report(s)");
    }

    if reports.is_empty() {
        info!("No changes to report");
    }

    let published = publisher.publish(&reports).await?;
    eprintln!(
        "{}",
        formatter.format_success(&format!("Published {published} report(s)"))
    );

    Ok(())
}

/// Render plans and print the reports to stdout.
fn cmd_render(plans: &PlanArgs, formatter: &OutputFormatter) -> Result<()> {
    let settings = load_settings(plans, false)?;

    let pipeline = PlanPipeline::new(&settings);
    let results = process_plans(&pipeline, &settings)?;
    eprintln!("{}", formatter.format_summary(&results));

    let reports = pipeline.build_reports(&results)?;
    let mut stdout = std::io::stdout().lock();
    for report in &reports {
        writeln!(stdout, "{report}")?;
    }
    stdout.flush()?;

    Ok(())
}

/// Remove reports from previous runs.
async fn cmd_cleanup(target: TargetArgs, formatter: &OutputFormatter) -> Result<()> {
    let client = create_github_client(target)?;
    info!("Cleaning up reports on pull request {}", client.context());

    let removed = CommentPublisher::new(client).purge(REPORT_MARKER).await?;
    eprintln!(
        "{}",
        formatter.format_success(&format!("Removed {removed} previous report(s)"))
    );

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Loads `.env` from the working directory if present.
///
/// Values only fill variables that are not already set.
fn load_dotenv() -> Result<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::EnvFile {
            path: PathBuf::from(".env"),
            message: e.to_string(),
        }
        .into()),
    }
}

/// Builds and validates run settings.
fn load_settings(plans: &PlanArgs, purge: bool) -> Result<Settings> {
    let settings = plans.to_settings(purge);
    debug!(
        "Settings: {}",
        serde_json::to_string(&settings).unwrap_or_default()
    );

    let result = SettingsValidator::new().validate(&settings)?;
    for warning in &result.warnings {
        warn!("{warning}");
    }

    Ok(settings)
}

/// Discovers and processes every plan.
fn process_plans(pipeline: &PlanPipeline, settings: &Settings) -> Result<Vec<PlanResult>> {
    let paths = find_plan_files(&settings.plan_dir, &settings.plan_file, settings.max_depth)?;
    pipeline.process_all(&paths)
}

/// Creates a GitHub client for the pull request of this run.
fn create_github_client(target: TargetArgs) -> Result<GitHubClient> {
    let context = PullRequestContext::from_env(target.pr_number)?;
    GitHubClient::from_env(context)
}
