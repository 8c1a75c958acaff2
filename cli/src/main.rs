//! CLI entrypoint for schedule-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use schedule_application::{
    ConsensusProgressNotifier, DiscrepancySink, NoProgress, RunConsensusUseCase, RunLogger,
    RunSuiteUseCase, ValidatorAdapter,
};
use schedule_domain::{
    AdapterId, ConfigIssue, OutputFormat, ScheduleValidator, Severity, standard_scenarios,
};
use schedule_infrastructure::{
    BackendAdapter, Capabilities, ConfigLoader, FileConfig, GoldenAdapter, JsonlRunLogger,
    LegacyOracleAdapter, LegacyPage, MarkdownFileSink, WebDriverClient, drain_session_closes,
};
use schedule_presentation::{Cli, ConsoleFormatter, ProgressReporter, ReportFormatter, RunMode};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Longest wait for abandoned browser sessions to close before exiting
const SESSION_CLOSE_BOUND: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        for issue in config.validate() {
            println!("  {:?}: {}", issue.severity, issue.message);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting schedule-quorum");

    report_config_issues(&config.validate())?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let Some(mode) = cli.mode()? else {
        bail!("Nothing to run. Give a scenario id, --days, --all, or --list (see --help).");
    };

    if mode == RunMode::List {
        print!("{}", ConsoleFormatter::format_scenario_list(&standard_scenarios()));
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let adapter_ids = {
        let requested = cli.adapter_ids()?;
        if requested.is_empty() {
            config.enabled_adapters()
        } else {
            requested
        }
    };
    let session_closes = TaskTracker::new();
    let adapters = build_adapters(&config, &adapter_ids, &session_closes)?;
    info!(
        "Adapters: {}",
        adapter_ids
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let report_dir = cli.report_dir.clone().unwrap_or_else(|| config.reports.dir.clone());
    let sink: Arc<dyn DiscrepancySink> = Arc::new(MarkdownFileSink::new(report_dir));

    let consensus = RunConsensusUseCase::new(adapters, config.consensus_params());
    let mut suite = RunSuiteUseCase::new(consensus).with_sink(sink);
    if let Some(path) = &config.reports.run_log {
        match JsonlRunLogger::new(path) {
            Some(logger) => {
                let logger: Arc<dyn RunLogger> = Arc::new(logger);
                suite = suite.with_run_logger(logger);
            }
            None => warn!("Run log disabled: could not open {}", path.display()),
        }
    }

    // Ctrl-C cancels in-flight adapters; captured results are still reported
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling pending adapters");
            ctrl_c.cancel();
        }
    });

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    let formatter = ConsoleFormatter::new(format);

    let progress: Box<dyn ConsensusProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let (scenarios, single) = match mode {
        RunMode::Single(scenario) => (vec![*scenario], true),
        _ => (standard_scenarios(), false),
    };

    let result = suite
        .execute_with_progress(scenarios, progress.as_ref(), &cancel)
        .await;
    // Sessions dropped by timeouts or Ctrl-C are closed before the runtime goes away
    drain_session_closes(&session_closes, SESSION_CLOSE_BOUND).await;
    let result = result?;

    if single {
        for report in &result.reports {
            println!("{}", formatter.format_report(report));
        }
        if !cli.quiet {
            for document in &result.documents {
                eprintln!("Discrepancy report written to {}", document.location);
            }
        }
    } else {
        println!("{}", formatter.format_suite(&result));
    }

    if result.has_escalations() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Initialize tracing based on verbosity level, optionally teeing to a file
fn init_logging(verbose: u8, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Log warnings; refuse to run on errors
fn report_config_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues {
        match issue.severity {
            Severity::Warning => warn!("Config: {}", issue.message),
            Severity::Error => eprintln!("Config error: {}", issue.message),
        }
    }
    if ConfigIssue::has_errors(issues) {
        bail!("Configuration is invalid (run with --show-config for sources)");
    }
    Ok(())
}

fn build_adapters(
    config: &FileConfig,
    ids: &[AdapterId],
    session_closes: &TaskTracker,
) -> Result<Vec<Arc<dyn ValidatorAdapter>>> {
    let mut adapters: Vec<Arc<dyn ValidatorAdapter>> = Vec::new();

    for id in ids {
        match id {
            AdapterId::Golden => {
                let validator = ScheduleValidator::new(config.validator.min_nights);
                adapters.push(Arc::new(GoldenAdapter::new(validator)));
            }
            AdapterId::Backend => {
                let Some(url) = config.backend.url.as_deref().filter(|_| config.backend.is_configured())
                else {
                    bail!("The backend adapter needs [backend] url");
                };
                let adapter = BackendAdapter::new(
                    url,
                    config.backend.token(),
                    Duration::from_secs(config.backend.timeout_secs.max(1)),
                )
                .context("Could not create backend HTTP client")?;
                adapters.push(Arc::new(adapter));
            }
            AdapterId::Legacy => {
                let (Some(webdriver_url), Some(page_url)) = (
                    config.legacy.webdriver_url.as_deref(),
                    config.legacy.page_url.as_deref(),
                ) else {
                    bail!("The legacy adapter needs [legacy] webdriver_url and page_url");
                };
                let driver = WebDriverClient::new(
                    webdriver_url,
                    Capabilities {
                        browser: config.legacy.browser.clone(),
                        headless: config.legacy.headless,
                    },
                    Duration::from_secs(config.consensus.adapter_timeout_secs.max(1)),
                )
                .context("Could not create WebDriver HTTP client")?;
                let adapter = LegacyOracleAdapter::new(
                    Arc::new(driver),
                    LegacyPage {
                        url: page_url.to_string(),
                        day_selector: config.legacy.day_selector.clone(),
                        settle: Duration::from_millis(config.legacy.settle_ms),
                    },
                )
                .context("Could not compile legacy verdict patterns")?
                .with_session_tracker(session_closes.clone());
                adapters.push(Arc::new(adapter));
            }
        }
    }

    Ok(adapters)
}
