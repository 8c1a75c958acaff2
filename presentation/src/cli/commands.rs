//! CLI command definitions

use clap::{Parser, ValueEnum};
use schedule_domain::{AdapterId, DomainError, Scenario, Selection, find_scenario};
use std::path::PathBuf;

/// Output format for consensus results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored per-adapter breakdown
    Full,
    /// Raw report JSON
    Json,
    /// Markdown summary table and discrepancy documents
    Markdown,
}

impl From<OutputFormat> for schedule_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => schedule_domain::OutputFormat::Full,
            OutputFormat::Json => schedule_domain::OutputFormat::Json,
            OutputFormat::Markdown => schedule_domain::OutputFormat::Markdown,
        }
    }
}

/// What the invocation asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Print the fixture catalog
    List,
    /// Run every fixture
    Suite,
    /// Run one scenario (fixture or ad-hoc)
    Single(Box<Scenario>),
}

/// CLI arguments for schedule-quorum
#[derive(Parser, Debug)]
#[command(name = "schedule-quorum")]
#[command(author, version, about = "Weekly schedule validation with multi-source consensus")]
#[command(long_about = r#"
schedule-quorum runs the same weekly day selection through several validator
implementations and compares their verdicts.

Adapters:
  golden   In-process reference rules (always available)
  backend  Deployed validation workflow over HTTP ([backend] url)
  legacy   Legacy calendar page through WebDriver ([legacy] webdriver_url, page_url)

APPROVE and REJECT need every adapter to agree. Anything else is ESCALATE,
and a discrepancy report is written for follow-up.

Configuration files are loaded from (in priority order):
1. SCHEDULE_QUORUM_* environment variables
2. --config <path>                              Explicit config file
3. ./schedule-quorum.toml                       Project-level config
4. ~/.config/schedule-quorum/config.toml        Global config

Example:
  schedule-quorum fri-mon-wrap
  schedule-quorum --days fri,sat,sun,mon --expect-nights 3
  schedule-quorum --all -a golden -a backend -o markdown
"#)]
pub struct Cli {
    /// Fixture scenario id (see --list)
    #[arg(conflicts_with_all = ["days", "all", "list"])]
    pub scenario: Option<String>,

    /// Ad-hoc selection: day names or indices (0 = Sunday), comma separated
    #[arg(short, long, value_name = "DAYS", conflicts_with_all = ["all", "list"])]
    pub days: Option<String>,

    /// Expected night count for an ad-hoc selection
    #[arg(long, value_name = "N", requires = "days")]
    pub expect_nights: Option<u32>,

    /// Expected validity for an ad-hoc selection
    #[arg(long, value_name = "BOOL", requires = "days")]
    pub expect_valid: Option<bool>,

    /// Run every fixture scenario
    #[arg(long, conflicts_with = "list")]
    pub all: bool,

    /// List fixture scenarios and exit
    #[arg(long)]
    pub list: bool,

    /// Adapters to run (can be specified multiple times; default from config)
    #[arg(short, long, value_name = "ADAPTER")]
    pub adapter: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Directory for discrepancy reports (overrides [reports] dir)
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Resolve the run mode; `None` when nothing to run was given
    pub fn mode(&self) -> Result<Option<RunMode>, DomainError> {
        if self.list {
            return Ok(Some(RunMode::List));
        }
        if self.all {
            return Ok(Some(RunMode::Suite));
        }
        if let Some(days) = &self.days {
            let selection = Selection::parse_list(days)?;
            let scenario = Scenario::new(format!("adhoc-{}", slug(&selection)), selection)
                .with_expected_nights(self.expect_nights)
                .with_expected_valid(self.expect_valid)
                .with_description("Ad-hoc selection from the command line");
            return Ok(Some(RunMode::Single(Box::new(scenario))));
        }
        if let Some(id) = &self.scenario {
            return Ok(Some(RunMode::Single(Box::new(find_scenario(id)?))));
        }
        Ok(None)
    }

    /// Adapters named on the command line
    pub fn adapter_ids(&self) -> Result<Vec<AdapterId>, DomainError> {
        let mut ids = Vec::new();
        for name in &self.adapter {
            let id = name.parse::<AdapterId>()?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

fn slug(selection: &Selection) -> String {
    if selection.is_empty() {
        return "none".to_string();
    }
    selection
        .iter()
        .map(|d| d.short_name().to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
