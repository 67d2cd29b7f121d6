//! Command line arguments.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use salesboard_engine::ReportParams;
use salesboard_reports::ReportKind;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "salesboard")]
#[command(about = "Sales performance reports over a dataset snapshot")]
#[command(version)]
pub struct Cli {
    /// Configuration file path (TOML or YAML)
    #[arg(short, long, env = "SALESBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dataset snapshot (JSON); overrides the configured path
    #[arg(short, long)]
    pub dataset: Option<PathBuf>,

    /// Pin "today" instead of reading the system clock
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    /// Report to generate
    #[arg(value_parser = parse_report)]
    pub report: ReportKind,

    /// Inclusive window start
    #[arg(long)]
    pub start_date: Option<String>,

    /// Inclusive window end
    #[arg(long)]
    pub end_date: Option<String>,

    /// Bucket width: day, week, month, quarter or year
    #[arg(long)]
    pub interval: Option<String>,

    /// Restrict to one user's sales
    #[arg(long)]
    pub user_id: Option<String>,

    /// Restrict to sales by members of one group
    #[arg(long)]
    pub group_id: Option<String>,

    /// `all` or a single metric field
    #[arg(long)]
    pub metric: Option<String>,

    /// Maximum number of rows (user-performance)
    #[arg(long)]
    pub limit: Option<String>,

    /// Pretty-print the JSON response
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub pretty: bool,
}

impl Cli {
    /// Report parameters exactly as supplied. Validation happens in the engine.
    pub fn params(&self) -> ReportParams {
        ReportParams {
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            interval: self.interval.clone(),
            user_id: self.user_id.clone(),
            group_id: self.group_id.clone(),
            metric: self.metric.clone(),
            limit: self.limit.clone(),
        }
    }
}

fn parse_report(raw: &str) -> Result<ReportKind, String> {
    raw.parse::<ReportKind>().map_err(|_| {
        let known: Vec<&str> = ReportKind::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("expected one of: {}", known.join(", "))
    })
}
