//! Single-session simulation command.
//!
//! Runs one session of the configured strategy and prints the bankroll
//! statistics, risk and streaks, and the opening shooter log.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

use dont_pass_core::StrategyConfig;
use dont_pass_simulation::{moving_average, SessionResult, SessionRunner, SessionStatistics};

use super::StrategyArgs;

/// Arguments for the simulate command.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub strategy: StrategyArgs,

    /// Dice seed for a reproducible session (overrides the config seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Write shooter,bankroll,moving_average rows to this CSV file
    #[arg(long)]
    pub history_csv: Option<String>,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

/// Everything a caller needs to render one finished session.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub description: String,
    pub strategy: StrategyConfig,
    pub seed: Option<u64>,
    pub statistics: SessionStatistics,
    /// Opening shooters only, capped by the report log limit.
    pub log_lines: Vec<String>,
}

impl SimulationReport {
    #[must_use]
    pub fn new(
        strategy: StrategyConfig,
        seed: Option<u64>,
        result: &SessionResult,
        log_limit: usize,
    ) -> Self {
        Self {
            description: strategy.describe(),
            strategy,
            seed,
            statistics: SessionStatistics::from_result(result),
            log_lines: result.log_lines.iter().take(log_limit).cloned().collect(),
        }
    }
}

/// Formats a dollar amount with the sign before the symbol.
pub fn money(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount.abs())
    }
}

/// Formats a session report as text.
pub fn format_text_report(report: &SimulationReport) -> String {
    let stats = &report.statistics;
    let mut output = String::new();

    output.push('\n');
    output.push_str("===============================================================\n");
    output.push_str("                  DON'T PASS SESSION RESULTS                   \n");
    output.push_str("===============================================================\n");
    output.push_str(&format!("Strategy: {}\n", report.description));
    output.push_str(&format!("Shooters: {}\n", stats.shooters));
    match report.seed {
        Some(seed) => output.push_str(&format!("Seed:     {seed}\n")),
        None => output.push_str("Seed:     (entropy)\n"),
    }
    output.push('\n');

    output.push_str("RESULTS\n");
    output.push_str("---------------------------------------------------------------\n");
    output.push_str(&format!("Final Bankroll:   {}\n", money(stats.final_bankroll)));
    output.push_str(&format!("Max Profit:       {}\n", money(stats.max_profit)));
    output.push_str(&format!("Lowest Point:     {}\n", money(stats.min_value)));
    output.push_str(&format!("Max Drawdown:     {}\n", money(stats.max_drawdown)));
    output.push_str(&format!("ROI:              {:.2}%\n", stats.roi));
    output.push_str(&format!("Win/Loss Ratio:   {}\n", stats.win_loss_ratio));
    output.push('\n');

    output.push_str("RISK & STREAKS\n");
    output.push_str("---------------------------------------------------------------\n");
    output.push_str(&format!("Total Risk:       {}\n", money(stats.total_risk)));
    output.push_str(&format!("Wins:             {}\n", stats.wins));
    output.push_str(&format!("Losses:           {}\n", stats.losses));
    if stats.pushes > 0 {
        output.push_str(&format!("Pushes:           {}\n", stats.pushes));
    }
    output.push_str(&format!("Max Win Streak:   {}\n", stats.max_win_streak));
    output.push_str(&format!("Max Loss Streak:  {}\n", stats.max_loss_streak));
    output.push('\n');

    if !report.log_lines.is_empty() {
        output.push_str(&format!(
            "SHOOTER LOG (first {} of {})\n",
            report.log_lines.len(),
            stats.shooters
        ));
        output.push_str("---------------------------------------------------------------\n");
        for (i, line) in report.log_lines.iter().enumerate() {
            output.push_str(&format!("{:>5}  {}\n", i + 1, line));
        }
        output.push('\n');
    }

    output.push_str("===============================================================\n");
    output
}

#[derive(Serialize)]
struct HistoryRow {
    shooter: usize,
    bankroll: Decimal,
    moving_average: Decimal,
}

/// Writes the bankroll path and its trailing moving average as CSV.
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_history_csv<W: Write>(writer: W, history: &[Decimal], window: usize) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let averages = moving_average(history, window);

    for (shooter, (&bankroll, &moving_average)) in history.iter().zip(&averages).enumerate() {
        wtr.serialize(HistoryRow {
            shooter,
            bankroll,
            moving_average: moving_average.round_dp(2),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Runs the simulate command.
pub async fn run_simulate(args: SimulateArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let (app, config) = args.strategy.resolve()?;
    let seed = args.seed.or(app.simulation.seed);

    tracing::info!("Strategy: {}", config.describe());
    tracing::info!("Shooters: {}", config.iterations());

    let session_config = config.clone();
    let result =
        tokio::task::spawn_blocking(move || SessionRunner::run_seeded(session_config, seed))
            .await??;

    if let Some(path) = &args.history_csv {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create history file {path}"))?;
        write_history_csv(file, &result.bankroll_history, app.report.moving_average_window)?;
        tracing::info!("Bankroll history written to {}", path);
    }

    let report = SimulationReport::new(config, seed, &result, app.report.log_limit);
    match format {
        OutputFormat::Text => print!("{}", format_text_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
