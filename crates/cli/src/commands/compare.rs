//! Monte Carlo strategy comparison command.
//!
//! Plays the configured strategy and a set of presets over the same dice
//! seeds and tabulates the distribution of outcomes.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dont_pass_core::{StrategyConfig, StrategyPreset};
use dont_pass_simulation::{MonteCarloConfig, MonteCarloRunner, StrategyComparison};

use super::simulate::{money, OutputFormat};
use super::StrategyArgs;

/// Arguments for the compare command.
#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub strategy: StrategyArgs,

    /// Sessions per strategy
    #[arg(long, default_value = "1000")]
    pub sessions: usize,

    /// Presets to compare against, comma separated (default: all presets)
    #[arg(long, value_delimiter = ',')]
    pub against: Vec<String>,

    /// Master seed shared by all strategies (overrides the config seed)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct ComparisonReport {
    master_seed: u64,
    n_sessions: usize,
    strategies: Vec<StrategyComparison>,
}

/// Builds the named strategy list: the configured one first, then each
/// preset with the same bet sizes and shooter count.
pub fn build_strategies(
    configured: &StrategyConfig,
    against: &[String],
) -> Result<Vec<(String, StrategyConfig)>> {
    let presets = if against.is_empty() {
        StrategyPreset::ALL.to_vec()
    } else {
        against
            .iter()
            .map(|name| name.parse::<StrategyPreset>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut strategies = vec![("configured".to_string(), configured.clone())];
    for preset in presets {
        let config = configured.to_builder().preset(preset).build()?;
        strategies.push((preset.name().to_string(), config));
    }
    Ok(strategies)
}

/// Formats comparison rows as a text table.
pub fn format_comparison_table(rows: &[StrategyComparison], master_seed: u64) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("=====================================================================================================\n");
    output.push_str("                                DON'T PASS STRATEGY COMPARISON\n");
    output.push_str("=====================================================================================================\n");
    if let Some(first) = rows.first() {
        output.push_str(&format!(
            "Sessions: {} x {} shooters   Master seed: {}\n",
            first.n_sessions, first.iterations, master_seed
        ));
    }
    output.push('\n');

    output.push_str(&format!(
        "{:<14} {:>12} {:>12} {:>12} {:>12} {:>10} {:>9} {:>12} {:>6}\n",
        "Strategy", "Mean Final", "Median", "P5", "P95", "P(Profit)", "Mean ROI", "Mean MaxDD", "Streak"
    ));
    output.push_str("-----------------------------------------------------------------------------------------------------\n");
    for row in rows {
        output.push_str(&format!(
            "{:<14} {:>12} {:>12} {:>12} {:>12} {:>9.1}% {:>8.2}% {:>12} {:>6}\n",
            row.name,
            money(row.final_bankroll.mean.round_dp(2)),
            money(row.final_bankroll.median),
            money(row.final_bankroll.percentile(0.05)),
            money(row.final_bankroll.percentile(0.95)),
            row.prob_profit * 100.0,
            row.mean_roi,
            money(row.max_drawdown.mean.round_dp(2)),
            row.worst_loss_streak,
        ));
    }
    output.push('\n');

    output.push_str("STRATEGIES\n");
    output.push_str("-----------------------------------------------------------------------------------------------------\n");
    for row in rows {
        output.push_str(&format!("{:<14} {}\n", row.name, row.description));
    }
    output.push_str("=====================================================================================================\n");
    output
}

/// Runs the compare command.
pub async fn run_compare(args: CompareArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let (app, configured) = args.strategy.resolve()?;
    let strategies = build_strategies(&configured, &args.against)?;

    let mut mc_config = MonteCarloConfig::new(args.sessions);
    if let Some(seed) = args.seed.or(app.simulation.seed) {
        mc_config = mc_config.with_seed(seed);
    }
    let runner = MonteCarloRunner::new(mc_config);
    let master_seed = runner.master_seed();

    tracing::info!(
        "Comparing {} strategies over {} sessions (seed {})",
        strategies.len(),
        args.sessions,
        master_seed
    );

    let rows = tokio::task::spawn_blocking(move || runner.compare(&strategies)).await??;

    match format {
        OutputFormat::Text => print!("{}", format_comparison_table(&rows, master_seed)),
        OutputFormat::Json => {
            let report = ComparisonReport {
                master_seed,
                n_sessions: args.sessions,
                strategies: rows,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dont_pass_core::{Point, PointBehavior};
    use rust_decimal_macros::dec;

    fn configured() -> StrategyConfig {
        StrategyConfig::builder()
            .iterations(40)
            .base_bet(dec!(25))
            .build()
            .unwrap()
    }

    #[test]
    fn build_strategies_defaults_to_all_presets() {
        let strategies = build_strategies(&configured(), &[]).unwrap();
        assert_eq!(strategies.len(), StrategyPreset::ALL.len() + 1);
        assert_eq!(strategies[0].0, "configured");
    }

    #[test]
    fn build_strategies_keeps_bet_sizes() {
        let against = vec!["lay-all".to_string()];
        let strategies = build_strategies(&configured(), &against).unwrap();
        let (name, config) = &strategies[1];
        assert_eq!(name, "lay-all");
        assert_eq!(config.base_bet(), dec!(25));
        assert_eq!(config.iterations(), 40);
        assert_eq!(config.behavior(Point::Six), PointBehavior::Odds);
    }

    #[test]
    fn build_strategies_rejects_unknown_preset() {
        let against = vec!["martingale".to_string()];
        assert!(build_strategies(&configured(), &against).is_err());
    }

    #[test]
    fn comparison_table_lists_every_strategy() {
        let against = vec!["flat".to_string(), "lower-all".to_string()];
        let strategies = build_strategies(&configured(), &against).unwrap();
        let runner = MonteCarloRunner::new(MonteCarloConfig::new(5).with_seed(2));
        let rows = runner.compare(&strategies).unwrap();

        let table = format_comparison_table(&rows, 2);
        assert!(table.contains("Sessions: 5 x 40 shooters   Master seed: 2"));
        for name in ["configured", "flat", "lower-all"] {
            assert!(table.contains(name));
        }
        assert!(table.contains("Bet $25 on Don't Pass each come-out."));
    }
}
