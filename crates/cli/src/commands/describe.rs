//! Prints the strategy sentence and the per-point table.

use anyhow::Result;
use clap::Args;

use dont_pass_core::{Point, PointBehavior, StrategyConfig};

use super::simulate::money;
use super::StrategyArgs;

/// Arguments for the describe command.
#[derive(Args, Debug, Clone)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub strategy: StrategyArgs,
}

/// One line per point: behavior, wager in action, and odds laid.
pub fn format_point_table(config: &StrategyConfig) -> String {
    let mut output = String::new();
    output.push_str("Point  Behavior  Wager      Odds Laid\n");
    output.push_str("-----  --------  ---------  ---------\n");

    for point in Point::ALL {
        let behavior = config.behavior(point);
        let (wager, odds) = match behavior {
            PointBehavior::Keep => (config.base_bet(), None),
            PointBehavior::Lower => (config.reduced_bet(), None),
            PointBehavior::Odds => (
                config.base_bet(),
                Some(config.base_bet() * config.odds_multiplier()),
            ),
        };
        output.push_str(&format!(
            "{:<5}  {:<8}  {:<9}  {}\n",
            point.value(),
            behavior.as_str(),
            money(wager),
            odds.map_or_else(|| "-".to_string(), money)
        ));
    }
    output
}

/// Runs the describe command.
pub async fn run_describe(args: DescribeArgs) -> Result<()> {
    let (_, config) = args.strategy.resolve()?;

    println!("{}", config.describe());
    println!();
    print!("{}", format_point_table(&config));
    println!();
    println!(
        "Shooters per session: {}   Lay payout: {}",
        config.iterations(),
        config.odds_payout()
    );

    Ok(())
}
