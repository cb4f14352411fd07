use clap::{Parser, Subcommand};

mod commands;

use commands::{CompareArgs, DescribeArgs, SimulateArgs, WatchArgs};

#[derive(Parser)]
#[command(name = "dont-pass")]
#[command(about = "Monte Carlo simulator for Don't Pass craps strategies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one session and print its statistics
    Simulate(SimulateArgs),
    /// Compare the configured strategy against presets over many sessions
    Compare(CompareArgs),
    /// Print the strategy in plain words
    Describe(DescribeArgs),
    /// Re-run a session whenever the config file changes
    Watch(WatchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Simulate(args) => commands::run_simulate(args).await?,
        Commands::Compare(args) => commands::run_compare(args).await?,
        Commands::Describe(args) => commands::run_describe(args).await?,
        Commands::Watch(args) => commands::run_watch(args).await?,
    }

    Ok(())
}
