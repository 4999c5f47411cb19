use clap::Parser;
use colored::*;

use report_rollup::RollupConfig;
use report_rollup::cli::{Cli, Commands, commands};

fn main() {
    // Load .env before reading REPORT_ROLLUP_CONFIG or RUST_LOG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = RollupConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Sheets(args) => commands::sheets::execute(args, &config),
        Commands::Build(args) => commands::build::execute(args, &config),
    }
}
