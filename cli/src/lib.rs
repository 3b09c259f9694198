pub mod cards_cmd;
pub mod config;
pub mod logging;

use anyhow::Result;
use cards_cmd::CardCommand;
use cards_cmd::CardsCommand;
use cards_cmd::ParamsCommand;
use clap::Parser;
use clap::Subcommand;
use config::CliConfig;
use std::path::PathBuf;

/// Browse and filter the lessoncraft technique-card catalog.
#[derive(Debug, Parser)]
#[command(name = "lessoncraft", version)]
pub struct Cli {
    /// TOML file with `[catalog]` and `[filter]` tables.
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug-level logging on stderr.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a filtered catalog search and print the matching cards.
    Cards(CardsCommand),
    /// Print the query parameters a filter selection compiles to.
    Params(ParamsCommand),
    /// Fetch a single card by id.
    Card(CardCommand),
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Cards(cmd) => cards_cmd::run_cards(cmd, config).await,
        Command::Params(cmd) => cards_cmd::run_params(cmd, config),
        Command::Card(cmd) => cards_cmd::run_card(cmd, config).await,
    }
}
