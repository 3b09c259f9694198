use clap::Parser;
use lessoncraft_cli::Cli;
use lessoncraft_cli::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(logging::Verbosity::from_flags(cli.verbose, cli.quiet));
    lessoncraft_cli::run(cli).await
}
