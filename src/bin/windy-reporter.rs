use clap::Parser;
use windy_reporter::cli::{commands, Cli, Commands, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    windy_reporter::init_tracing(cli.log_format == LogFormat::Json);

    match cli.command {
        Commands::Run(args) => commands::execute_run(args).await?,
        Commands::Init(args) => commands::execute_init(args)?,
        Commands::Check(args) => commands::execute_check(args)?,
    }

    Ok(())
}
