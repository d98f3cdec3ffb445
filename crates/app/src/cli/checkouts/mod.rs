use clap::{Args, Subcommand};

mod purge_expired;

#[derive(Debug, Args)]
pub(crate) struct CheckoutsCommand {
    #[command(subcommand)]
    command: CheckoutsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CheckoutsSubcommand {
    PurgeExpired(purge_expired::PurgeExpiredArgs),
}

pub(crate) async fn run(command: CheckoutsCommand) -> Result<(), String> {
    match command.command {
        CheckoutsSubcommand::PurgeExpired(args) => purge_expired::run(args).await,
    }
}
