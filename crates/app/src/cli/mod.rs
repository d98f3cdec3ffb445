use clap::{Parser, Subcommand};

mod checkouts;
mod db;
mod inventory;

#[derive(Debug, Parser)]
#[command(name = "attar-app", about = "Attar CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Checkouts(checkouts::CheckoutsCommand),
    Inventory(inventory::InventoryCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Checkouts(command) => checkouts::run(command).await,
            Commands::Inventory(command) => inventory::run(command).await,
        }
    }
}
