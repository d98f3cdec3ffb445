use attar_app::{
    database::{self, Db},
    domain::checkouts::{PendingCheckoutsService, PgPendingCheckoutsService},
};
use clap::Args;
use jiff::Timestamp;

#[derive(Debug, Args)]
pub(crate) struct PurgeExpiredArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: PurgeExpiredArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgPendingCheckoutsService::new(Db::new(pool));

    let purged = service
        .purge_expired(Timestamp::now())
        .await
        .map_err(|error| format!("failed to purge expired checkouts: {error}"))?;

    println!("purged {purged} expired pending checkouts");

    Ok(())
}
