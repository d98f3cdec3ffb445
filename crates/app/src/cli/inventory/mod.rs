use attar::ids::PerfumeUuid;
use attar_app::{
    database::{self, Db},
    domain::inventory::{InventoryService, PgInventoryService, models::InventoryLogEntry},
};
use clap::{Args, Subcommand};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct InventoryCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: InventorySubcommand,
}

#[derive(Debug, Subcommand)]
enum InventorySubcommand {
    /// Set a perfume's stock to an absolute quantity
    Adjust(AdjustArgs),

    /// Add received units to a perfume's stock
    Add(AddArgs),

    /// Show a perfume's stock record and audit log
    Show(ShowArgs),
}

#[derive(Debug, Args)]
struct AdjustArgs {
    #[arg(long)]
    perfume_uuid: Uuid,

    /// New absolute quantity
    #[arg(long, allow_negative_numbers = true)]
    quantity: i64,

    #[arg(long, default_value = "Manual adjustment")]
    reason: String,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    perfume_uuid: Uuid,

    /// Units received
    #[arg(long)]
    quantity: u32,

    #[arg(long, default_value = "Stock received")]
    reason: String,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[arg(long)]
    perfume_uuid: Uuid,
}

pub(crate) async fn run(command: InventoryCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or_else(|| "DATABASE_URL is required".to_string())?;

    let pool = database::connect(&database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgInventoryService::new(Db::new(pool));

    match command.command {
        InventorySubcommand::Adjust(args) => {
            let entry = service
                .adjust_stock(PerfumeUuid::from(args.perfume_uuid), args.quantity, args.reason)
                .await
                .map_err(|error| format!("failed to adjust stock: {error}"))?;

            print_entry(&entry);
        }
        InventorySubcommand::Add(args) => {
            let entry = service
                .add_stock(PerfumeUuid::from(args.perfume_uuid), args.quantity, args.reason)
                .await
                .map_err(|error| format!("failed to add stock: {error}"))?;

            print_entry(&entry);
        }
        InventorySubcommand::Show(args) => {
            let perfume = PerfumeUuid::from(args.perfume_uuid);

            let record = service
                .get_record(perfume)
                .await
                .map_err(|error| format!("failed to load stock record: {error}"))?;

            let entries = service
                .list_log(perfume)
                .await
                .map_err(|error| format!("failed to load stock log: {error}"))?;

            println!("perfume_uuid: {}", record.perfume);
            println!("stock_quantity: {}", record.stock_quantity);
            println!("low_stock_threshold: {}", record.low_stock_threshold);
            println!("stock_level: {:?}", record.level());
            println!("updated_at: {}", record.updated_at);
            println!();

            for entry in &entries {
                print_entry(entry);
            }
        }
    }

    Ok(())
}

fn print_entry(entry: &InventoryLogEntry) {
    println!("log_uuid: {}", entry.uuid);
    println!("change_type: {}", entry.change_type);
    println!(
        "quantity: {} -> {} ({:+})",
        entry.quantity_before, entry.quantity_after, entry.quantity_change
    );
    println!("reason: {}", entry.reason);
    println!("created_at: {}", entry.created_at);
    println!();
}
