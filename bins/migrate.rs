use clap::{Parser, Subcommand};
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "migrate", about = "Apply or roll back the account schema")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Roll back all applied migrations
    Down,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = AppConfig::load_and_validate()?;
    common::utils::logging::init_logging_default(&cfg.log.level);

    let db = models::db::connect_with_config(&cfg.database).await?;
    match args.command {
        Command::Up => {
            Migrator::up(&db, None).await?;
            info!("migrations applied successfully");
        }
        Command::Down => {
            Migrator::down(&db, None).await?;
            info!("migrations rolled back successfully");
        }
    }
    Ok(())
}
