use prpulse::migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

use crate::MigrateAction;

pub(crate) async fn handle_migrate(
    action: MigrateAction,
    db: &DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MigrateAction::Up => {
            let pending = Migrator::get_pending_migrations(db).await?;
            if pending.is_empty() {
                println!("Schema is up to date.");
                return Ok(());
            }
            Migrator::up(db, None).await?;
            tracing::info!(applied = pending.len(), "Migrations applied");
            for migration in &pending {
                println!("applied  {}", migration.name());
            }
        }
        MigrateAction::Down => {
            let applied = Migrator::get_applied_migrations(db).await?;
            let Some(latest) = applied.last() else {
                println!("Nothing to roll back.");
                return Ok(());
            };
            let name = latest.name().to_string();
            Migrator::down(db, Some(1)).await?;
            tracing::info!(migration = %name, "Migration rolled back");
            println!("reverted {name}");
        }
        MigrateAction::Status => {
            for migration in Migrator::get_applied_migrations(db).await? {
                println!("applied  {}", migration.name());
            }
            for migration in Migrator::get_pending_migrations(db).await? {
                println!("pending  {}", migration.name());
            }
        }
        MigrateAction::Fresh => {
            Migrator::fresh(db).await?;
            let count = Migrator::migrations().len();
            tracing::warn!(migrations = count, "Dropped all tables and reapplied migrations");
            println!("Recreated schema from {count} migration(s).");
        }
    }

    Ok(())
}
