//! Database connection utilities.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

const SQLITE_PRAGMAS: [&str; 3] = [
    // Readers don't block the single writer
    "PRAGMA journal_mode=WAL",
    "PRAGMA busy_timeout=5000",
    // Safe with WAL
    "PRAGMA synchronous=NORMAL",
];

/// Apply SQLite pragmas suited to a single sequential writer.
async fn configure_sqlite(db: &DatabaseConnection) -> Result<(), DbErr> {
    for pragma in SQLITE_PRAGMAS {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            pragma.to_string(),
        ))
        .await?;
    }
    Ok(())
}

/// Whether pragmas should be applied for this URL.
///
/// In-memory databases (`sqlite::memory:`) are left alone.
fn is_sqlite_file_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite://")
}

/// Establish a connection to the database.
///
/// For file-backed SQLite databases, this also enables WAL mode, a 5 second
/// busy timeout and `synchronous=NORMAL`.
///
/// # Arguments
/// * `database_url` - e.g. `sqlite:///var/lib/prpulse/prpulse.db?mode=rwc` or `postgres:///prpulse`
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    if is_sqlite_file_url(database_url) {
        configure_sqlite(&db).await?;
    }

    Ok(db)
}

/// Establish a connection and apply all pending migrations.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established or migrations fail.
///
/// # Example
/// ```ignore
/// let db = prpulse::connect_and_migrate("sqlite::memory:").await?;
/// ```
#[cfg(feature = "migrate")]
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    use sea_orm_migration::MigratorTrait;

    let db = connect(database_url).await?;
    crate::migration::Migrator::up(&db, None).await?;
    Ok(db)
}
