use prpulse::github::GitHubClient;
use prpulse::sync::backfill_sizes;
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::progress::logging_callback;

pub(crate) async fn handle_backfill(
    config: &Config,
    db: &DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = config.github_token()?;
    let options = config.sync_options();
    let client = GitHubClient::new(&token)?;
    let on_progress = logging_callback();

    println!("Backfilling pull request sizes...\n");
    let result = backfill_sizes(&client, db, &options, Some(&on_progress)).await?;

    println!("\nBackfill complete:");
    println!("  Missing size:   {}", result.checked);
    println!("  Updated:        {}", result.updated);
    println!("  Still unknown:  {}", result.still_missing);
    if !result.errors.is_empty() {
        println!("  Errors:         {}", result.errors.len());
        for error in &result.errors {
            println!("    - {}", error);
        }
    }

    Ok(())
}
