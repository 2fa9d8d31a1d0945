use std::time::Duration;

use prpulse::github::GitHubClient;
use prpulse::sync::{SyncResult, sync_repository};
use sea_orm::DatabaseConnection;

use crate::SyncArgs;
use crate::config::Config;
use crate::progress::logging_callback;

pub(crate) async fn handle_sync(
    args: SyncArgs,
    config: &Config,
    db: &DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = config.github_token()?;
    let (owner, name) = config.repository(args.owner, args.name)?;

    let mut options = config.sync_options();
    if args.no_details {
        options.fetch_details = false;
    }
    if let Some(delay_ms) = args.request_delay_ms {
        options.request_delay = Duration::from_millis(delay_ms);
    }

    let client = GitHubClient::new(&token)?;
    let on_progress = logging_callback();

    println!("Syncing pull requests for {}/{}...\n", owner, name);
    let result = sync_repository(&client, db, &owner, &name, &options, Some(&on_progress)).await?;
    print_summary(&result);

    Ok(())
}

fn print_summary(result: &SyncResult) {
    println!("\nSync complete:");
    println!("  Pages fetched:          {}", result.pages);
    println!("  Pull requests saved:    {}", result.pull_requests);
    println!("  Pull requests reviewed: {}", result.activity_synced);
    println!("  Reviews saved:          {}", result.reviews);
    println!("  Comments saved:         {}", result.comments);
    println!("  Author comments skipped: {}", result.skipped_comments);
    match result.watermark {
        Some(watermark) => println!("  Synced up to:           {}", watermark),
        None => println!("  Synced up to:           (unchanged)"),
    }

    if !result.is_clean() {
        println!("\n{} pull request(s) failed and will be retried next run:", result.errors.len());
        for error in &result.errors {
            println!("  - {}", error);
        }
    }
}
