use std::future::Future;
use std::time::Duration;

use crate::platform::{PlatformError, Result};
use crate::retry::execute_with_retry;
use crate::sync::progress::ProgressCallback;
use crate::sync::types::SyncOptions;

/// Sleep between successive remote calls.
pub(super) async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Collect every page of a listing, stopping at the first short page.
///
/// Each page request is retried on its own; pacing separates pages.
pub(super) async fn fetch_all_pages<T, F, Fut>(
    options: &SyncOptions,
    label: &str,
    on_progress: Option<&ProgressCallback>,
    mut fetch_page: F,
) -> Result<Vec<T>>
where
    F: FnMut(u32, u8) -> Fut,
    Fut: Future<Output = std::result::Result<Vec<T>, PlatformError>>,
{
    let per_page = options.per_page.max(1);
    let mut items = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = execute_with_retry(
            &options.retry,
            || fetch_page(page, per_page),
            label,
            on_progress,
        )
        .await?;

        let count = batch.len();
        items.extend(batch);
        if count < usize::from(per_page) {
            break;
        }

        page += 1;
        pace(options.request_delay).await;
    }

    Ok(items)
}
