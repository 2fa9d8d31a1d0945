use prpulse::entity::review_comment_category::ReviewCommentCategory;
use prpulse::store::{count_comments_by_category, find_unclassified_review_comment_bodies};
use sea_orm::{DatabaseConnection, Iterable};

const UNCATEGORIZED: &str = "uncategorized";

pub(crate) async fn handle_categories(
    db: &DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let counts = count_comments_by_category(db).await?;
    let pending = find_unclassified_review_comment_bodies(db).await?;
    let shortcuts = shortcut_counts(&pending);
    let rows = summarize(&counts, &shortcuts);
    let total: i64 = rows.iter().map(|(_, count)| count).sum();

    println!("{:<16} {:>8}", "CATEGORY", "COMMENTS");
    for (category, count) in &rows {
        println!("{:<16} {:>8}", category, count);
    }
    println!("{:<16} {:>8}", "total", total);

    let resolved: i64 = shortcuts.iter().map(|(_, count)| count).sum();
    if resolved > 0 {
        println!("({resolved} unclassified line comment(s) counted by body shortcut)");
    }

    Ok(())
}

/// Categories that unclassified bodies resolve to without a classifier.
fn shortcut_counts(bodies: &[String]) -> Vec<(ReviewCommentCategory, i64)> {
    let mut counts: Vec<(ReviewCommentCategory, i64)> = Vec::new();
    for category in bodies
        .iter()
        .filter_map(|body| ReviewCommentCategory::shortcut_for(body))
    {
        match counts.iter_mut().find(|(known, _)| *known == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category, 1)),
        }
    }
    counts
}

/// One row per known category, zero-filled, followed by uncategorized
/// comments. Shortcut hits move from uncategorized to their category.
fn summarize(
    counts: &[(Option<ReviewCommentCategory>, i64)],
    shortcuts: &[(ReviewCommentCategory, i64)],
) -> Vec<(String, i64)> {
    let count_for = |wanted: Option<ReviewCommentCategory>| {
        counts
            .iter()
            .filter(|(category, _)| *category == wanted)
            .map(|(_, count)| count)
            .sum::<i64>()
    };
    let shortcut_count = |wanted: ReviewCommentCategory| {
        shortcuts
            .iter()
            .filter(|(category, _)| *category == wanted)
            .map(|(_, count)| count)
            .sum::<i64>()
    };
    let resolved: i64 = shortcuts.iter().map(|(_, count)| count).sum();

    ReviewCommentCategory::iter()
        .map(|category| {
            (
                category.to_string(),
                count_for(Some(category)) + shortcut_count(category),
            )
        })
        .chain(std::iter::once((
            UNCATEGORIZED.to_string(),
            (count_for(None) - resolved).max(0),
        )))
        .collect()
}
