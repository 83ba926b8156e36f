use chrono::{TimeZone, Utc};
use tj_core::ContentItem;
use url::Url;

/// Three articles following one story, oldest first.
pub fn story() -> Vec<ContentItem> {
    [
        (1, "AI Breakthrough: New Model Shows Human-Like Understanding", "Sarah Chen"),
        (2, "AI Ethics Board Raises Concerns Over New Model", "Michael Roberts"),
        (3, "Industry Leaders Respond to AI Breakthrough", "David Kim"),
    ]
    .into_iter()
    .map(|(day, title, author)| ContentItem {
        title: title.to_string(),
        category: "Technology".to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
        author: author.to_string(),
        image_url: None,
        summary: format!("{}. More details follow. Experts weigh in.", title),
        source_name: "Tech Insights Daily".to_string(),
        source_url: Url::parse(&format!("https://techinsights.example.com/{}", day)).unwrap(),
    })
    .collect()
}
