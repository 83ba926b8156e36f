use anyhow::{anyhow, bail, Result};
use tj_core::{ContentItem, Preferences};
use tj_inference::{create_annotator, AnalysisOrchestrator, AnalysisSnapshot, AnalysisState, InferenceConfig};
use tj_storage::Session;
use tracing::info;

use crate::Commands;

pub async fn run(command: Commands, session: &Session, inference: &InferenceConfig) -> Result<()> {
    match command {
        Commands::Feed {
            category,
            pages,
            refresh,
        } => {
            for page in 0..pages.max(1) {
                session
                    .feed()
                    .fetch_page(category.as_deref(), refresh && page == 0)
                    .await;
                if !session.feed().has_more() || session.feed().error().is_some() {
                    break;
                }
            }
            if let Some(err) = session.feed().error() {
                eprintln!("⚠️ {}", err);
            }
            print_items(&session.feed().items(), session);
        }
        Commands::Categories => {
            for category in session.feed().categories() {
                println!("{}", category);
            }
        }
        Commands::Saved => {
            require_user(session)?;
            print_items(&session.reading_list().items(), session);
        }
        Commands::Save { index, category } => {
            let item = feed_item(session, category.as_deref(), index).await?;
            session.save(&item).await?;
            check(session.reading_list().error())?;
            println!("🔖 Saved \"{}\"", item.title);
        }
        Commands::Unsave { index } => {
            require_user(session)?;
            let item = pick(&session.reading_list().items(), index)?;
            session.remove(&item).await?;
            check(session.reading_list().error())?;
            println!("🗑️ Removed \"{}\"", item.title);
        }
        Commands::Analyze { index, category, story } => {
            let item = feed_item(session, category.as_deref(), index).await?;
            let annotator = create_annotator(inference)?;
            info!("🧠 Using {} annotator", annotator.name());
            let orchestrator = AnalysisOrchestrator::new(annotator);

            let snapshot = if story {
                orchestrator.analyze_story(&story_for(&item, &session.feed().items())).await
            } else {
                orchestrator.analyze(&item).await
            };
            let snapshot = snapshot.ok_or_else(|| anyhow!("Analysis was superseded"))?;
            print_analysis(&item, &snapshot)?;
        }
        Commands::Related { index, category } => {
            let item = feed_item(session, category.as_deref(), index).await?;
            let candidates: Vec<ContentItem> = session
                .feed()
                .items()
                .into_iter()
                .filter(|candidate| candidate.id() != item.id())
                .collect();
            let annotator = create_annotator(inference)?;
            let mut related = annotator.find_related(&item, &candidates).await?;
            related.sort_by(|a, b| b.score.total_cmp(&a.score));
            for entry in related {
                println!("{:>5.2}  {}", entry.score, entry.item.title);
            }
        }
        Commands::Prefs {
            theme,
            text_size,
            notifications,
            categories,
        } => {
            require_user(session)?;
            let current = session.preferences().unwrap_or_default();
            let updated = Preferences {
                theme: theme.unwrap_or(current.theme),
                text_size: text_size.unwrap_or(current.text_size),
                notifications_enabled: notifications.unwrap_or(current.notifications_enabled),
                selected_categories: if categories.is_empty() {
                    current.selected_categories.clone()
                } else {
                    categories.into_iter().collect()
                },
            };
            if updated != current {
                session.update_preferences(updated).await?;
                info!("⚙️ Preferences updated");
            }
            let prefs = session.preferences().unwrap_or_default();
            println!("theme:         {:?}", prefs.theme);
            println!("text size:     {}", prefs.text_size);
            println!("notifications: {}", prefs.notifications_enabled);
            let categories: Vec<&str> = prefs.selected_categories.iter().map(String::as_str).collect();
            println!("categories:    {}", categories.join(", "));
        }
    }
    Ok(())
}

fn require_user(session: &Session) -> Result<()> {
    session.user_id()?;
    Ok(())
}

fn check(error: Option<tj_core::Error>) -> Result<()> {
    match error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn pick(items: &[ContentItem], index: usize) -> Result<ContentItem> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or_else(|| anyhow!("No item at position {} ({} available)", index, items.len()))
}

/// Items are addressed by their position in the first feed page.
async fn feed_item(session: &Session, category: Option<&str>, index: usize) -> Result<ContentItem> {
    session.feed().fetch_page(category, true).await;
    check(session.feed().error())?;
    pick(&session.feed().items(), index)
}

/// Loaded items from the same source as `item`, oldest first.
fn story_for(item: &ContentItem, items: &[ContentItem]) -> Vec<ContentItem> {
    let mut story: Vec<ContentItem> = items
        .iter()
        .filter(|candidate| candidate.source_name == item.source_name && candidate.published_at <= item.published_at)
        .cloned()
        .collect();
    story.sort_by_key(|candidate| candidate.published_at);
    story
}

fn print_items(items: &[ContentItem], session: &Session) {
    if items.is_empty() {
        println!("No items");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        let marker = if session.reading_list().contains(&item.id()) { "🔖" } else { "  " };
        println!(
            "{:>3}. {} {}  [{}] {} ({})",
            i + 1,
            marker,
            item.published_at.format("%Y-%m-%d"),
            item.category,
            item.title,
            item.source_name
        );
    }
}

fn print_analysis(item: &ContentItem, snapshot: &AnalysisSnapshot) -> Result<()> {
    let results = match &snapshot.state {
        AnalysisState::Complete(results) => results,
        AnalysisState::Failed(err) => bail!("Analysis failed: {}", err),
        state => bail!("Analysis did not finish: {:?}", state),
    };

    println!("{}\n", item.title);
    println!(
        "Bias: {:+.2} ({:?}, {:.0}% confidence)",
        results.bias.level,
        results.bias.leaning(),
        results.bias.confidence * 100.0
    );
    println!("  {}\n", results.bias.reasoning);
    println!("Summary:\n  {}\n", results.summary.text);
    println!("Story trajectory ({:.0}% confidence):", results.trajectory.confidence * 100.0);
    for step in &results.trajectory.evolution {
        println!("  • {}", step);
    }
    if !results.trajectory.perspective_shifts.is_empty() {
        println!("Perspective shifts:");
        for shift in &results.trajectory.perspective_shifts {
            println!("  • {}", shift);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tj_core::{Theme, UserIdentity};
    use tj_storage::backends::memory::demo_items;
    use tj_storage::InMemoryGateway;

    fn offline() -> InferenceConfig {
        InferenceConfig {
            model: "dummy".to_string(),
            ..InferenceConfig::default()
        }
    }

    async fn signed_in() -> Session {
        let session = Session::new(Arc::new(InMemoryGateway::with_demo_items()));
        session.sign_in(UserIdentity::new("user-1")).await.unwrap();
        session
    }

    #[test]
    fn test_pick_is_one_based() {
        let items = demo_items();
        assert_eq!(pick(&items, 1).unwrap(), items[0]);
        assert!(pick(&items, 0).is_err());
        assert!(pick(&items, 4).is_err());
    }

    #[test]
    fn test_story_for_keeps_earlier_items_in_order() {
        let items = demo_items();
        let newest = items.iter().max_by_key(|i| i.published_at).unwrap();
        let story = story_for(newest, &items);
        assert_eq!(story.len(), 3);
        assert!(story[0].published_at < story[2].published_at);
    }

    #[tokio::test]
    async fn test_save_and_unsave_commands() {
        let session = signed_in().await;
        run(Commands::Save { index: 1, category: None }, &session, &offline())
            .await
            .unwrap();
        assert_eq!(session.reading_list().items().len(), 1);

        run(Commands::Unsave { index: 1 }, &session, &offline()).await.unwrap();
        assert!(session.reading_list().items().is_empty());
    }

    #[tokio::test]
    async fn test_feed_refresh_restarts_exhausted_feed() {
        let session = signed_in().await;
        let feed = |pages, refresh| Commands::Feed {
            category: None,
            pages,
            refresh,
        };

        run(feed(2, false), &session, &offline()).await.unwrap();
        assert_eq!(session.feed().items().len(), 3);
        assert!(!session.feed().has_more());

        run(feed(1, false), &session, &offline()).await.unwrap();
        assert_eq!(session.feed().page(), 3);

        run(feed(1, true), &session, &offline()).await.unwrap();
        assert_eq!(session.feed().items().len(), 3);
        assert!(session.feed().has_more());
        assert_eq!(session.feed().page(), 2);
    }

    #[tokio::test]
    async fn test_save_requires_sign_in() {
        let session = Session::new(Arc::new(InMemoryGateway::with_demo_items()));
        let result = run(Commands::Save { index: 1, category: None }, &session, &offline()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_analyze_command_offline() {
        let session = signed_in().await;
        let command = Commands::Analyze {
            index: 1,
            category: None,
            story: true,
        };
        run(command, &session, &offline()).await.unwrap();
    }

    #[tokio::test]
    async fn test_prefs_command_updates_preferences() {
        let session = signed_in().await;
        let command = Commands::Prefs {
            theme: Some(Theme::Light),
            text_size: None,
            notifications: Some(false),
            categories: vec!["Science".to_string()],
        };
        run(command, &session, &offline()).await.unwrap();

        let prefs = session.preferences().unwrap();
        assert_eq!(prefs.theme, Theme::Light);
        assert!(!prefs.notifications_enabled);
        assert!(prefs.selected_categories.contains("Science"));
    }
}
