//! Fabula preview - print what one reader sees of a story snapshot.

use anyhow::Context;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fabula_engine::config::{load_dotenv_from_repo_root, EngineConfig};
use fabula_engine::infrastructure::snapshot::load_snapshot;
use fabula_engine::use_cases::Reader;
use fabula_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fabula_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig::from_env()?;
    tracing::info!(
        snapshot = %config.snapshot_path.display(),
        reader = %config.reader,
        "Starting Fabula preview"
    );

    let app = App::in_memory(config.feed.clone());
    let summary = load_snapshot(
        &config.snapshot_path,
        app.repositories.chapters.as_ref(),
        app.repositories.messages.as_ref(),
    )
    .await
    .with_context(|| format!("loading {}", config.snapshot_path.display()))?;

    let mut chapters = Vec::with_capacity(summary.chapters.len());
    for chapter_id in &summary.chapters {
        let view = app
            .use_cases
            .chapter
            .view
            .execute(*chapter_id, config.reader)
            .await?;
        let threads = app
            .use_cases
            .chapter
            .interactions
            .execute(*chapter_id, config.reader)
            .await?;
        chapters.push(json!({ "view": view, "interactions": threads }));
    }

    let mut feeds = Vec::new();
    if let Reader::Character(character_id) = config.reader {
        for story_id in &summary.stories {
            let feed = app
                .use_cases
                .feed
                .character_feed
                .execute(*story_id, character_id)
                .await?;
            feeds.push(feed);
        }
    }

    let output = json!({
        "reader": config.reader.to_string(),
        "chapters": chapters,
        "feeds": feeds,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
