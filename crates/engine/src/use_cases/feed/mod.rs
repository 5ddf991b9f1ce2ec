//! Per-character activity feed.
//!
//! Turns the threads a character takes part in, across every published
//! chapter of a story, into feed items a reader app can poll.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fabula_domain::{build_threads, ChapterId, CharacterId, Participant, StoryId, Thread};
use serde::Serialize;

use crate::infrastructure::ports::{ChapterRepo, ClockPort, MessageRepo, RepoError};

const SUMMARY_MAX_CHARS: usize = 280;

/// Container for feed use cases.
pub struct FeedUseCases {
    pub character_feed: Arc<BuildCharacterFeed>,
}

impl FeedUseCases {
    pub fn new(character_feed: Arc<BuildCharacterFeed>) -> Self {
        Self { character_feed }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Prefix for item links, without a trailing slash.
    pub base_url: String,
    pub max_items: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            max_items: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub title: String,
    pub story_id: StoryId,
    pub character_id: CharacterId,
    pub generated_at: DateTime<Utc>,
    /// Newest first.
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Stable across rebuilds: chapter id plus thread key.
    pub guid: String,
    pub title: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub summary: String,
    pub chapter_id: ChapterId,
    pub participants: Vec<Participant>,
}

pub struct BuildCharacterFeed {
    chapters: Arc<dyn ChapterRepo>,
    messages: Arc<dyn MessageRepo>,
    clock: Arc<dyn ClockPort>,
    config: FeedConfig,
}

impl BuildCharacterFeed {
    pub fn new(
        chapters: Arc<dyn ChapterRepo>,
        messages: Arc<dyn MessageRepo>,
        clock: Arc<dyn ClockPort>,
        config: FeedConfig,
    ) -> Self {
        Self {
            chapters,
            messages,
            clock,
            config,
        }
    }

    /// Build the feed for `character_id` in `story_id`.
    ///
    /// Drafts are skipped. Each thread the character is in becomes one item,
    /// dated by the thread's last message; only the newest `max_items` are kept.
    pub async fn execute(
        &self,
        story_id: StoryId,
        character_id: CharacterId,
    ) -> Result<Feed, FeedError> {
        let chapters = self.chapters.list_for_story(story_id).await?;

        let mut items = Vec::new();
        for chapter in chapters.iter().filter(|c| c.is_published()) {
            let messages = self
                .messages
                .list_for_character(chapter.id(), character_id)
                .await?;
            for thread in build_threads(messages) {
                items.push(self.item_for(chapter.id(), chapter.title(), &thread));
            }
        }

        // Stable, so threads active at the same instant keep chapter order.
        items.sort_by(|a, b| b.published.cmp(&a.published));
        items.truncate(self.config.max_items);

        tracing::info!(
            story_id = %story_id,
            character_id = %character_id,
            items = items.len(),
            "Built character feed"
        );

        Ok(Feed {
            title: format!("Story {} for character {}", story_id, character_id),
            story_id,
            character_id,
            generated_at: self.clock.now(),
            items,
        })
    }

    fn item_for(&self, chapter_id: ChapterId, chapter_title: &str, thread: &Thread) -> FeedItem {
        let summary = thread
            .messages()
            .last()
            .map(|message| truncate_chars(message.body(), SUMMARY_MAX_CHARS))
            .unwrap_or_default();

        FeedItem {
            guid: format!("{}:{}", chapter_id, thread.key()),
            title: format!("{} ({})", chapter_title, participant_names(thread.participants())),
            link: format!(
                "{}/chapters/{}#thread-{}",
                self.config.base_url.trim_end_matches('/'),
                chapter_id,
                thread.key()
            ),
            published: thread.last_activity(),
            summary,
            chapter_id,
            participants: thread.participants().to_vec(),
        }
    }
}

fn participant_names(participants: &[Participant]) -> String {
    participants
        .iter()
        .map(|p| match p {
            Participant::Narrator => "narrator".to_string(),
            Participant::Character(id) => format!("#{}", id),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
