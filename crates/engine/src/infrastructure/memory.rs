//! In-memory repositories.
//!
//! Back the preview runner and tests. Chapters are keyed by id; messages are
//! bucketed per chapter and kept in send order.

use async_trait::async_trait;
use dashmap::DashMap;
use fabula_domain::{Chapter, ChapterId, CharacterId, Message, StoryId};

use crate::infrastructure::ports::{ChapterRepo, MessageRepo, RepoError};

#[derive(Default)]
pub struct InMemoryChapterRepo {
    chapters: DashMap<ChapterId, Chapter>,
}

impl InMemoryChapterRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChapterRepo for InMemoryChapterRepo {
    async fn get(&self, id: ChapterId) -> Result<Option<Chapter>, RepoError> {
        Ok(self.chapters.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, chapter: &Chapter) -> Result<(), RepoError> {
        self.chapters.insert(chapter.id(), chapter.clone());
        Ok(())
    }

    async fn list_for_story(&self, story_id: StoryId) -> Result<Vec<Chapter>, RepoError> {
        let mut chapters: Vec<Chapter> = self
            .chapters
            .iter()
            .filter(|entry| entry.story_id() == story_id)
            .map(|entry| entry.value().clone())
            .collect();
        chapters.sort_by(|a, b| {
            (a.published_at().is_none(), a.published_at(), a.title())
                .cmp(&(b.published_at().is_none(), b.published_at(), b.title()))
        });
        Ok(chapters)
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepo {
    by_chapter: DashMap<ChapterId, Vec<Message>>,
}

impl InMemoryMessageRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepo for InMemoryMessageRepo {
    async fn save(&self, message: &Message) -> Result<(), RepoError> {
        let mut bucket = self.by_chapter.entry(message.chapter_id()).or_default();
        bucket.retain(|existing| existing.id() != message.id());
        // Insert after every message sent at or before this one.
        let position = bucket.partition_point(|existing| existing.sent_at() <= message.sent_at());
        bucket.insert(position, message.clone());
        Ok(())
    }

    async fn list_for_chapter(&self, chapter_id: ChapterId) -> Result<Vec<Message>, RepoError> {
        Ok(self
            .by_chapter
            .get(&chapter_id)
            .map(|bucket| bucket.value().clone())
            .unwrap_or_default())
    }

    async fn list_for_character(
        &self,
        chapter_id: ChapterId,
        character_id: CharacterId,
    ) -> Result<Vec<Message>, RepoError> {
        Ok(self
            .by_chapter
            .get(&chapter_id)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|message| message.involves(character_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
