//! Repository port traits for storage access.

use async_trait::async_trait;
use fabula_domain::{Chapter, ChapterId, CharacterId, Message, StoryId};

use super::error::RepoError;

// =============================================================================
// Chapters
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChapterRepo: Send + Sync {
    async fn get(&self, id: ChapterId) -> Result<Option<Chapter>, RepoError>;
    async fn save(&self, chapter: &Chapter) -> Result<(), RepoError>;

    /// Chapters of a story, published ones first in publication order.
    async fn list_for_story(&self, story_id: StoryId) -> Result<Vec<Chapter>, RepoError>;
}

// =============================================================================
// Messages
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepo: Send + Sync {
    async fn save(&self, message: &Message) -> Result<(), RepoError>;

    /// Every message on a chapter, oldest first.
    async fn list_for_chapter(&self, chapter_id: ChapterId) -> Result<Vec<Message>, RepoError>;

    /// Messages on a chapter that `character_id` sent or received, oldest first.
    async fn list_for_character(
        &self,
        chapter_id: ChapterId,
        character_id: CharacterId,
    ) -> Result<Vec<Message>, RepoError>;
}
