//! Chapter entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ChapterId, StoryId};
use crate::value_objects::Document;

/// One chapter of a story, as written by the narrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    id: ChapterId,
    story_id: StoryId,
    title: String,
    /// Full narrator-side content, restrictions included
    #[serde(default)]
    content: Document,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

impl Chapter {
    pub fn new(
        story_id: StoryId,
        title: impl Into<String>,
        content: Document,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("Chapter title cannot be empty"));
        }
        Ok(Self {
            id: ChapterId::new(),
            story_id,
            title,
            content,
            published_at: None,
        })
    }

    /// Reconstruct a chapter from storage.
    pub fn from_storage(
        id: ChapterId,
        story_id: StoryId,
        title: String,
        content: Document,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            story_id,
            title,
            content,
            published_at,
        }
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn id(&self) -> ChapterId {
        self.id
    }

    pub fn story_id(&self) -> StoryId {
        self.story_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &Document {
        &self.content
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}
