//! Load an exported story snapshot into repositories.
//!
//! A snapshot is the JSON the web app exports for a story:
//!
//! ```json
//! {
//!   "chapters": [{"id": "...", "storyId": "...", "title": "...", "content": {"type": "doc"}, "publishedAt": "..."}],
//!   "messages": [{"id": "...", "chapterId": "...", "sender": 1, "recipients": [2], "body": "...", "sentAt": "..."}]
//! }
//! ```
//!
//! Records are validated on the way in: documents must have a document root,
//! messages need an id and a timestamp that parses. Loading the same file
//! twice leaves the repositories unchanged.

use std::path::Path;

use fabula_domain::{
    common::parse_datetime, Chapter, ChapterId, CharacterId, DomainError, Document, Message,
    MessageId, StoryId,
};
use serde::Deserialize;
use serde_json::Value;

use crate::infrastructure::ports::{ChapterRepo, MessageRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid {record}: {source}")]
    Invalid {
        record: String,
        #[source]
        source: DomainError,
    },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    #[serde(default)]
    chapters: Vec<ChapterRecord>,
    #[serde(default)]
    messages: Vec<MessageRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChapterRecord {
    id: ChapterId,
    story_id: StoryId,
    title: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageRecord {
    #[serde(default)]
    id: Option<MessageId>,
    chapter_id: ChapterId,
    #[serde(default)]
    sender: Option<CharacterId>,
    #[serde(default)]
    recipients: Vec<CharacterId>,
    body: String,
    sent_at: Value,
}

/// What a snapshot contained, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotSummary {
    pub stories: Vec<StoryId>,
    pub chapters: Vec<ChapterId>,
    pub messages: usize,
}

impl ChapterRecord {
    fn into_chapter(self) -> Result<Chapter, SnapshotError> {
        let record = format!("chapter {}", self.id);
        let invalid = |source: DomainError| SnapshotError::Invalid {
            record: record.clone(),
            source,
        };

        let content = Document::from_json(self.content).map_err(|e| invalid(e.into()))?;
        let published_at = self
            .published_at
            .as_deref()
            .map(|raw| {
                parse_datetime(raw).map_err(|e| {
                    invalid(DomainError::parse(format!("publishedAt {:?}: {}", raw, e)))
                })
            })
            .transpose()?;

        Ok(Chapter::from_storage(
            self.id,
            self.story_id,
            self.title,
            content,
            published_at,
        ))
    }
}

impl MessageRecord {
    fn into_message(self, position: usize) -> Result<Message, SnapshotError> {
        let record = format!("message #{}", position);
        // Saving upserts by id, so a generated id would duplicate on reload.
        let Some(id) = self.id else {
            return Err(SnapshotError::Invalid {
                record,
                source: DomainError::validation("Message has no id"),
            });
        };
        let raw_sent_at = match &self.sent_at {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        Message::from_stored_timestamp(
            id,
            self.chapter_id,
            self.sender,
            self.recipients,
            self.body,
            &raw_sent_at,
        )
        .map_err(|source| SnapshotError::Invalid { record, source })
    }
}

/// Read the snapshot at `path` and save its contents through the given repos.
pub async fn load_snapshot(
    path: &Path,
    chapters: &dyn ChapterRepo,
    messages: &dyn MessageRepo,
) -> Result<SnapshotSummary, SnapshotError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let file: SnapshotFile = serde_json::from_str(&raw)?;

    let mut summary = SnapshotSummary::default();

    for record in file.chapters {
        let chapter = record.into_chapter()?;
        chapters.save(&chapter).await?;
        if !summary.stories.contains(&chapter.story_id()) {
            summary.stories.push(chapter.story_id());
        }
        summary.chapters.push(chapter.id());
    }

    for (position, record) in file.messages.into_iter().enumerate() {
        let message = record.into_message(position)?;
        messages.save(&message).await?;
        summary.messages += 1;
    }

    tracing::info!(
        path = %path.display(),
        stories = summary.stories.len(),
        chapters = summary.chapters.len(),
        messages = summary.messages,
        "Snapshot loaded"
    );

    Ok(summary)
}
