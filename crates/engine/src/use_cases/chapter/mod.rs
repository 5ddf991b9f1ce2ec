//! Chapter use cases.
//!
//! Serve a chapter's document and its message threads to a reader, hiding
//! whatever that reader isn't allowed to see.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fabula_domain::{build_threads, redact, ChapterId, Document, StoryId, Thread};
use serde::Serialize;

use crate::infrastructure::ports::{ChapterRepo, MessageRepo, RepoError};
use crate::use_cases::Reader;

/// Container for chapter use cases.
pub struct ChapterUseCases {
    pub view: Arc<GetChapterView>,
    pub interactions: Arc<GetInteractions>,
}

impl ChapterUseCases {
    pub fn new(view: Arc<GetChapterView>, interactions: Arc<GetInteractions>) -> Self {
        Self { view, interactions }
    }
}

// =============================================================================
// Chapter view
// =============================================================================

/// A chapter as one reader sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterView {
    pub chapter_id: ChapterId,
    pub story_id: StoryId,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub content: Document,
}

pub struct GetChapterView {
    chapters: Arc<dyn ChapterRepo>,
}

impl GetChapterView {
    pub fn new(chapters: Arc<dyn ChapterRepo>) -> Self {
        Self { chapters }
    }

    pub async fn execute(
        &self,
        chapter_id: ChapterId,
        reader: Reader,
    ) -> Result<ChapterView, ChapterViewError> {
        let chapter = match self.chapters.get(chapter_id).await {
            Ok(Some(chapter)) => chapter,
            Ok(None) => return Err(ChapterViewError::NotFound(chapter_id)),
            Err(e) if e.is_not_found() => return Err(ChapterViewError::NotFound(chapter_id)),
            Err(e) => return Err(e.into()),
        };

        let content = match reader.viewer() {
            Some(viewer) => redact(chapter.content(), viewer),
            None => chapter.content().clone(),
        };

        tracing::debug!(
            chapter_id = %chapter_id,
            reader = %reader,
            blocks = content.content.len(),
            "Built chapter view"
        );

        Ok(ChapterView {
            chapter_id,
            story_id: chapter.story_id(),
            title: chapter.title().to_string(),
            published_at: chapter.published_at(),
            content,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChapterViewError {
    #[error("Chapter not found: {0}")]
    NotFound(ChapterId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

// =============================================================================
// Interactions
// =============================================================================

/// Message threads on a chapter, filtered to what the reader took part in.
pub struct GetInteractions {
    messages: Arc<dyn MessageRepo>,
}

impl GetInteractions {
    pub fn new(messages: Arc<dyn MessageRepo>) -> Self {
        Self { messages }
    }

    /// The narrator sees every thread and a character sees the messages it
    /// sent or received. Public readers see nothing.
    pub async fn execute(
        &self,
        chapter_id: ChapterId,
        reader: Reader,
    ) -> Result<Vec<Thread>, InteractionsError> {
        let messages = match reader {
            Reader::Narrator => self.messages.list_for_chapter(chapter_id).await?,
            Reader::Character(id) => self.messages.list_for_character(chapter_id, id).await?,
            Reader::Public => return Ok(Vec::new()),
        };

        let threads = build_threads(messages);
        tracing::debug!(
            chapter_id = %chapter_id,
            reader = %reader,
            threads = threads.len(),
            "Built interactions"
        );
        Ok(threads)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InteractionsError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fabula_domain::{
        Block, Chapter, CharacterId, Inline, Mark, Message, MessageId, Participant,
    };

    use crate::infrastructure::ports::{MockChapterRepo, MockMessageRepo};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    fn secret_chapter() -> Chapter {
        let content = Document::new(vec![Block::paragraph(vec![
            Inline::text("The door is locked. "),
            Inline::marked_text(
                "You spot the key.",
                vec![Mark::mention([CharacterId::new(1)])],
            ),
        ])]);
        Chapter::new(StoryId::new(), "The Vault", content).unwrap()
    }

    fn chapter_repo_with(chapter: Chapter) -> Arc<dyn ChapterRepo> {
        let mut repo = MockChapterRepo::new();
        let id = chapter.id();
        repo.expect_get()
            .withf(move |requested| *requested == id)
            .returning(move |_| Ok(Some(chapter.clone())));
        Arc::new(repo)
    }

    fn message(sender: Option<u64>, recipients: &[u64], sent: i64) -> Message {
        Message::from_storage(
            MessageId::new(),
            ChapterId::new(),
            sender.map(CharacterId::new),
            recipients.iter().copied().map(CharacterId::new).collect(),
            "...".to_string(),
            at(sent),
        )
    }

    #[tokio::test]
    async fn narrator_sees_the_document_untouched() {
        let chapter = secret_chapter();
        let use_case = GetChapterView::new(chapter_repo_with(chapter.clone()));

        let view = use_case
            .execute(chapter.id(), Reader::Narrator)
            .await
            .expect("view should build");

        assert_eq!(&view.content, chapter.content());
        assert_eq!(view.title, "The Vault");
    }

    #[tokio::test]
    async fn mentioned_character_sees_the_secret_without_the_mark() {
        let chapter = secret_chapter();
        let use_case = GetChapterView::new(chapter_repo_with(chapter.clone()));

        let view = use_case
            .execute(chapter.id(), Reader::Character(CharacterId::new(1)))
            .await
            .unwrap();

        assert!(!view.content.has_restrictions());
        assert_eq!(
            view.content.content,
            vec![Block::paragraph(vec![
                Inline::text("The door is locked. "),
                Inline::text("You spot the key."),
            ])]
        );
    }

    #[tokio::test]
    async fn public_reader_gets_only_unrestricted_text() {
        let chapter = secret_chapter();
        let use_case = GetChapterView::new(chapter_repo_with(chapter.clone()));

        let view = use_case
            .execute(chapter.id(), Reader::Public)
            .await
            .unwrap();

        assert_eq!(
            view.content.content,
            vec![Block::paragraph(vec![Inline::text("The door is locked. ")])]
        );
    }

    #[tokio::test]
    async fn missing_chapter_is_not_found() {
        let mut repo = MockChapterRepo::new();
        repo.expect_get().returning(|_| Ok(None));
        let use_case = GetChapterView::new(Arc::new(repo));
        let id = ChapterId::new();

        let result = use_case.execute(id, Reader::Narrator).await;

        assert!(matches!(result, Err(ChapterViewError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn adapter_not_found_is_not_found() {
        let mut repo = MockChapterRepo::new();
        repo.expect_get().returning(|id| {
            Err(RepoError::NotFound {
                entity_type: "Chapter",
                id: id.to_string(),
            })
        });
        let use_case = GetChapterView::new(Arc::new(repo));
        let id = ChapterId::new();

        let result = use_case.execute(id, Reader::Public).await;

        assert!(matches!(result, Err(ChapterViewError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn repo_failure_surfaces_as_repo_error() {
        let mut repo = MockChapterRepo::new();
        repo.expect_get()
            .returning(|_| {
                Err(RepoError::Storage {
                    operation: "get",
                    message: "connection reset".to_string(),
                })
            });
        let use_case = GetChapterView::new(Arc::new(repo));

        let result = use_case.execute(ChapterId::new(), Reader::Public).await;

        assert!(matches!(result, Err(ChapterViewError::Repo(_))));
    }

    #[tokio::test]
    async fn narrator_gets_every_thread() {
        let chapter_id = ChapterId::new();
        let mut repo = MockMessageRepo::new();
        repo.expect_list_for_chapter()
            .withf(move |id| *id == chapter_id)
            .returning(|_| {
                Ok(vec![
                    message(Some(1), &[2], 0),
                    message(Some(3), &[4], 1),
                    message(Some(2), &[1], 2),
                ])
            });
        repo.expect_list_for_character().times(0);
        let use_case = GetInteractions::new(Arc::new(repo));

        let threads = use_case
            .execute(chapter_id, Reader::Narrator)
            .await
            .unwrap();

        let keys: Vec<String> = threads.iter().map(|t| t.key().to_string()).collect();
        assert_eq!(keys, vec!["3-4", "1-2"]);
        assert_eq!(threads[1].messages().len(), 2);
    }

    #[tokio::test]
    async fn character_gets_only_their_threads() {
        let chapter_id = ChapterId::new();
        let mut repo = MockMessageRepo::new();
        repo.expect_list_for_character()
            .withf(move |id, character| *id == chapter_id && *character == CharacterId::new(1))
            .returning(|_, _| Ok(vec![message(None, &[1], 0), message(Some(1), &[2], 1)]));
        repo.expect_list_for_chapter().times(0);
        let use_case = GetInteractions::new(Arc::new(repo));

        let threads = use_case
            .execute(chapter_id, Reader::Character(CharacterId::new(1)))
            .await
            .unwrap();

        assert_eq!(threads.len(), 2);
        assert_eq!(
            threads[0].participants(),
            &[
                Participant::Character(CharacterId::new(1)),
                Participant::Narrator
            ]
        );
    }

    #[tokio::test]
    async fn public_reader_sees_no_interactions() {
        let mut repo = MockMessageRepo::new();
        repo.expect_list_for_chapter().times(0);
        repo.expect_list_for_character().times(0);
        let use_case = GetInteractions::new(Arc::new(repo));

        let threads = use_case
            .execute(ChapterId::new(), Reader::Public)
            .await
            .unwrap();

        assert!(threads.is_empty());
    }
}
