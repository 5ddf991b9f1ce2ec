//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    memory::{InMemoryChapterRepo, InMemoryMessageRepo},
    ports::{ChapterRepo, ClockPort, MessageRepo},
};
use crate::use_cases::{
    BuildCharacterFeed, ChapterUseCases, FeedConfig, FeedUseCases, GetChapterView,
    GetInteractions,
};

/// Main application state.
///
/// Holds the repositories and the use cases built on them.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Port traits injected directly.
pub struct Repositories {
    pub chapters: Arc<dyn ChapterRepo>,
    pub messages: Arc<dyn MessageRepo>,
    pub clock: Arc<dyn ClockPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub chapter: ChapterUseCases,
    pub feed: FeedUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repositories: Repositories, feed_config: FeedConfig) -> Self {
        let chapter = ChapterUseCases::new(
            Arc::new(GetChapterView::new(repositories.chapters.clone())),
            Arc::new(GetInteractions::new(repositories.messages.clone())),
        );
        let feed = FeedUseCases::new(Arc::new(BuildCharacterFeed::new(
            repositories.chapters.clone(),
            repositories.messages.clone(),
            repositories.clock.clone(),
            feed_config,
        )));

        Self {
            repositories,
            use_cases: UseCases { chapter, feed },
        }
    }

    /// App over empty in-memory repositories and the system clock.
    pub fn in_memory(feed_config: FeedConfig) -> Self {
        Self::new(
            Repositories {
                chapters: Arc::new(InMemoryChapterRepo::new()),
                messages: Arc::new(InMemoryMessageRepo::new()),
                clock: Arc::new(SystemClock::new()),
            },
            feed_config,
        )
    }
}
