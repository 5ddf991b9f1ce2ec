//! Use cases - reader-facing operations.
//!
//! Each module orchestrates repositories and the pure domain functions to
//! answer one kind of request.

pub mod chapter;
pub mod feed;
mod reader;

pub use chapter::{
    ChapterUseCases, ChapterView, ChapterViewError, GetChapterView, GetInteractions,
    InteractionsError,
};
pub use feed::{BuildCharacterFeed, Feed, FeedConfig, FeedError, FeedItem, FeedUseCases};
pub use reader::Reader;
