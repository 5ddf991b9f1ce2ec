extern crate self as fabula_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod redaction;
pub mod threads;
pub mod value_objects;

pub use entities::{Chapter, Message};

pub use error::{DomainError, StructuralError};

pub use ids::{ChapterId, CharacterId, MessageId, StoryId};

pub use redaction::{redact, Viewer};

pub use threads::{build_threads, Participant, Thread, ThreadKey};

pub use value_objects::{
    AtomInline, AtomKind, Attrs, Block, ContainerBlock, ContainerKind, Document, Inline,
    LeafBlock, LeafKind, MalformedMention, Mark, MentionMark, MentionTarget, OtherInline,
    StyleKind, StyleMark, TextBlock, TextBlockKind, TextRun,
};
