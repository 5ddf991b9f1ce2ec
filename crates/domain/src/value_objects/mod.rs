//! Value objects - Immutable objects defined by their attributes

mod document;

pub use document::{
    AtomInline, AtomKind, Attrs, Block, ContainerBlock, ContainerKind, Document, Inline,
    LeafBlock, LeafKind, MalformedMention, Mark, MentionMark, MentionTarget, OtherInline,
    StyleKind, StyleMark, TextBlock, TextBlockKind, TextRun,
};
