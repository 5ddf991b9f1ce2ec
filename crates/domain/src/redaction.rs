//! Per-viewer redaction of chapter documents.
//!
//! Narrators restrict parts of a chapter to specific characters with mention
//! marks. [`redact`] produces the copy of a document one viewer is allowed to
//! read: restricted items the viewer isn't named on are removed, the
//! restriction marks themselves are stripped from what remains, and blocks
//! that were emptied by the removal are dropped so the result never renders
//! blank paragraphs or empty list items.
//!
//! ```
//! use fabula_domain::{redact, Block, CharacterId, Document, Inline, Mark, Viewer};
//!
//! let ada = CharacterId::new(1);
//! let doc = Document::new(vec![Block::paragraph(vec![
//!     Inline::text("The door is "),
//!     Inline::marked_text("trapped", vec![Mark::mention([ada])]),
//! ])]);
//!
//! let for_ada = redact(&doc, Viewer::Character(ada));
//! let for_bob = redact(&doc, Viewer::Character(CharacterId::new(2)));
//!
//! assert_eq!(for_ada.content, vec![Block::paragraph(vec![
//!     Inline::text("The door is "),
//!     Inline::marked_text("trapped", vec![]),
//! ])]);
//! assert_eq!(for_bob.content, vec![Block::paragraph(vec![Inline::text("The door is ")])]);
//! ```

use serde::{Deserialize, Serialize};

use crate::ids::CharacterId;
use crate::value_objects::{Block, ContainerBlock, Document, Inline, Mark, TextBlock};

/// Who a document is being redacted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Viewer {
    Character(CharacterId),
    /// No character: the narrator or an anonymous reader. Sees only
    /// unrestricted content; wider narrator access is decided by the caller.
    Public,
}

impl Viewer {
    pub fn character_id(&self) -> Option<CharacterId> {
        match self {
            Self::Character(id) => Some(*id),
            Self::Public => None,
        }
    }
}

impl From<Option<CharacterId>> for Viewer {
    fn from(value: Option<CharacterId>) -> Self {
        value.map_or(Self::Public, Self::Character)
    }
}

/// Build the copy of `document` that `viewer` may read.
///
/// The input is left untouched. Redacting an already redacted document for the
/// same viewer returns it unchanged.
pub fn redact(document: &Document, viewer: Viewer) -> Document {
    document.with_content(redact_blocks(&document.content, viewer))
}

fn redact_blocks(blocks: &[Block], viewer: Viewer) -> Vec<Block> {
    blocks
        .iter()
        .filter_map(|block| redact_block(block, viewer))
        .collect()
}

/// `None` when the block was emptied by redaction and must go.
fn redact_block(block: &Block, viewer: Viewer) -> Option<Block> {
    match block {
        Block::Text(text) => {
            let content: Vec<Inline> = text
                .content
                .iter()
                .filter_map(|inline| redact_inline(inline, viewer))
                .collect();
            if content.is_empty() && !text.content.is_empty() {
                return None;
            }
            Some(Block::Text(TextBlock {
                kind: text.kind,
                attrs: text.attrs.clone(),
                content,
                rest: text.rest.clone(),
            }))
        }
        Block::Container(container) => {
            let content = redact_blocks(&container.content, viewer);
            if content.is_empty() && !container.content.is_empty() {
                return None;
            }
            Some(Block::Container(ContainerBlock {
                kind: container.kind,
                attrs: container.attrs.clone(),
                content,
                rest: container.rest.clone(),
            }))
        }
        // Content-less blocks survive any redaction; opaque ones can't be walked.
        Block::Leaf(_) | Block::Opaque(_) => Some(block.clone()),
    }
}

fn redact_inline(inline: &Inline, viewer: Viewer) -> Option<Inline> {
    let marks = inline.marks();
    if !is_visible(marks, viewer) {
        return None;
    }
    if !marks.iter().any(Mark::is_restriction) {
        return Some(inline.clone());
    }
    let kept = marks
        .iter()
        .filter(|mark| !mark.is_restriction())
        .cloned()
        .collect();
    Some(inline.with_marks(kept))
}

/// Every restriction on the item must admit the viewer. Unreadable mention
/// payloads restrict nobody.
fn is_visible(marks: &[Mark], viewer: Viewer) -> bool {
    marks.iter().all(|mark| match mark {
        Mark::Mention(mention) => {
            mention.is_open()
                || viewer
                    .character_id()
                    .is_some_and(|id| mention.targets().any(|target| target.id == id))
        }
        Mark::MalformedMention(_) | Mark::Style(_) | Mark::Other(_) => true,
    })
}
