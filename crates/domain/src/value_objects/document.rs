//! Rich-text document tree for chapter content
//!
//! Mirrors the JSON the chapter editor stores: a `doc` root holding blocks,
//! blocks holding inline items, inline items carrying marks.
//!
//! ```json
//! {"type": "doc", "content": [
//!   {"type": "paragraph", "content": [
//!     {"type": "text", "text": "This is "},
//!     {"type": "text", "text": "secret", "marks": [
//!       {"type": "mention", "attrs": {"mentionTargets": [{"id": 1}]}}
//!     ]}
//!   ]}
//! ]}
//! ```
//!
//! Every level is a closed set of known kinds plus a fallback. Known kinds are
//! matched by their `type` tag; anything unknown or malformed deserializes into
//! the fallback variant and is carried through untouched, as are unknown fields
//! on known nodes. Only a root that is not a document at all is rejected (see
//! [`Document::from_json`]).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::StructuralError;
use crate::ids::CharacterId;

/// Editor attributes we carry without interpreting.
pub type Attrs = Map<String, Value>;

// =============================================================================
// Root
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum RootKind {
    #[default]
    #[serde(rename = "doc")]
    Doc,
}

/// A chapter document: an ordered sequence of blocks under a `doc` root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type", default)]
    kind: RootKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default)]
    pub content: Vec<Block>,
}

impl Document {
    pub fn new(content: Vec<Block>) -> Self {
        Self {
            kind: RootKind::Doc,
            attrs: None,
            content,
        }
    }

    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        self.attrs = Some(attrs);
        self
    }

    /// Same root and document-level attributes, different blocks.
    pub fn with_content(&self, content: Vec<Block>) -> Self {
        Self {
            kind: self.kind,
            attrs: self.attrs.clone(),
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Interpret stored JSON as a document.
    ///
    /// `null` and `{}` are the empty document. The root must otherwise be an
    /// object typed `doc` whose `content`, if present, is a list.
    pub fn from_json(value: Value) -> Result<Self, StructuralError> {
        let map = match &value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => return Err(StructuralError::RootNotObject),
        };

        match map.get("type") {
            None => {}
            Some(Value::String(kind)) if kind == "doc" => {}
            Some(Value::String(kind)) => {
                return Err(StructuralError::UnexpectedRootType(kind.clone()))
            }
            Some(other) => return Err(StructuralError::UnexpectedRootType(other.to_string())),
        }

        match map.get("content") {
            None | Some(Value::Null) | Some(Value::Array(_)) => {}
            Some(_) => return Err(StructuralError::ContentNotList),
        }

        let mut value = value;
        if let Some(map) = value.as_object_mut() {
            if matches!(map.get("content"), Some(Value::Null)) {
                map.remove("content");
            }
        }

        serde_json::from_value(value).map_err(|e| StructuralError::Json(e.to_string()))
    }

    pub fn from_json_str(s: &str) -> Result<Self, StructuralError> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| StructuralError::Json(e.to_string()))?;
        Self::from_json(value)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Whether any inline item anywhere carries a mention mark.
    pub fn has_restrictions(&self) -> bool {
        self.inlines()
            .any(|inline| inline.marks().iter().any(Mark::is_restriction))
    }

    fn inlines(&self) -> impl Iterator<Item = &Inline> {
        let mut stack: Vec<&Block> = self.content.iter().rev().collect();
        let mut found = Vec::new();
        while let Some(block) = stack.pop() {
            match block {
                Block::Text(text) => found.extend(text.content.iter()),
                Block::Container(container) => stack.extend(container.content.iter().rev()),
                Block::Leaf(_) | Block::Opaque(_) => {}
            }
        }
        found.into_iter()
    }
}

// =============================================================================
// Blocks
// =============================================================================

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Block {
    /// Paragraph-like block holding inline items.
    Text(TextBlock),
    /// Block holding other blocks (quotes, lists).
    Container(ContainerBlock),
    /// Block with no content of its own.
    Leaf(LeafBlock),
    /// Unknown or malformed block, carried verbatim.
    Opaque(Value),
}

impl Block {
    pub fn paragraph(content: Vec<Inline>) -> Self {
        Self::Text(TextBlock::new(TextBlockKind::Paragraph, content))
    }

    pub fn heading(level: u8, content: Vec<Inline>) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("level".into(), Value::from(level));
        Self::Text(TextBlock {
            attrs: Some(attrs),
            ..TextBlock::new(TextBlockKind::Heading, content)
        })
    }

    pub fn container(kind: ContainerKind, content: Vec<Block>) -> Self {
        Self::Container(ContainerBlock {
            kind,
            attrs: None,
            content,
            rest: Attrs::new(),
        })
    }

    pub fn horizontal_rule() -> Self {
        Self::Leaf(LeafBlock {
            kind: LeafKind::HorizontalRule,
            attrs: None,
            rest: Attrs::new(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextBlockKind {
    Paragraph,
    Heading,
    CodeBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "type")]
    pub kind: TextBlockKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Inline>,
    /// Fields the editor stores that we don't model.
    #[serde(flatten)]
    pub rest: Attrs,
}

impl TextBlock {
    pub fn new(kind: TextBlockKind, content: Vec<Inline>) -> Self {
        Self {
            kind,
            attrs: None,
            content,
            rest: Attrs::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerKind {
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    TaskList,
    TaskItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerBlock {
    #[serde(rename = "type")]
    pub kind: ContainerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Block>,
    #[serde(flatten)]
    pub rest: Attrs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeafKind {
    HorizontalRule,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafBlock {
    #[serde(rename = "type")]
    pub kind: LeafKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(flatten)]
    pub rest: Attrs,
}

// =============================================================================
// Inline items
// =============================================================================

/// An inline item inside a text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inline {
    Text(TextRun),
    Atom(AtomInline),
    /// Inline node of a kind we don't model, with readable marks.
    Other(OtherInline),
    /// Inline value we can't read at all, carried verbatim.
    Opaque(Value),
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Self::marked_text(text, Vec::new())
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text(TextRun {
            kind: TextKind::Text,
            text: text.into(),
            marks,
            rest: Attrs::new(),
        })
    }

    pub fn image(src: impl Into<String>, marks: Vec<Mark>) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("src".into(), Value::String(src.into()));
        Self::Atom(AtomInline {
            kind: AtomKind::Image,
            attrs: Some(attrs),
            marks,
            rest: Attrs::new(),
        })
    }

    pub fn hard_break() -> Self {
        Self::Atom(AtomInline {
            kind: AtomKind::HardBreak,
            attrs: None,
            marks: Vec::new(),
            rest: Attrs::new(),
        })
    }

    /// Marks on this item. Opaque items expose none.
    pub fn marks(&self) -> &[Mark] {
        match self {
            Self::Text(run) => &run.marks,
            Self::Atom(atom) => &atom.marks,
            Self::Other(other) => &other.marks,
            Self::Opaque(_) => &[],
        }
    }

    /// The same item carrying `marks` instead of its own.
    pub fn with_marks(&self, marks: Vec<Mark>) -> Self {
        match self {
            Self::Text(run) => Self::Text(TextRun {
                kind: run.kind,
                text: run.text.clone(),
                marks,
                rest: run.rest.clone(),
            }),
            Self::Atom(atom) => Self::Atom(AtomInline {
                kind: atom.kind,
                attrs: atom.attrs.clone(),
                marks,
                rest: atom.rest.clone(),
            }),
            Self::Other(other) => Self::Other(OtherInline {
                kind: other.kind.clone(),
                marks,
                rest: other.rest.clone(),
            }),
            Self::Opaque(value) => Self::Opaque(value.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum TextKind {
    #[serde(rename = "text")]
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(rename = "type")]
    kind: TextKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(flatten)]
    pub rest: Attrs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AtomKind {
    Image,
    HardBreak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomInline {
    #[serde(rename = "type")]
    pub kind: AtomKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(flatten)]
    pub rest: Attrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherInline {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(flatten)]
    pub rest: Attrs,
}

// =============================================================================
// Marks
// =============================================================================

/// A tag on an inline item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mark {
    /// Limits the item to the listed characters.
    Mention(MentionMark),
    /// Mention mark whose payload can't be read. Restricts nobody.
    MalformedMention(MalformedMention),
    Style(StyleMark),
    /// Unknown mark, carried verbatim.
    Other(Value),
}

impl Mark {
    pub fn mention(targets: impl IntoIterator<Item = CharacterId>) -> Self {
        Self::Mention(MentionMark {
            kind: MentionKind::Mention,
            attrs: MentionAttrs {
                mention_targets: targets
                    .into_iter()
                    .map(|id| TargetEntry::Target(MentionTarget::new(id)))
                    .collect(),
                extra: Attrs::new(),
            },
        })
    }

    pub fn style(kind: StyleKind) -> Self {
        Self::Style(StyleMark { kind, attrs: None })
    }

    /// Any mention mark, readable or not. These never reach a viewer.
    pub fn is_restriction(&self) -> bool {
        matches!(self, Self::Mention(_) | Self::MalformedMention(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum MentionKind {
    #[serde(rename = "mention")]
    Mention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionMark {
    #[serde(rename = "type")]
    kind: MentionKind,
    #[serde(default)]
    attrs: MentionAttrs,
}

impl MentionMark {
    /// Readable targets. Entries whose id can't be read are skipped.
    pub fn targets(&self) -> impl Iterator<Item = &MentionTarget> {
        self.attrs.mention_targets.iter().filter_map(|entry| match entry {
            TargetEntry::Target(target) => Some(target),
            TargetEntry::Unreadable(_) => None,
        })
    }

    /// An empty target list restricts nobody. A list whose entries are all
    /// unreadable still restricts everyone.
    pub fn is_open(&self) -> bool {
        self.attrs.mention_targets.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MentionAttrs {
    #[serde(default)]
    mention_targets: Vec<TargetEntry>,
    #[serde(flatten)]
    extra: Attrs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum TargetEntry {
    Target(MentionTarget),
    /// Kept so the mark round-trips; names nobody.
    Unreadable(Value),
}

/// A `mention` mark whose `attrs` don't have the shape of a target list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalformedMention {
    #[serde(rename = "type")]
    kind: MentionKind,
    #[serde(flatten)]
    rest: Attrs,
}

/// A character named by a mention restriction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionTarget {
    #[serde(deserialize_with = "character_id_from_number_or_string")]
    pub id: CharacterId,
    /// Display fields the editor stores alongside the id (label, avatar).
    #[serde(flatten)]
    pub extra: Attrs,
}

impl MentionTarget {
    pub fn new(id: CharacterId) -> Self {
        Self {
            id,
            extra: Attrs::new(),
        }
    }
}

// The editor has stored target ids both as numbers and as numeric strings.
fn character_id_from_number_or_string<'de, D>(deserializer: D) -> Result<CharacterId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(CharacterId::new(n)),
        RawId::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link,
    Highlight,
    TextStyle,
    Subscript,
    Superscript,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleMark {
    #[serde(rename = "type")]
    pub kind: StyleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}
