//! Chapter message entity
//!
//! A note posted on a chapter by the narrator or a character. Messages are
//! immutable once posted; threading only regroups them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::parse_stored_timestamp;
use crate::error::DomainError;
use crate::ids::{ChapterId, CharacterId, MessageId};

/// A message attached to a chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    chapter_id: ChapterId,
    /// `None` when the narrator sent it
    sender: Option<CharacterId>,
    /// Empty when the message is directed at the narrator
    recipients: Vec<CharacterId>,
    body: String,
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Post a new message.
    ///
    /// The narrator writing to nobody is rejected here so that threading never
    /// has to deal with an empty participant set for new data.
    pub fn new(
        chapter_id: ChapterId,
        sender: Option<CharacterId>,
        recipients: Vec<CharacterId>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(DomainError::validation("Message body cannot be empty"));
        }
        if sender.is_none() && recipients.is_empty() {
            return Err(DomainError::validation(
                "Narrator messages need at least one recipient",
            ));
        }

        Ok(Self {
            id: MessageId::new(),
            chapter_id,
            sender,
            recipients,
            body,
            sent_at: now,
        })
    }

    /// Reconstruct a message from storage.
    pub fn from_storage(
        id: MessageId,
        chapter_id: ChapterId,
        sender: Option<CharacterId>,
        recipients: Vec<CharacterId>,
        body: String,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            chapter_id,
            sender,
            recipients,
            body,
            sent_at,
        }
    }

    /// Reconstruct a message whose timestamp is stored as text.
    ///
    /// Accepts RFC3339 or epoch milliseconds; anything else is a parse error,
    /// so every `Message` carries an orderable `sent_at`.
    pub fn from_stored_timestamp(
        id: MessageId,
        chapter_id: ChapterId,
        sender: Option<CharacterId>,
        recipients: Vec<CharacterId>,
        body: String,
        sent_at: &str,
    ) -> Result<Self, DomainError> {
        let sent_at = parse_stored_timestamp(sent_at).ok_or_else(|| {
            DomainError::parse(format!("Invalid timestamp for message {}: {:?}", id, sent_at))
        })?;
        Ok(Self::from_storage(
            id, chapter_id, sender, recipients, body, sent_at,
        ))
    }

    // Read accessors

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn chapter_id(&self) -> ChapterId {
        self.chapter_id
    }

    pub fn sender(&self) -> Option<CharacterId> {
        self.sender
    }

    pub fn recipients(&self) -> &[CharacterId] {
        &self.recipients
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Whether `character` sent or received this message.
    pub fn involves(&self, character: CharacterId) -> bool {
        self.sender == Some(character) || self.recipients.contains(&character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn new_message_keeps_its_fields() {
        let chapter = ChapterId::new();
        let msg = Message::new(
            chapter,
            Some(CharacterId::new(1)),
            vec![CharacterId::new(2)],
            "Meet me at the docks",
            now(),
        )
        .unwrap();

        assert_eq!(msg.chapter_id(), chapter);
        assert_eq!(msg.sender(), Some(CharacterId::new(1)));
        assert_eq!(msg.recipients(), &[CharacterId::new(2)]);
        assert_eq!(msg.body(), "Meet me at the docks");
        assert_eq!(msg.sent_at(), now());
    }

    #[test]
    fn blank_body_is_rejected() {
        let result = Message::new(ChapterId::new(), Some(CharacterId::new(1)), vec![], "  ", now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn narrator_message_to_nobody_is_rejected() {
        let result = Message::new(ChapterId::new(), None, vec![], "Hello?", now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn character_message_to_the_narrator_is_allowed() {
        let msg = Message::new(ChapterId::new(), Some(CharacterId::new(4)), vec![], "Help", now());
        assert!(msg.is_ok());
    }

    #[test]
    fn stored_timestamp_is_validated() {
        let ok = Message::from_stored_timestamp(
            MessageId::new(),
            ChapterId::new(),
            None,
            vec![CharacterId::new(1)],
            "hi".into(),
            "2023-11-14T22:13:20Z",
        )
        .unwrap();
        assert_eq!(ok.sent_at(), now());

        let err = Message::from_stored_timestamp(
            MessageId::new(),
            ChapterId::new(),
            None,
            vec![CharacterId::new(1)],
            "hi".into(),
            "Tue 14th",
        );
        assert!(matches!(err, Err(DomainError::Parse(_))));
    }

    #[test]
    fn involves_sender_and_recipients_only() {
        let msg = Message::new(
            ChapterId::new(),
            Some(CharacterId::new(1)),
            vec![CharacterId::new(2), CharacterId::new(3)],
            "psst",
            now(),
        )
        .unwrap();
        assert!(msg.involves(CharacterId::new(1)));
        assert!(msg.involves(CharacterId::new(3)));
        assert!(!msg.involves(CharacterId::new(4)));
    }
}
