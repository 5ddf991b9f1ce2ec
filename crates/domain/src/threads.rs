//! Conversation threads over a chapter's messages.
//!
//! Messages are grouped by who takes part in them: the set of recipients plus
//! the sender. Roles don't matter, so a reply lands in the same thread as the
//! message it answers. Threads are ordered by their most recent message, the
//! most recently active thread last.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::entities::Message;
use crate::ids::CharacterId;

/// Canonical participant set of a thread: character ids in ascending order.
///
/// The narrator takes no slot in the key. A message from the narrator to
/// characters 1 and 2 therefore shares a key with one from 1 to 2.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadKey(Vec<CharacterId>);

impl ThreadKey {
    pub fn for_message(message: &Message) -> Self {
        let ids: BTreeSet<CharacterId> = message
            .recipients()
            .iter()
            .copied()
            .chain(message.sender())
            .collect();
        Self(ids.into_iter().collect())
    }

    pub fn ids(&self) -> &[CharacterId] {
        &self.0
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in &self.0 {
            if !first {
                f.write_str("-")?;
            }
            write!(f, "{}", id)?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for ThreadKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Someone taking part in a thread. Serialized as the character id, or `null`
/// for the narrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<CharacterId>", into = "Option<CharacterId>")]
pub enum Participant {
    Narrator,
    Character(CharacterId),
}

impl From<Option<CharacterId>> for Participant {
    fn from(value: Option<CharacterId>) -> Self {
        value.map_or(Self::Narrator, Self::Character)
    }
}

impl From<Participant> for Option<CharacterId> {
    fn from(value: Participant) -> Self {
        match value {
            Participant::Narrator => None,
            Participant::Character(id) => Some(id),
        }
    }
}

/// Messages sharing one participant set, in their original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    key: ThreadKey,
    participants: Vec<Participant>,
    messages: Vec<Message>,
    last_activity: DateTime<Utc>,
}

impl Thread {
    fn start(key: ThreadKey, first: Message) -> Self {
        // Recipients first, then the sender, narrator included.
        let participants = first
            .recipients()
            .iter()
            .map(|id| Participant::Character(*id))
            .chain(std::iter::once(Participant::from(first.sender())))
            .collect();
        Self {
            key,
            participants,
            last_activity: first.sent_at(),
            messages: vec![first],
        }
    }

    fn push(&mut self, message: Message) {
        self.last_activity = message.sent_at();
        self.messages.push(message);
    }

    pub fn key(&self) -> &ThreadKey {
        &self.key
    }

    /// Participants as seen on the thread's first message.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// `sent_at` of the last message in the thread.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }
}

/// Group messages into threads and order them by last activity.
///
/// Within a thread messages keep their input order. Threads whose last
/// messages were sent at the same instant keep the order in which they were
/// first seen.
pub fn build_threads(messages: impl IntoIterator<Item = Message>) -> Vec<Thread> {
    let mut threads: Vec<Thread> = Vec::new();
    let mut index: HashMap<ThreadKey, usize> = HashMap::new();

    for message in messages {
        let key = ThreadKey::for_message(&message);
        match index.get(&key) {
            Some(&slot) => threads[slot].push(message),
            None => {
                index.insert(key.clone(), threads.len());
                threads.push(Thread::start(key, message));
            }
        }
    }

    threads.sort_by_key(Thread::last_activity);
    threads
}
