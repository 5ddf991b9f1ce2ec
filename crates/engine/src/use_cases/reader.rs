//! Who is asking for content.

use std::fmt;
use std::str::FromStr;

use fabula_domain::{CharacterId, DomainError, Viewer};

/// The requester of a chapter view or its interactions.
///
/// Narrator access is checked by the caller; a `Reader::Narrator` is taken
/// at its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reader {
    Narrator,
    Character(CharacterId),
    Public,
}

impl Reader {
    /// The viewer to redact for, or `None` when the reader sees everything.
    pub fn viewer(&self) -> Option<Viewer> {
        match self {
            Self::Narrator => None,
            Self::Character(id) => Some(Viewer::Character(*id)),
            Self::Public => Some(Viewer::Public),
        }
    }
}

impl fmt::Display for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Narrator => f.write_str("narrator"),
            Self::Character(id) => write!(f, "character:{}", id),
            Self::Public => f.write_str("public"),
        }
    }
}

/// Parses `narrator`, `public`, a bare character id, or `character:<id>`.
impl FromStr for Reader {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "narrator" => Ok(Self::Narrator),
            "public" => Ok(Self::Public),
            other => {
                let id = other.strip_prefix("character:").unwrap_or(other);
                Ok(Self::Character(id.parse()?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_form() {
        assert_eq!("narrator".parse::<Reader>().unwrap(), Reader::Narrator);
        assert_eq!(" Public ".parse::<Reader>().unwrap(), Reader::Public);
        assert_eq!(
            "7".parse::<Reader>().unwrap(),
            Reader::Character(CharacterId::new(7))
        );
        assert_eq!(
            "character:7".parse::<Reader>().unwrap(),
            Reader::Character(CharacterId::new(7))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "gm".parse::<Reader>(),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn display_parses_back() {
        for reader in [
            Reader::Narrator,
            Reader::Public,
            Reader::Character(CharacterId::new(42)),
        ] {
            assert_eq!(reader.to_string().parse::<Reader>().unwrap(), reader);
        }
    }

    #[test]
    fn narrator_has_no_viewer() {
        assert_eq!(Reader::Narrator.viewer(), None);
        assert_eq!(Reader::Public.viewer(), Some(Viewer::Public));
    }
}
