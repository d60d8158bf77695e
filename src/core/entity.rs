//! Card identification.
//!
//! Two identifiers describe a card:
//!
//! - [`CardId`]: one physical copy. Allocated once at setup and never
//!   reused, so a trashed card stays addressable.
//! - [`CardKey`]: the rules identity ("village", "copper"). Every copy of a
//!   card shares its key, and effect functions are looked up by key.
//!
//! ```
//! use kingdom_engine::core::{CardId, CardKey};
//!
//! let first = CardId(7);
//! let village = CardKey::new("village");
//!
//! assert_eq!(first.to_string(), "#7");
//! assert_eq!(village.as_str(), "village");
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of one physical card copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rules identity of a card, shared by all of its copies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardKey(String);

impl CardKey {
    /// Create a card key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for CardKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_display() {
        assert_eq!(format!("{}", CardId(42)), "#42");
        assert_eq!(CardId::from(3).raw(), 3);
    }

    #[test]
    fn test_card_key_conversions() {
        let a = CardKey::from("moat");
        let b = CardKey::from(String::from("moat"));

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "moat");
    }

    #[test]
    fn test_card_key_serializes_as_plain_string() {
        let key = CardKey::new("militia");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"militia\"");

        let back: CardKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_card_id_serialization() {
        let id = CardId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
