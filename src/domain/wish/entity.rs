use serde::{Deserialize, Serialize};

/// Id carried by a wish that has not been written to the store yet.
/// The store assigns a fresh id when it sees this value on insert.
pub const UNSAVED_WISH_ID: i64 = 0;

/// A single entry on the wish list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wish {
    /// Store-assigned identifier (`UNSAVED_WISH_ID` until persisted)
    pub id: i64,

    /// Short title shown in the list
    pub title: String,

    /// Free text description
    pub description: String,
}

impl Wish {
    /// Create a wish that has not been persisted yet
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_WISH_ID,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Create a wish carrying an explicit id
    pub fn with_id(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != UNSAVED_WISH_ID
    }
}

impl std::fmt::Display for Wish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_wish_is_unsaved() {
        let wish = Wish::new("Bike", "Red one");
        assert_eq!(wish.id, UNSAVED_WISH_ID);
        assert!(!wish.is_persisted());
    }

    #[test]
    fn test_wish_with_id_is_persisted() {
        let wish = Wish::with_id(7, "Bike", "Red one");
        assert!(wish.is_persisted());
        assert_eq!(wish.to_string(), "Bike");
    }
}
