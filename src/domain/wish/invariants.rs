use super::entity::Wish;
use crate::domain::{DomainError, DomainResult};

/// Longest title the input layer accepts, counted in characters
pub const TITLE_MAX_CHARS: usize = 50;

const TITLE_LENGTH_MESSAGE: &str = "Title must be between 1 and 50 characters";
const MISSING_FIELDS_MESSAGE: &str = "Enter fields to create a wish";

/// Validates a wish coming from the add/edit form.
///
/// The store itself accepts any text; these rules belong to the input layer.
pub fn validate_wish(wish: &Wish) -> DomainResult<()> {
    if wish.title.trim().is_empty() || wish.description.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            MISSING_FIELDS_MESSAGE.to_string(),
        ));
    }
    if let Some(message) = title_error(&wish.title) {
        return Err(DomainError::InvariantViolation(message.to_string()));
    }
    Ok(())
}

/// Hint shown under the title field while typing, if the text is not acceptable
pub fn title_error(title: &str) -> Option<&'static str> {
    if title.trim().is_empty() || title.chars().count() > TITLE_MAX_CHARS {
        Some(TITLE_LENGTH_MESSAGE)
    } else {
        None
    }
}

/// Invariants for the Wish domain:
///
/// 1. Identity is assigned by the store and never reused
/// 2. Title is not blank and at most 50 characters (input layer)
/// 3. Description is not blank (input layer)

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_wish() {
        let wish = Wish::new("Bike", "Red one");
        assert!(validate_wish(&wish).is_ok());
    }

    #[test]
    fn test_blank_fields_fail() {
        let err = validate_wish(&Wish::new("   ", "Red one")).unwrap_err();
        assert_eq!(err.to_string(), "Invariant violation: Enter fields to create a wish");

        assert!(validate_wish(&Wish::new("Bike", "")).is_err());
    }

    #[test]
    fn test_title_length_limit_counts_chars() {
        let fifty = "é".repeat(TITLE_MAX_CHARS);
        assert_eq!(title_error(&fifty), None);

        let fifty_one = "a".repeat(TITLE_MAX_CHARS + 1);
        assert_eq!(title_error(&fifty_one), Some(TITLE_LENGTH_MESSAGE));
        assert!(validate_wish(&Wish::new(fifty_one, "too long")).is_err());
    }
}
