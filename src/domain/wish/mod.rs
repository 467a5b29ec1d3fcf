pub mod entity;
pub mod invariants;

pub use entity::{Wish, UNSAVED_WISH_ID};
pub use invariants::{title_error, validate_wish, TITLE_MAX_CHARS};
