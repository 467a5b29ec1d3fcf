// src/store/mod.rs
//
// Record store layer
//
// RULES:
// - The store is a DUMB data mapper: explicit SQL, no input validation
// - Live queries are push-based, driven by table invalidation
// - No failure translation (the repository does that)

pub mod wish_store;

pub use wish_store::{LiveQuery, SqliteWishStore, WishStore};

#[cfg(test)]
pub use wish_store::MockWishStore;
