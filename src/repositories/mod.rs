// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - The repository is the boundary between the store and the application
// - Reads pass the store's live queries through untouched
// - Every write failure is logged and surfaced as RepositoryFailure
// - Writes that match no row succeed quietly

pub mod wish_repository;

pub use wish_repository::WishRepository;
