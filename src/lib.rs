// src/lib.rs
// Wishlist - Local-first wish list manager
//
// Architecture:
// - Store: dumb SQLite data mapper with push-based live queries
// - Repository: single boundary that tags write failures
// - Application: observable view state, all work on a background handle
// - Explicit: No implicit behavior, no magic
// - Local-first: User controls all data

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod store;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    title_error, validate_wish, DomainError, DomainResult, Wish, TITLE_MAX_CHARS,
    UNSAVED_WISH_ID,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult, RepositoryFailure, WishOperation};

// ============================================================================
// PUBLIC API - Database & Store
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool, InvalidationTracker};
pub use store::{LiveQuery, SqliteWishStore, WishStore};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::WishRepository;

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{
    AppState, ErrorResponse, ErrorType, Observable, SharedState, SubmitOutcome, Subscription,
    WishListViewState,
};
pub use config::AppConfig;
