// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema migrations
// - Change tracking for live queries

pub mod connection;
pub mod invalidation;
pub mod migrations;

pub use connection::{
    create_connection_pool, get_connection, get_database_path, ConnectionPool, PooledConn,
};

pub use invalidation::InvalidationTracker;

pub use migrations::{
    get_database_stats, initialize_database, verify_database_integrity, DatabaseStats,
};
