//! # hearthbook-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement [`RecordRepository`](hearthbook_app::ports::RecordRepository)
//! - Manage the `SQLite` connection pool lifecycle
//! - Run the embedded migrations on startup
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `hearthbook-app` (for port traits) and `hearthbook-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod pool;
mod record_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use record_repo::SqliteRecordRepository;
