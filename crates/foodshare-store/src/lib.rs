//! # foodshare-store
//!
//! Persistent document store for Foodshare, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed helpers for items,
//! reservations, user profiles and feedback.  Every reservation state
//! transition is a single conditional statement so it stays atomic even when
//! several processes share the same database file.

pub mod database;
pub mod feedback;
pub mod items;
pub mod migrations;
pub mod models;
pub mod reservations;
pub mod users;

mod error;
mod row;

pub use database::Database;
pub use error::StoreError;
pub use models::*;
