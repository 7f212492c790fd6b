//! Durable, append-only history of transit events.

mod sqlite;
mod store;

pub use sqlite::SqliteEventStore;
pub use store::{EventStore, StoreError};
