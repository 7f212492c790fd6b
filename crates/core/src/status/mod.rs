//! Line status records shared by the generator, the cache and the event store.

mod types;

pub use types::{Status, StatusParseError, StatusSnapshot, StoredEvent, TransitEvent};
