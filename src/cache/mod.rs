//! Cache Module
//!
//! Bounded status cache addressed by short keys, with FIFO eviction and a
//! durable mirror that lets it survive restarts.

mod codec;
mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use codec::{ShortKey, SHORT_KEY_BITS};
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::StatusCache;

// == Public Constants ==
/// Default number of statuses kept
pub const DEFAULT_CAPACITY: usize = 50;

/// Durable slot holding the ordered list of cached keys
pub const KEYLIST_SLOT: &str = "keylist";
