//! Configuration records
//!
//! The graph as it is exchanged with the configuration store: TOML text
//! for hand-edited records and postcard binary for saved snapshots.

pub mod types;
pub mod value;

#[cfg(feature = "serde")]
pub mod snapshot;

pub use types::*;
pub use value::*;

#[cfg(feature = "serde")]
pub use snapshot::*;
