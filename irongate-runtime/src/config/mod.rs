//! Configuration loading
//!
//! Graph records are kept in an id-keyed store in two formats: TOML text
//! (hand-edited or exported) and postcard snapshots (saved by the engine).

pub mod loader;
pub mod store;
pub mod toml;

pub use loader::{GraphLoader, LoadError};
pub use store::{ConfigStore, RecordFormat, StoreError};
pub use toml::{parse_config, ParseError};
