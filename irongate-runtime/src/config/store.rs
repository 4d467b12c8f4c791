//! Configuration store abstraction

use core::fmt;
use core::future::Future;

/// Storage format of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordFormat {
    /// UTF-8 TOML text
    Toml,
    /// Postcard binary snapshot
    Snapshot,
}

/// Store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// No record under this id and format
    NotFound,
    /// Record larger than the read buffer
    BufferTooSmall,
    /// Backend failure
    Storage,
    /// Store has no room for the record
    Full,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => f.write_str("record not found"),
            StoreError::BufferTooSmall => f.write_str("record larger than buffer"),
            StoreError::Storage => f.write_str("storage failure"),
            StoreError::Full => f.write_str("store full"),
        }
    }
}

/// Id-keyed record store
///
/// Each id can hold one record per [`RecordFormat`].
pub trait ConfigStore {
    /// Read a record into `buffer`
    ///
    /// Returns the number of bytes read.
    fn read(
        &mut self,
        id: &str,
        format: RecordFormat,
        buffer: &mut [u8],
    ) -> impl Future<Output = Result<usize, StoreError>>;

    /// Write (or replace) a record
    fn write(&mut self, id: &str, format: RecordFormat, data: &[u8]) -> impl Future<Output = Result<(), StoreError>>;
}
