//! The boundary between address producers (ingestion) and consumers (queries).
//!
//! Everything that reads or writes the directory goes through
//! [`AddressRepository`], so the ingestion loop and the query API never depend
//! on the concrete store.

use thiserror::Error;

use crate::address::Address;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Committing would leave a second record holding the same `ip` or `mac`.
    #[error("{field} {value} already belongs to address {holder}")]
    Conflict {
        field: &'static str,
        value: String,
        holder: String,
    },
    /// An index points at a record that is not in the table.
    #[error("index {index} is out of sync for key {key}")]
    Corrupted { index: &'static str, key: String },
}

/// Transaction-scoped access to the address directory.
///
/// Implementations must serialize writers and make each call atomic: readers
/// observe either the state before an `upsert` or the state after it.
pub trait AddressRepository: Send + Sync {
    /// Inserts or updates the mapping for `(ip, mac)` and returns its id.
    ///
    /// The id of an existing record holding `ip` is reused first, then the id
    /// of one holding `mac`. Only when neither exists is a fresh id minted.
    fn upsert(&self, ip: &str, mac: &str) -> Result<String, StoreError>;

    fn find_by_ip(&self, ip: &str) -> Result<Option<Address>, StoreError>;

    fn find_by_mac(&self, mac: &str) -> Result<Option<Address>, StoreError>;

    /// Returns every record, ascending by id.
    fn list_all(&self) -> Result<Vec<Address>, StoreError>;

    /// Number of records currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
