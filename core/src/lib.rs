//! Runtime side of the address book: the store, the ingestion loop, the
//! capture adapter and the query API.

pub mod api;
pub mod ingest;
pub mod network;
pub mod store;

pub use ingest::{FrameFeed, IngestStats, Ingestor};
pub use store::MemoryStore;
