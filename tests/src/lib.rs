//! Cross-crate scenarios: crafted frames through capture, ingestion, the
//! store and the query API.

mod ingestion;
mod query;
