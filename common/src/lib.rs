//! Types and helpers shared by every `addrbook` crate.

pub mod address;
pub mod config;
pub mod network;
pub mod repository;

pub use address::{Address, Candidate};
pub use repository::{AddressRepository, StoreError};
