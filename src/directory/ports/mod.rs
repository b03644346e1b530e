//! Port contracts for the identity and team directory.

pub mod stores;

pub use stores::{DirectoryStoreError, DirectoryStoreResult, TeamStore, UserStore};
