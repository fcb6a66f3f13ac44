//! Store implementations
//!
//! - memory.rs: process-local store for tests and single-node deployments
//! - json_file.rs: JSON snapshot on disk, rewritten atomically per mutation
//!
//! Both implement [`SettingsStore`](crate::traits::SettingsStore) and
//! [`OffenseStore`](crate::traits::OffenseStore), and both override
//! `append_offense` with an atomic increment.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
