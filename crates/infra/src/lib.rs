//! Infrastructure layer: record storage, audit trail, configuration and the
//! directory service that composes them.

pub mod audit;
pub mod config;
pub mod directory;
pub mod record_store;

pub use directory::{DirectoryError, DirectoryService, LookupField};
