//! `phonebook-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::DomainError;
pub use id::RecordId;
pub use value_object::ValueObject;
