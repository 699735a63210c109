//! `phonebook-directory`: directory records and their input grammar.
//!
//! Validation here is pure accept/reject: nothing is normalized or rewritten.

pub mod name;
pub mod phone;
pub mod record;

pub use name::{is_valid_name, MAX_NAME_CHARS};
pub use phone::{is_valid_phone, MAX_PHONE_DIGITS};
pub use record::{DirectoryRecord, FullName, PhoneNumber, RecordKey, ValidationError};
