//! Directory records and their validated fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use phonebook_core::{RecordId, ValueObject};

use crate::{is_valid_name, is_valid_phone};

/// Input rejected by the name or phone grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid input for name")]
    InvalidName,

    #[error("invalid input for phone number")]
    InvalidPhone,
}

/// A personal name that passed [`is_valid_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if is_valid_name(&raw) {
            Ok(Self(raw))
        } else {
            Err(ValidationError::InvalidName)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for FullName {}

impl TryFrom<String> for FullName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl core::fmt::Display for FullName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A phone number that passed [`is_valid_phone`].
///
/// Stored exactly as entered; `670-123-4567` and `670.123.4567` are different numbers here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if is_valid_phone(&raw) {
            Ok(Self(raw))
        } else {
            Err(ValidationError::InvalidPhone)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for PhoneNumber {}

impl TryFrom<String> for PhoneNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl core::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One name/number entry of the directory.
///
/// # Invariants
/// - Both fields passed their grammar before the record existed.
/// - Records are never edited in place; they are only created and deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub id: RecordId,
    pub full_name: FullName,
    pub phone_number: PhoneNumber,
}

impl DirectoryRecord {
    pub fn new(full_name: FullName, phone_number: PhoneNumber) -> Self {
        Self {
            id: RecordId::new(),
            full_name,
            phone_number,
        }
    }

    pub fn matches(&self, key: &RecordKey) -> bool {
        match key {
            RecordKey::Name(name) => &self.full_name == name,
            RecordKey::Number(number) => &self.phone_number == number,
        }
    }
}

/// Field a delete is matched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Name(FullName),
    Number(PhoneNumber),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_parse_rejects_invalid_input() {
        assert_eq!(FullName::parse("L33t Hacker"), Err(ValidationError::InvalidName));
        assert_eq!(FullName::parse("Jane Doe").unwrap().as_str(), "Jane Doe");
    }

    #[test]
    fn phone_number_parse_rejects_invalid_input() {
        assert_eq!(PhoneNumber::parse("555*555*5555"), Err(ValidationError::InvalidPhone));
        assert_eq!(PhoneNumber::parse("123-4567").unwrap().as_str(), "123-4567");
    }

    #[test]
    fn deserialization_runs_the_grammar() {
        let ok: Result<DirectoryRecord, _> = serde_json::from_value(serde_json::json!({
            "id": RecordId::new(),
            "full_name": "John Doe",
            "phone_number": "22.22.22.22",
        }));
        assert!(ok.is_ok());

        let bad: Result<DirectoryRecord, _> = serde_json::from_value(serde_json::json!({
            "id": RecordId::new(),
            "full_name": "<script>alert(1)</script>",
            "phone_number": "22.22.22.22",
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn record_matches_on_exact_field_text() {
        let record = DirectoryRecord::new(
            FullName::parse("Jane Doe").unwrap(),
            PhoneNumber::parse("670-123-4567").unwrap(),
        );

        assert!(record.matches(&RecordKey::Name(FullName::parse("Jane Doe").unwrap())));
        assert!(record.matches(&RecordKey::Number(PhoneNumber::parse("670-123-4567").unwrap())));
        assert!(!record.matches(&RecordKey::Number(PhoneNumber::parse("670.123.4567").unwrap())));
    }
}
