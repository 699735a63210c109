//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two validated
/// names with the same text are the same name. To "modify" one, build a new
/// one (which re-runs validation).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
